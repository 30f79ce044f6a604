//! Resumable, bounded-concurrency corpus processing.
//!
//! One task per pending document runs on a pool gated to `max_workers`
//! permits. Completions are consumed in arrival order on the coordinating
//! loop, which is the only place the checkpoint store is touched; worker
//! tasks share nothing mutable but the sink. Every completed document is
//! checkpointed immediately, so an interrupted run reprocesses at most the
//! documents that were in flight.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::document::{SourceDocument, discover_markdown, keywords_for, link_from_filename, read_lossy};
use super::progress::ProgressStore;
use super::record::build_records;
use super::sink::RecordSink;
use crate::chunking::chunk_markdown;
use crate::config::{DEFAULT_MAX_CHARS, DEFAULT_MAX_WORKERS, PrepConfig};
use crate::summarize::Summarizer;
use crate::types::PrepError;

/// Everything a run needs besides the summarizer.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub resource_root: PathBuf,
    pub output_file: PathBuf,
    pub progress_file: PathBuf,
    pub max_workers: usize,
    pub max_chars: usize,
}

impl PipelineOptions {
    pub fn new(resource_root: impl Into<PathBuf>) -> Self {
        Self {
            resource_root: resource_root.into(),
            output_file: PathBuf::from("chunks.jsonl"),
            progress_file: PathBuf::from("progress_pre.json"),
            max_workers: DEFAULT_MAX_WORKERS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl From<&PrepConfig> for PipelineOptions {
    fn from(config: &PrepConfig) -> Self {
        Self {
            resource_root: config.resource_root.clone(),
            output_file: config.output_file.clone(),
            progress_file: config.progress_file.clone(),
            max_workers: config.max_workers,
            max_chars: config.max_chars,
        }
    }
}

/// Counters describing one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Markdown files found under the resource root.
    pub total: usize,
    /// Files skipped because the checkpoint already lists them.
    pub already_done: usize,
    /// Files completed (and checkpointed) by this run.
    pub processed: usize,
    /// Files that failed and stay pending for the next run.
    pub failed: usize,
}

/// Runs the preparation pipeline to completion.
///
/// Failures of individual documents are logged and counted, never fatal; an
/// unwritable checkpoint is fatal, because continuing would redo finished
/// work on every subsequent run.
pub async fn run(
    options: &PipelineOptions,
    summarizer: Arc<dyn Summarizer>,
) -> Result<RunReport, PrepError> {
    let mut progress = ProgressStore::load(&options.progress_file).await?;

    let documents = discover_markdown(&options.resource_root).await?;
    let total = documents.len();
    let pending: Vec<SourceDocument> = documents
        .into_iter()
        .filter(|doc| !progress.contains(&doc.name))
        .collect();
    let already_done = total - pending.len();

    tracing::info!(
        total,
        already_done,
        pending = pending.len(),
        "corpus scan complete"
    );

    let mut report = RunReport {
        total,
        already_done,
        ..RunReport::default()
    };
    if pending.is_empty() {
        return Ok(report);
    }

    let sink = Arc::new(RecordSink::open(&options.output_file).await?);
    let semaphore = Arc::new(Semaphore::new(options.max_workers.max(1)));

    let mut tasks = JoinSet::new();
    for document in pending {
        let semaphore = Arc::clone(&semaphore);
        let sink = Arc::clone(&sink);
        let summarizer = Arc::clone(&summarizer);
        let resource_root = options.resource_root.clone();
        let max_chars = options.max_chars;

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("worker pool semaphore closed");
            let outcome =
                process_document(&document, &resource_root, max_chars, &*summarizer, &sink).await;
            (document.name, outcome)
        });
    }

    // Single coordinating path: all progress mutation happens here, in
    // completion (arrival) order.
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, Ok(chunk_count))) => {
                progress.mark_done(name.clone()).await?;
                report.processed += 1;
                tracing::info!(
                    document = %name,
                    chunks = chunk_count,
                    done = report.processed,
                    "document complete"
                );
            }
            Ok((name, Err(err))) => {
                report.failed += 1;
                tracing::warn!(
                    document = %name,
                    error = %err,
                    "document failed; it stays pending for the next run"
                );
            }
            Err(join_err) => {
                report.failed += 1;
                tracing::error!(error = %join_err, "worker task panicked");
            }
        }
    }

    Ok(report)
}

/// One worker's job: read, summarize, chunk, wrap, append.
async fn process_document(
    document: &SourceDocument,
    resource_root: &std::path::Path,
    max_chars: usize,
    summarizer: &dyn Summarizer,
    sink: &RecordSink,
) -> Result<usize, PrepError> {
    let text = read_lossy(&document.path).await?;
    let summary = summarizer.summarize(&text).await?;
    let link = link_from_filename(&document.name);
    let keywords = keywords_for(&document.path, resource_root);

    let chunks = chunk_markdown(&link, &text, max_chars);
    let records = build_records(&document.name, &link, &summary, &keywords, chunks);
    sink.append(&records).await?;
    Ok(records.len())
}
