//! Offline maintenance passes over the record log.
//!
//! The pipeline is at-least-once: a document that fails after a partial sink
//! append is fully reprocessed on the next run, leaving duplicate records
//! behind. [`dedupe_records`] reconciles those afterwards. [`rebuild_progress`]
//! recovers a checkpoint from the record log when the progress file is lost
//! or stale.
//!
//! Both passes treat a malformed log line as fatal rather than skipping it:
//! silently dropping records would masquerade as a successful pass.

use std::collections::HashSet;
use std::path::Path;

use tokio::fs;

use super::document::discover_markdown;
use super::progress::ProgressStore;
use super::record::ChunkRecord;
use crate::types::PrepError;

/// Counters reported by [`dedupe_records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupReport {
    pub total: usize,
    pub unique: usize,
}

/// Copies `input` to `output`, keeping only the first record seen for each
/// `(document_name, seq_num)` key, in encounter order.
pub async fn dedupe_records(input: &Path, output: &Path) -> Result<DedupReport, PrepError> {
    let contents = fs::read_to_string(input).await?;

    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut survivors = String::new();
    let mut total = 0usize;

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        let record: ChunkRecord =
            serde_json::from_str(line).map_err(|_| PrepError::CorruptRecord {
                path: input.to_path_buf(),
                line: idx + 1,
            })?;
        if seen.insert((record.document_name, record.seq_num)) {
            survivors.push_str(line);
            survivors.push('\n');
        }
    }

    fs::write(output, survivors).await?;
    Ok(DedupReport {
        total,
        unique: seen.len(),
    })
}

/// Counters reported by [`rebuild_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Documents discovered under the resource root.
    pub total: usize,
    /// Discovered documents with at least one record in the log.
    pub done: usize,
    /// Discovered documents still missing from the log.
    pub todo: usize,
}

/// Rewrites the checkpoint at `progress_file` to exactly the set of
/// discovered documents that already have records in `record_log`.
pub async fn rebuild_progress(
    record_log: &Path,
    resource_root: &Path,
    progress_file: &Path,
) -> Result<ReconcileReport, PrepError> {
    let contents = fs::read_to_string(record_log).await?;
    let mut recorded: HashSet<String> = HashSet::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: ChunkRecord =
            serde_json::from_str(line).map_err(|_| PrepError::CorruptRecord {
                path: record_log.to_path_buf(),
                line: idx + 1,
            })?;
        recorded.insert(record.document_name);
    }

    let documents = discover_markdown(resource_root).await?;
    let total = documents.len();
    let done: HashSet<String> = documents
        .into_iter()
        .map(|doc| doc.name)
        .filter(|name| recorded.contains(name))
        .collect();
    let report = ReconcileReport {
        total,
        done: done.len(),
        todo: total - done.len(),
    };

    // A corrupt checkpoint is exactly what this pass repairs; any other
    // load failure still aborts.
    let mut store = match ProgressStore::load(progress_file).await {
        Ok(store) => store,
        Err(PrepError::CorruptProgress { .. }) => ProgressStore::fresh(progress_file),
        Err(other) => return Err(other),
    };
    store.replace(done).await?;

    Ok(report)
}
