//! End-to-end pipeline tests with a mock summarizer.
//!
//! These exercise the resume contract: a checkpointed document is never
//! reprocessed, a failed document is retried on the next run, and the record
//! log stays well-formed throughout.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use chunksmith::ingestion::record::ChunkRecord;
use chunksmith::ingestion::{PipelineOptions, pipeline};
use chunksmith::summarize::MockSummarizer;

struct Fixture {
    _dir: TempDir,
    options: PipelineOptions,
}

async fn fixture(files: &[(&str, &str)]) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let resources = dir.path().join("resources");
    tokio::fs::create_dir_all(&resources).await.expect("mkdir");
    for (name, body) in files {
        tokio::fs::write(resources.join(name), body).await.expect("write");
    }

    let mut options = PipelineOptions::new(&resources);
    options.output_file = dir.path().join("chunks.jsonl");
    options.progress_file = dir.path().join("progress.json");
    options.max_workers = 4;
    options.max_chars = 5000;

    Fixture { _dir: dir, options }
}

async fn read_records(path: &Path) -> Vec<ChunkRecord> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("well-formed record line"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

async fn read_checkpoint(path: &Path) -> Vec<String> {
    let raw = tokio::fs::read_to_string(path).await.expect("checkpoint");
    serde_json::from_str(&raw).expect("checkpoint json")
}

#[tokio::test]
async fn checkpointed_documents_are_skipped_and_the_rest_completes() {
    let fx = fixture(&[
        ("a.md", "Contents of A."),
        ("b.md", "Contents of B."),
        ("c.md", "Contents of C."),
    ])
    .await;
    tokio::fs::write(&fx.options.progress_file, r#"["a.md", "b.md"]"#)
        .await
        .expect("seed checkpoint");

    let summarizer = Arc::new(MockSummarizer::new("a summary"));
    let report = pipeline::run(&fx.options, summarizer).await.expect("run");

    assert_eq!(report.total, 3);
    assert_eq!(report.already_done, 2);
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);

    let records = read_records(&fx.options.output_file).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document_name, "c.md");
    assert_eq!(records[0].chunk, "Contents of C.");
    assert_eq!(records[0].summary, "a summary");

    let checkpoint = read_checkpoint(&fx.options.progress_file).await;
    assert_eq!(checkpoint, vec!["a.md", "b.md", "c.md"]);
}

#[tokio::test]
async fn a_failing_document_stays_pending_and_is_retried_next_run() {
    let fx = fixture(&[
        ("good_one.md", "Fine text."),
        ("poisoned.md", "Text with FAILURE-MARKER inside."),
        ("good_two.md", "More fine text."),
    ])
    .await;

    let flaky = Arc::new(MockSummarizer::new("summary").failing_on("FAILURE-MARKER"));
    let first = pipeline::run(&fx.options, flaky).await.expect("first run");

    assert_eq!(first.processed, 2);
    assert_eq!(first.failed, 1);
    let checkpoint = read_checkpoint(&fx.options.progress_file).await;
    assert_eq!(checkpoint, vec!["good_one.md", "good_two.md"]);

    // Next run, the external collaborator recovered.
    let healthy = Arc::new(MockSummarizer::new("summary"));
    let second = pipeline::run(&fx.options, healthy).await.expect("second run");

    assert_eq!(second.already_done, 2);
    assert_eq!(second.processed, 1);
    assert_eq!(second.failed, 0);
    let checkpoint = read_checkpoint(&fx.options.progress_file).await;
    assert_eq!(
        checkpoint,
        vec!["good_one.md", "good_two.md", "poisoned.md"]
    );

    let records = read_records(&fx.options.output_file).await;
    assert!(records.iter().any(|r| r.document_name == "poisoned.md"));
}

#[tokio::test]
async fn long_documents_produce_ordered_multi_chunk_records() {
    let long_body = format!(
        "# Title\n\n## Intro\nShort body.\n\n## Details\n{}",
        "x".repeat(6000)
    );
    let fx = fixture(&[("www_example_org_en_guide.md", long_body.as_str())]).await;

    let summarizer = Arc::new(MockSummarizer::new("guide summary"));
    let report = pipeline::run(&fx.options, summarizer).await.expect("run");
    assert_eq!(report.processed, 1);

    let records = read_records(&fx.options.output_file).await;
    assert_eq!(records.len(), 2);

    let seqs: Vec<usize> = records.iter().map(|r| r.seq_num).collect();
    assert_eq!(seqs, vec![0, 1]);
    assert_ne!(records[0].document_id, records[1].document_id);

    for record in &records {
        assert_eq!(record.document_name, "www_example_org_en_guide.md");
        assert_eq!(record.link, "https://www.example.org/en/guide");
        assert!(record.chunk.starts_with("[Source](https://www.example.org/en/guide)"));
        assert_eq!(record.keywords, vec!["guide"]);
    }
    assert!(records[0].chunk.contains("## Intro"));
    assert!(records[1].chunk.contains("## Details"));
}

#[tokio::test]
async fn a_completed_corpus_runs_to_a_no_op() {
    let fx = fixture(&[("a.md", "A."), ("b.md", "B.")]).await;

    let summarizer = Arc::new(MockSummarizer::new("s"));
    let first = pipeline::run(&fx.options, summarizer.clone()).await.expect("first");
    assert_eq!(first.processed, 2);

    let second = pipeline::run(&fx.options, summarizer).await.expect("second");
    assert_eq!(second.total, 2);
    assert_eq!(second.already_done, 2);
    assert_eq!(second.processed, 0);

    // No duplicate records were appended by the second run.
    let records = read_records(&fx.options.output_file).await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn many_documents_under_few_workers_all_land_in_log_and_checkpoint() {
    let bodies: Vec<(String, String)> = (0..20)
        .map(|i| {
            (
                format!("doc_{i:02}.md"),
                format!("# Doc {i}\n\nParagraph for document {i}."),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = bodies
        .iter()
        .map(|(n, b)| (n.as_str(), b.as_str()))
        .collect();
    let mut fx = fixture(&borrowed).await;
    fx.options.max_workers = 3;

    let summarizer = Arc::new(MockSummarizer::new("s"));
    let report = pipeline::run(&fx.options, summarizer).await.expect("run");

    assert_eq!(report.processed, 20);
    assert_eq!(report.failed, 0);

    let records = read_records(&fx.options.output_file).await;
    assert_eq!(records.len(), 20);

    let checkpoint = read_checkpoint(&fx.options.progress_file).await;
    assert_eq!(checkpoint.len(), 20);
    let mut sorted = checkpoint.clone();
    sorted.sort();
    assert_eq!(checkpoint, sorted, "checkpoint must be stored sorted");
}
