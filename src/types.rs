//! Shared error type for the corpus preparation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by chunking, ingestion, and the offline maintenance passes.
///
/// Task-level failures (IO, HTTP, summarization) are isolated per document by
/// the scheduler; the persisted-state variants are fatal for the operation
/// that hit them.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The checkpoint file exists but is not a JSON array of strings.
    ///
    /// Treated as an unrecoverable startup condition: proceeding on an
    /// assumed-empty set would silently reprocess the whole corpus.
    #[error("progress file {} is not valid JSON: {source}", path.display())]
    CorruptProgress {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A record-log line failed to parse during an offline pass.
    #[error("record log {} has a malformed entry on line {line}", path.display())]
    CorruptRecord { path: PathBuf, line: usize },

    #[error("summarizer returned an empty response")]
    EmptySummary,
}
