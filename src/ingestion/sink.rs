//! Append-only JSONL sink for chunk records.

use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::record::ChunkRecord;
use crate::types::PrepError;

/// Shared, append-only record log.
///
/// The file handle is the one piece of state shared across workers; the mutex
/// is held for a whole append-flush-sync cycle so concurrent calls can never
/// interleave their lines, and a successful `append` is durable before it
/// returns.
pub struct RecordSink {
    file: Mutex<File>,
}

impl RecordSink {
    /// Opens (or creates) the log at `path` in append mode.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PrepError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends `records` as one contiguous block of JSONL lines.
    ///
    /// Serialization happens before the lock is taken; the write, flush, and
    /// fsync happen under it.
    pub async fn append(&self, records: &[ChunkRecord]) -> Result<(), PrepError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut block = Vec::new();
        for record in records {
            serde_json::to_writer(&mut block, record)?;
            block.push(b'\n');
        }

        let mut file = self.file.lock().await;
        file.write_all(&block).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}
