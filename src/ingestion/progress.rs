//! Durable checkpoint of completed document names.
//!
//! The store is owned by the scheduler's coordinating loop, never by worker
//! tasks, so its in-memory set needs no lock. Persistence rewrites the whole
//! file on every update: the snapshot on disk is always complete and sorted,
//! and a write-temp-then-rename keeps a crash mid-write from truncating the
//! previous snapshot.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::types::PrepError;

/// Set of documents already processed, persisted as a pretty-printed, sorted
/// JSON array of base filenames.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    done: HashSet<String>,
}

impl ProgressStore {
    /// Loads the checkpoint at `path`.
    ///
    /// A missing file is an empty set. A present but unparseable file is a
    /// fatal startup error: resuming on an assumed-empty set would silently
    /// reprocess the whole corpus.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, PrepError> {
        let path = path.into();
        let done = match fs::read_to_string(&path).await {
            Ok(data) => {
                let entries: Vec<String> = serde_json::from_str(&data).map_err(|source| {
                    PrepError::CorruptProgress {
                        path: path.clone(),
                        source,
                    }
                })?;
                // Older checkpoints stored full paths; compare by base name.
                entries.iter().map(|entry| base_name(entry)).collect()
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, done })
    }

    /// An empty store bound to `path`, skipping the load step. The
    /// reconciliation pass uses this to replace a corrupt checkpoint.
    pub(crate) fn fresh(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            done: HashSet::new(),
        }
    }

    /// Path of the persisted checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `name` (a base filename) has already completed.
    pub fn contains(&self, name: &str) -> bool {
        self.done.contains(name)
    }

    /// Number of completed documents.
    pub fn len(&self) -> usize {
        self.done.len()
    }

    /// `true` when nothing has completed yet.
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Marks `name` complete and persists the updated snapshot.
    pub async fn mark_done(&mut self, name: impl Into<String>) -> Result<(), PrepError> {
        let inserted = self.done.insert(name.into());
        if !inserted && fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }
        self.persist().await
    }

    /// Replaces the in-memory set wholesale and persists it. Used by the
    /// offline reconciliation pass.
    pub async fn replace(&mut self, names: HashSet<String>) -> Result<(), PrepError> {
        self.done = names;
        self.persist().await
    }

    async fn persist(&self) -> Result<(), PrepError> {
        let mut names: Vec<&String> = self.done.iter().collect();
        names.sort_unstable();
        let serialized = serde_json::to_string_pretty(&names)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn base_name(entry: &str) -> String {
    Path::new(entry)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProgressStore::load(dir.path().join("progress.json"))
            .await
            .expect("load");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn marks_persist_sorted_across_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");

        let mut store = ProgressStore::load(&path).await.expect("load");
        store.mark_done("b.md").await.expect("mark");
        store.mark_done("a.md").await.expect("mark");

        let raw = tokio::fs::read_to_string(&path).await.expect("read");
        let parsed: Vec<String> = serde_json::from_str(&raw).expect("json");
        assert_eq!(parsed, vec!["a.md", "b.md"]);
        assert!(raw.contains('\n'), "checkpoint should be pretty-printed");

        let reloaded = ProgressStore::load(&path).await.expect("reload");
        assert!(reloaded.contains("a.md"));
        assert!(reloaded.contains("b.md"));
        assert_eq!(reloaded.len(), 2);
    }

    #[tokio::test]
    async fn stored_paths_are_normalized_to_base_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");
        tokio::fs::write(&path, r#"["/old/tree/a.md", "b.md"]"#)
            .await
            .expect("seed");

        let store = ProgressStore::load(&path).await.expect("load");
        assert!(store.contains("a.md"));
        assert!(store.contains("b.md"));
    }

    #[tokio::test]
    async fn corrupt_checkpoint_fails_fast() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");
        tokio::fs::write(&path, "{ not json").await.expect("seed");

        let err = ProgressStore::load(&path).await.expect_err("must fail");
        assert!(matches!(err, PrepError::CorruptProgress { .. }));
    }

    #[tokio::test]
    async fn remarking_a_done_document_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");

        let mut store = ProgressStore::load(&path).await.expect("load");
        store.mark_done("a.md").await.expect("mark");
        store.mark_done("a.md").await.expect("remark");

        let raw = tokio::fs::read_to_string(&path).await.expect("read");
        let parsed: Vec<String> = serde_json::from_str(&raw).expect("json");
        assert_eq!(parsed, vec!["a.md"]);
    }
}
