//! Environment-backed configuration for the preparation pipeline.
//!
//! All knobs come from the process environment (a `.env` file is honored by
//! the binaries before this module is consulted). Missing variables fall back
//! to the defaults the scraped-corpus deployment uses; malformed values are
//! reported as [`PrepError::Config`] rather than silently defaulted.

use std::env;
use std::path::PathBuf;

use url::Url;

use crate::types::PrepError;

/// Default chunk size bound, in characters.
pub const DEFAULT_MAX_CHARS: usize = 5000;

/// Default number of concurrent workers.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Resolved configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PrepConfig {
    /// Directory scanned recursively for `*.md` sources.
    pub resource_root: PathBuf,
    /// JSONL record log the sink appends to.
    pub output_file: PathBuf,
    /// Checkpoint file holding completed document names.
    pub progress_file: PathBuf,
    /// Upper bound on concurrently processed documents.
    pub max_workers: usize,
    /// Chunk size bound handed to the chunking engine.
    pub max_chars: usize,
    /// Base URL of the Ollama server used for summaries.
    pub ollama_base_url: Url,
    /// Model name passed to the summarizer.
    pub llm_model: String,
}

impl PrepConfig {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Result<Self, PrepError> {
        let resource_root =
            PathBuf::from(env_or("RESOURCE_FOLDER", "./resources/english"));
        let output_file = PathBuf::from(env_or("OUTPUT_FILE", "chunks.jsonl"));
        let progress_file = PathBuf::from(env_or("PROGRESS_FILE", "progress_pre.json"));

        let max_workers = parse_var("MAX_WORKERS", DEFAULT_MAX_WORKERS)?;
        let max_chars = parse_var("MAX_CHUNK_CHARS", DEFAULT_MAX_CHARS)?;

        let host = env_or("OLLAMA_HOST", "http://localhost");
        let port = env_or("OLLAMA_PORT", "11434");
        let base = format!("{host}:{port}");
        let ollama_base_url = Url::parse(&base)
            .map_err(|err| PrepError::Config(format!("bad Ollama endpoint '{base}': {err}")))?;

        let llm_model = env_or("LLM_MODEL", "phi3");

        Ok(Self {
            resource_root,
            output_file,
            progress_file,
            max_workers,
            max_chars,
            ollama_base_url,
            llm_model,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var(key: &str, default: usize) -> Result<usize, PrepError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<usize>()
            .map_err(|err| PrepError::Config(format!("{key}='{raw}' is not a number: {err}"))),
        Err(_) => Ok(default),
    }
}
