//! ```text
//! Resource tree ──► ingestion::document (discover, link, keywords)
//!                                 │
//!         Checkpoint ◄── ingestion::progress
//!                                 │
//! Pending documents ──► ingestion::pipeline ──► worker tasks
//!                                 │                  │
//!                                 │        summarize::Summarizer
//!                                 │                  │
//!                                 │        chunking::chunk_markdown
//!                                 │                  │
//!                                 │        ingestion::record
//!                                 │                  │
//!                                 └──────── ingestion::sink (JSONL log)
//!
//! Record log ──► ingestion::maintenance (offline dedup, reconciliation)
//! ```
//!
pub mod chunking;
pub mod config;
pub mod ingestion;
pub mod summarize;
pub mod types;

pub use chunking::chunk_markdown;
pub use config::PrepConfig;
pub use ingestion::{PipelineOptions, RunReport};
pub use summarize::{MockSummarizer, OllamaSummarizer, Summarizer};
pub use types::PrepError;
