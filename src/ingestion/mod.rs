//! The resumable corpus-preparation pipeline and its parts.
//!
//! * [`document`] — source discovery plus filename-derived links/keywords.
//! * [`record`] — the persisted record shape and its builder.
//! * [`sink`] — append-only JSONL output, safe under concurrent writers.
//! * [`progress`] — the durable checkpoint enabling resume.
//! * [`pipeline`] — the bounded worker pool tying it all together.
//! * [`maintenance`] — offline dedup and checkpoint reconciliation.

pub mod document;
pub mod maintenance;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod sink;

pub use document::{SourceDocument, discover_markdown, keywords_for, link_from_filename};
pub use maintenance::{DedupReport, ReconcileReport, dedupe_records, rebuild_progress};
pub use pipeline::{PipelineOptions, RunReport, run};
pub use progress::ProgressStore;
pub use record::{ChunkRecord, build_records};
pub use sink::RecordSink;
