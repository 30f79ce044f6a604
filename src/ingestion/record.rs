//! The persisted record shape and its builder.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One chunk of one document, wrapped with the metadata downstream ingestion
/// needs. This is exactly the shape serialized to the JSONL record log.
///
/// `document_id` is freshly generated per record, so `document_name` plus
/// `seq_num` (not the id) form the natural deduplication key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub document_id: Uuid,
    pub document_name: String,
    pub link: String,
    pub seq_num: usize,
    pub chunk: String,
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Wraps rendered chunks into records, assigning each its positional
/// sequence number.
pub fn build_records(
    document_name: &str,
    link: &str,
    summary: &str,
    keywords: &[String],
    chunks: Vec<String>,
) -> Vec<ChunkRecord> {
    chunks
        .into_iter()
        .enumerate()
        .map(|(seq_num, chunk)| ChunkRecord {
            document_id: Uuid::new_v4(),
            document_name: document_name.to_string(),
            link: link.to_string(),
            seq_num,
            chunk,
            summary: summary.to_string(),
            keywords: keywords.to_vec(),
        })
        .collect()
}
