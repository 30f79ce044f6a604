//! Offline pass collapsing duplicate records left behind by reprocessed
//! documents. Reads OUTPUT_FILE, writes DEDUPED_FILE.

use std::env;
use std::path::PathBuf;

use chunksmith::ingestion::maintenance::dedupe_records;
use chunksmith::types::PrepError;

#[tokio::main]
async fn main() -> Result<(), PrepError> {
    dotenvy::dotenv().ok();

    let input = PathBuf::from(
        env::var("OUTPUT_FILE").unwrap_or_else(|_| "chunks.jsonl".to_string()),
    );
    let output = PathBuf::from(
        env::var("DEDUPED_FILE").unwrap_or_else(|_| "deduped_chunks.jsonl".to_string()),
    );

    let report = dedupe_records(&input, &output).await?;

    println!("Deduplication complete");
    println!("  records read : {}", report.total);
    println!("  records kept : {}", report.unique);
    println!("  output       : {}", output.display());
    Ok(())
}
