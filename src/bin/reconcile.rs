//! Rebuilds the checkpoint file from the record log, for when the progress
//! file was lost or predates a corpus move.

use std::path::PathBuf;

use chunksmith::config::PrepConfig;
use chunksmith::ingestion::maintenance::rebuild_progress;
use chunksmith::types::PrepError;

#[tokio::main]
async fn main() -> Result<(), PrepError> {
    dotenvy::dotenv().ok();

    let config = PrepConfig::from_env()?;
    let record_log: PathBuf = config.output_file.clone();

    let report = rebuild_progress(&record_log, &config.resource_root, &config.progress_file).await?;

    println!("Checkpoint reconciled from {}", record_log.display());
    println!("  files found : {}", report.total);
    println!("  done        : {}", report.done);
    println!("  todo        : {}", report.todo);
    println!("  checkpoint  : {}", config.progress_file.display());
    Ok(())
}
