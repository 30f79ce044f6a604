use std::sync::Arc;

use tracing_subscriber::FmtSubscriber;

use chunksmith::config::PrepConfig;
use chunksmith::ingestion::{PipelineOptions, pipeline};
use chunksmith::summarize::OllamaSummarizer;
use chunksmith::types::PrepError;

#[tokio::main]
async fn main() -> Result<(), PrepError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PrepConfig::from_env()?;

    let client = reqwest::Client::builder().use_rustls_tls().build()?;
    let summarizer = Arc::new(OllamaSummarizer::new(
        client,
        &config.ollama_base_url,
        config.llm_model.clone(),
    )?);

    let options = PipelineOptions::from(&config);
    let report = pipeline::run(&options, summarizer).await?;

    println!("\n✅ Pre-processing complete");
    println!("  files found   : {}", report.total);
    println!("  already done  : {}", report.already_done);
    println!("  processed now : {}", report.processed);
    println!("  failed        : {}", report.failed);
    println!("  record log    : {}", options.output_file.display());
    println!("  checkpoint    : {}", options.progress_file.display());

    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder().with_env_filter("info").finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
