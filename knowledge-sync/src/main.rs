use anyhow::Result;
use clap::Parser;
use knowledge_sync::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment (.env is optional)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    let report = match run(cli).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            return Err(e);
        }
    };

    println!("Upload processing complete.");
    println!("Successfully processed: {} files", report.successful_uploads);
    println!("Failed to process: {} files", report.failed_uploads);
    Ok(())
}
