/// CLI interface for knowledge-sync: argument parsing and the async `run` entrypoint.
///
/// All pipeline logic lives in `knowledge-sync-core`; this module wires the
/// loaded configuration, the HTTP client and the archive fetcher together.
///
/// - [`Cli`] holds the single `--zip-url` option.
/// - [`run`] is used by `main()` and by integration tests.
use crate::load_config::{config_path_from_env, load_config};
use crate::upload::KnowledgeClient;
use anyhow::Result;
use clap::Parser;
use knowledge_sync_core::config::DEFAULT_ARCHIVE_URL;
use knowledge_sync_core::download::HttpArchiveFetcher;
use knowledge_sync_core::synchronise::{synchronise, SynchroniseReport};

/// Synchronise a documentation archive into a knowledge collection.
///
/// The API key is read from KNOWLEDGE_API_KEY; further settings from the YAML
/// file named by KNOWLEDGE_SYNC_CONFIG.
#[derive(Parser, Debug)]
#[clap(name = "knowledge-sync", version)]
pub struct Cli {
    /// URL of the documentation zip file
    #[clap(long = "zip-url", default_value = DEFAULT_ARCHIVE_URL)]
    pub zip_url: String,
}

/// Runs one synchronisation. Setup failures are returned as errors; per-file
/// failures are only counted in the report.
pub async fn run(cli: Cli) -> Result<SynchroniseReport> {
    tracing::info!(zip_url = %cli.zip_url, "knowledge-sync starting");

    let config = load_config(config_path_from_env().as_deref(), cli.zip_url)?;
    let client = KnowledgeClient::new(&config.api)?;
    let fetcher = HttpArchiveFetcher::new();

    match synchronise(&config, &client, &fetcher).await {
        Ok(report) => {
            tracing::info!(
                collection_id = %report.collection_id,
                successful = report.successful_uploads,
                failed = report.failed_uploads,
                "Synchronisation complete"
            );
            Ok(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "Synchronisation failed");
            Err(anyhow::Error::new(e).context("Synchronisation failed"))
        }
    }
}
