//! High-level pipeline: orchestrates collection setup → fetch → extract → walk → upload.
//!
//! One call to [`synchronise`] performs a complete run:
//!   - Ensures the configured collection exists and is empty (reset or create)
//!   - Downloads the documentation archive into a per-run scratch directory
//!   - Extracts the documentation files into `<work_dir>/docs_content`
//!   - Walks that tree and, per file, uploads it and associates it with the collection
//!   - Returns a [`SynchroniseReport`] with the success/failure tally
//!
//! # Error Handling
//! Setup steps are fail-fast: the first error is returned and nothing is
//! uploaded. Per-file steps never abort the run; their errors are logged and
//! counted in the report. The scratch directory is removed on every exit path.
//!
//! # Callable From
//! - The CLI crate (with the real HTTP client and [`HttpArchiveFetcher`])
//! - Integration tests (with `MockKnowledgeApi` / `MockArchiveFetcher`)
//!
//! [`HttpArchiveFetcher`]: crate::download::HttpArchiveFetcher

use tracing::{error, info};

use crate::collection::ensure_collection;
use crate::config::SyncConfig;
use crate::contract::{ArchiveFetcher, KnowledgeApi};
use crate::error::SyncError;
use crate::extract::extract_docs;
use crate::upload::{associate, upload_document};
use crate::walker::discover_docs;

pub use crate::report::{FailedStage, FileOutcome, FileReport, SynchroniseReport};

/// File name of the downloaded archive inside the scratch directory.
const ARCHIVE_FILE_NAME: &str = "docs.zip";

pub async fn synchronise<K, F>(
    config: &SyncConfig,
    api: &K,
    fetcher: &F,
) -> Result<SynchroniseReport, SyncError>
where
    K: KnowledgeApi + ?Sized,
    F: ArchiveFetcher + ?Sized,
{
    info!("[SYNC] Starting full synchronisation pipeline");

    // --- Setup: collection ---
    let collection_id = ensure_collection(api, &config.collection).await?;
    info!(collection_id = %collection_id, "[SYNC] Collection initialization complete");

    // --- Setup: fetch + extract into a scratch dir that is always removed ---
    let content_dir = config.content_dir();
    {
        let scratch = tempfile::Builder::new()
            .prefix("knowledge-sync")
            .tempdir()?;
        let archive_path = scratch.path().join(ARCHIVE_FILE_NAME);

        fetcher.fetch(&config.archive_url, &archive_path).await.map_err(|e| {
            error!(error = %e, url = %config.archive_url, "[SYNC][ERROR] Download failed");
            e
        })?;

        extract_docs(&archive_path, scratch.path(), &content_dir).map_err(|e| {
            error!(error = %e, "[SYNC][ERROR] Extraction failed");
            e
        })?;
    }

    // --- Setup: enumerate ---
    let files = discover_docs(&content_dir)?;
    info!(
        content_dir = %content_dir.display(),
        total = files.len(),
        "[SYNC] Beginning upload of all documentation files"
    );

    // --- Per-file upload + associate; failures are isolated ---
    let mut report = SynchroniseReport::new(collection_id.clone());
    let total = files.len();
    for (index, path) in files.into_iter().enumerate() {
        info!("Processing ({}/{}): {}", index + 1, total, path.display());

        let file_id = match upload_document(api, &content_dir, &path).await {
            Ok(id) => id,
            Err(e) => {
                report.record_failure(path, FailedStage::Upload, &e);
                continue;
            }
        };

        match associate(api, &collection_id, &file_id).await {
            Ok(association) => report.record_success(path, file_id, association),
            Err(e) => report.record_failure(path, FailedStage::Associate, &e),
        }
    }

    report.log_summary();
    Ok(report)
}
