use futures::StreamExt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

use crate::contract::ArchiveFetcher;
use crate::error::SyncError;

/// Streams an HTTP response body straight to disk.
///
/// No retries: the first failure aborts, since every later stage depends on
/// the archive contents.
#[derive(Clone, Default)]
pub struct HttpArchiveFetcher {
    client: reqwest::Client,
}

impl HttpArchiveFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SyncError> {
        info!(url = %url, dest = %dest.display(), "Downloading archive");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to request archive");
            SyncError::Download(format!("requesting {url}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Archive server returned error status");
            return Err(SyncError::Download(format!(
                "{url} returned status {status}"
            )));
        }

        let mut out = File::create(dest).map_err(|e| {
            error!(error = ?e, path = %dest.display(), "Failed to create archive file");
            SyncError::Download(format!("creating {}: {e}", dest.display()))
        })?;

        let mut written: u64 = 0;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| {
                error!(error = ?e, url = %url, "Archive download interrupted");
                SyncError::Download(format!("reading body of {url}: {e}"))
            })?;
            out.write_all(&chunk).map_err(|e| {
                error!(error = ?e, path = %dest.display(), "Failed to write archive chunk");
                SyncError::Download(format!("writing {}: {e}", dest.display()))
            })?;
            written += chunk.len() as u64;
        }
        out.flush()
            .map_err(|e| SyncError::Download(format!("flushing {}: {e}", dest.display())))?;

        info!(url = %url, bytes = written, "Archive downloaded");
        Ok(written)
    }
}
