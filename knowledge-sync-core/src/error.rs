//! Error taxonomy shared by every pipeline stage.

use thiserror::Error;

/// Everything that can go wrong during a synchronisation run.
///
/// Setup stages (collection init, download, extraction, walk) surface these
/// as fatal; the per-file stages record them in the run report instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetching the documentation archive failed (network, status or local write).
    #[error("download failed: {0}")]
    Download(String),

    /// The archive could not be opened or an entry could not be read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Local filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file upload endpoint answered with a non-success status.
    #[error("upload failed, status code: {status}")]
    Upload { status: u16 },

    /// Any other remote call answered with a non-success status.
    #[error("{operation} failed, status code: {status}")]
    Remote { operation: &'static str, status: u16 },

    /// An expected field was missing from (or malformed in) a response.
    #[error("could not parse response: {0}")]
    Parse(String),

    /// Transport-level failure talking to the knowledge service.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Shorthand for building a [`SyncError::Remote`].
    pub fn remote(operation: &'static str, status: u16) -> Self {
        SyncError::Remote { operation, status }
    }
}
