//! # contract: seams between the pipeline and the outside world
//!
//! Two traits cover every side effect the pipeline has beyond the local
//! filesystem:
//! - [`KnowledgeApi`]: the remote knowledge service (collections and files).
//! - [`ArchiveFetcher`]: getting the documentation archive onto local disk.
//!
//! Both are annotated for `mockall`, so the whole pipeline can run in tests
//! against `MockKnowledgeApi` / `MockArchiveFetcher`.

use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

use crate::error::SyncError;

/// A knowledge collection as known by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Identifiers of the files currently associated with the collection.
    pub file_ids: Vec<String>,
}

/// Data needed to create a collection. New collections start without files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollection {
    pub name: String,
    pub description: String,
}

/// A file to be stored by the remote service.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Name the service records for the upload (path relative to the content root).
    pub file_name: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

/// A stored file as returned by the upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: String,
    pub file_name: String,
}

/// The remote knowledge service.
///
/// Every method is a single HTTP call. Implementors map non-success statuses to
/// [`SyncError::Remote`] (or [`SyncError::Upload`] for `upload_file`) and
/// undecodable bodies to [`SyncError::Parse`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait KnowledgeApi: Send + Sync {
    /// List every collection visible to the credential.
    async fn list_collections(&self) -> Result<Vec<Collection>, SyncError>;

    /// Drop all file associations of a collection.
    async fn reset_collection(&self, collection_id: &str) -> Result<(), SyncError>;

    /// Create a collection with an empty file list.
    async fn create_collection(&self, req: NewCollection) -> Result<Collection, SyncError>;

    /// Fetch one collection, including its current file identifiers.
    async fn get_collection(&self, collection_id: &str) -> Result<Collection, SyncError>;

    /// Store a file; returns the identifier the service assigned to it.
    async fn upload_file(&self, req: NewFile) -> Result<UploadedFile, SyncError>;

    /// Associate a stored file with a collection.
    async fn add_file(&self, collection_id: &str, file_id: &str) -> Result<(), SyncError>;
}

/// Gets the documentation archive onto local disk.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Write the resource at `url` to `dest`, returning the number of bytes written.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SyncError>;
}
