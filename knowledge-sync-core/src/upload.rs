//! Per-file upload and association against the knowledge service.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::contract::{KnowledgeApi, NewFile};
use crate::error::SyncError;

/// Outcome of associating a file with a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// The add call was issued and succeeded.
    Added,
    /// The collection already listed the file; nothing was sent.
    AlreadyPresent,
}

/// Read `path` and store it on the service, returning the new file identifier.
///
/// The stored name is `path` relative to `content_root`, with `/` separators.
pub async fn upload_document<K>(api: &K, content_root: &Path, path: &Path) -> Result<String, SyncError>
where
    K: KnowledgeApi + ?Sized,
{
    let content = std::fs::read(path)?;
    let file_name = upload_name(content_root, path);
    debug!(file = %file_name, size = content.len(), "Uploading file");

    let uploaded = api.upload_file(NewFile { file_name, content }).await?;
    if uploaded.id.is_empty() {
        return Err(SyncError::Parse(
            "upload response has an empty id".to_string(),
        ));
    }
    info!(file_id = %uploaded.id, file = %uploaded.file_name, "Uploaded file");
    Ok(uploaded.id)
}

/// Attach `file_id` to the collection unless it is already attached.
pub async fn associate<K>(api: &K, collection_id: &str, file_id: &str) -> Result<Association, SyncError>
where
    K: KnowledgeApi + ?Sized,
{
    if is_associated(api, collection_id, file_id).await {
        debug!(collection_id, file_id, "File already in collection, skipping add");
        return Ok(Association::AlreadyPresent);
    }
    api.add_file(collection_id, file_id).await?;
    Ok(Association::Added)
}

/// Membership check against a fresh copy of the collection.
///
/// A failed lookup counts as "not present": the add call that follows is the
/// authoritative one.
pub async fn is_associated<K>(api: &K, collection_id: &str, file_id: &str) -> bool
where
    K: KnowledgeApi + ?Sized,
{
    match api.get_collection(collection_id).await {
        Ok(collection) => collection.file_ids.iter().any(|id| id == file_id),
        Err(e) => {
            warn!(error = %e, collection_id, file_id, "Error checking file in knowledge");
            false
        }
    }
}

fn upload_name(content_root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(content_root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
