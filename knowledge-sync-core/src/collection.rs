use tracing::{error, info};

use crate::config::CollectionConfig;
use crate::contract::{KnowledgeApi, NewCollection};
use crate::error::SyncError;

/// Make sure a collection named `config.name` exists and has no files attached.
///
/// The first collection whose name matches exactly is reset and reused;
/// otherwise a new, empty collection is created. Returns its identifier.
pub async fn ensure_collection<K>(api: &K, config: &CollectionConfig) -> Result<String, SyncError>
where
    K: KnowledgeApi + ?Sized,
{
    let collections = api.list_collections().await.map_err(|e| {
        error!(error = %e, "Failed to list knowledge collections");
        e
    })?;
    info!(count = collections.len(), "Listed knowledge collections");

    if let Some(existing) = collections.iter().find(|c| c.name == config.name) {
        info!(collection_id = %existing.id, name = %existing.name, "Found existing collection, resetting it");
        reset(api, &existing.id).await?;
        return Ok(existing.id.clone());
    }

    info!(name = %config.name, "No collection with this name, creating it");
    let created = api
        .create_collection(NewCollection {
            name: config.name.clone(),
            description: config.description.clone(),
        })
        .await
        .map_err(|e| {
            error!(error = %e, name = %config.name, "Failed to create collection");
            e
        })?;
    if created.id.is_empty() {
        return Err(SyncError::Parse(
            "create knowledge response has an empty id".to_string(),
        ));
    }
    info!(collection_id = %created.id, "Created collection");
    Ok(created.id)
}

/// Clear every file association of a collection. Safe to repeat.
pub async fn reset<K>(api: &K, collection_id: &str) -> Result<(), SyncError>
where
    K: KnowledgeApi + ?Sized,
{
    api.reset_collection(collection_id).await.map_err(|e| {
        error!(error = %e, collection_id, "Failed to reset collection");
        e
    })
}
