#![doc = "HTTP client for the knowledge service: implements the core `KnowledgeApi` contract over reqwest."]
//
//! # Knowledge service client
//!
//! [`KnowledgeClient`] is the production implementation of
//! [`knowledge_sync_core::contract::KnowledgeApi`]. Every call is authenticated
//! with a bearer token, sends JSON (multipart for file uploads) and decodes JSON
//! responses with serde.
//!
//! | Call                  | Method | Path                       |
//! |-----------------------|--------|----------------------------|
//! | list collections      | GET    | `knowledge/list`           |
//! | reset collection      | POST   | `knowledge/{id}/reset`     |
//! | create collection     | POST   | `knowledge/create`         |
//! | get collection        | GET    | `knowledge/{id}`           |
//! | upload file           | POST   | `files/`                   |
//! | add file to collection| POST   | `knowledge/{id}/file/add`  |

use async_trait::async_trait;
use knowledge_sync_core::config::ApiConfig;
use knowledge_sync_core::contract::{
    Collection, KnowledgeApi, NewCollection, NewFile, UploadedFile,
};
use knowledge_sync_core::SyncError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// Wire shape of a collection. Older servers list `file_ids` at the top level,
/// newer ones nest them under `data`.
#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    file_ids: Option<Vec<String>>,
    #[serde(default)]
    data: Option<CollectionData>,
}

#[derive(Debug, Deserialize)]
struct CollectionData {
    #[serde(default)]
    file_ids: Option<Vec<String>>,
}

impl From<CollectionResponse> for Collection {
    fn from(raw: CollectionResponse) -> Self {
        let file_ids = raw
            .file_ids
            .or_else(|| raw.data.and_then(|d| d.file_ids))
            .unwrap_or_default();
        Collection {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            file_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    id: String,
    #[serde(default)]
    filename: Option<String>,
}

pub struct KnowledgeClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl KnowledgeClient {
    pub fn new(api: &ApiConfig) -> Result<Self, SyncError> {
        if api.api_key.trim().is_empty() {
            tracing::error!("Knowledge API key is empty");
            return Err(SyncError::Config("API key must not be empty".into()));
        }
        let http = Client::builder().build().map_err(|e| {
            tracing::error!(error = ?e, "Failed to build HTTP client");
            SyncError::Http(e)
        })?;
        tracing::info!(
            base_url = %api.base_url,
            api_key_set = !api.api_key.is_empty(),
            "Initialized KnowledgeClient"
        );
        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fail with [`SyncError::Remote`] unless the status is a success.
    fn expect_success(response: Response, operation: &'static str) -> Result<Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::error!(status = %status, operation, "Knowledge API returned error status");
            Err(SyncError::remote(operation, status.as_u16()))
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, SyncError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = ?e, what, "Failed to decode response body");
        SyncError::Parse(format!("unmarshaling {what} response: {e}"))
    })
}

#[async_trait]
impl KnowledgeApi for KnowledgeClient {
    async fn list_collections(&self) -> Result<Vec<Collection>, SyncError> {
        tracing::info!("Listing knowledge collections");
        let response = self
            .http
            .get(self.endpoint("knowledge/list"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let response = Self::expect_success(response, "list knowledge")?;
        let raw: Vec<CollectionResponse> = decode(response, "list knowledge").await?;
        Ok(raw.into_iter().map(Collection::from).collect())
    }

    async fn reset_collection(&self, collection_id: &str) -> Result<(), SyncError> {
        tracing::info!(collection_id, "Resetting knowledge collection");
        let response = self
            .http
            .post(self.endpoint(&format!("knowledge/{collection_id}/reset")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::expect_success(response, "reset knowledge")?;
        Ok(())
    }

    async fn create_collection(&self, req: NewCollection) -> Result<Collection, SyncError> {
        tracing::info!(name = %req.name, "Creating knowledge collection");
        let body = json!({
            "name": req.name,
            "description": req.description,
            "data": { "file_ids": [] },
        });
        let response = self
            .http
            .post(self.endpoint("knowledge/create"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::expect_success(response, "create knowledge")?;
        let raw: CollectionResponse = decode(response, "create knowledge").await?;
        tracing::info!(collection_id = %raw.id, "Created knowledge collection");
        Ok(raw.into())
    }

    async fn get_collection(&self, collection_id: &str) -> Result<Collection, SyncError> {
        tracing::debug!(collection_id, "Fetching knowledge collection");
        let response = self
            .http
            .get(self.endpoint(&format!("knowledge/{collection_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let response = Self::expect_success(response, "get knowledge")?;
        let raw: CollectionResponse = decode(response, "get knowledge").await?;
        Ok(raw.into())
    }

    async fn upload_file(&self, req: NewFile) -> Result<UploadedFile, SyncError> {
        tracing::info!(file = %req.file_name, size = req.content.len(), "Uploading file");
        let part = Part::bytes(req.content).file_name(req.file_name.clone());
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.endpoint("files/"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, file = %req.file_name, "File upload rejected");
            return Err(SyncError::Upload {
                status: status.as_u16(),
            });
        }
        let raw: FileResponse = decode(response, "upload").await?;
        Ok(UploadedFile {
            id: raw.id,
            file_name: raw.filename.unwrap_or(req.file_name),
        })
    }

    async fn add_file(&self, collection_id: &str, file_id: &str) -> Result<(), SyncError> {
        tracing::info!(collection_id, file_id, "Adding file to knowledge collection");
        let response = self
            .http
            .post(self.endpoint(&format!("knowledge/{collection_id}/file/add")))
            .bearer_auth(&self.api_key)
            .json(&json!({ "file_id": file_id }))
            .send()
            .await?;
        Self::expect_success(response, "add file")?;
        Ok(())
    }
}
