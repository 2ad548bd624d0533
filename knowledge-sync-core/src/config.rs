use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1/";
pub const DEFAULT_COLLECTION_NAME: &str = "OpenWebUI Documentation";
pub const DEFAULT_COLLECTION_DESCRIPTION: &str = "Documentation for Open WebUI";
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://github.com/open-webui/docs/archive/refs/heads/main.zip";

/// Name of the flattened documentation tree under the work directory.
pub const CONTENT_DIR_NAME: &str = "docs_content";

/// Everything one synchronisation run needs, passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api: ApiConfig,
    pub collection: CollectionConfig,
    pub archive_url: String,
    pub work_dir: PathBuf,
}

impl SyncConfig {
    /// Directory the documentation files are flattened into.
    pub fn content_dir(&self) -> PathBuf {
        self.work_dir.join(CONTENT_DIR_NAME)
    }

    pub fn trace_loaded(&self) {
        info!(
            api_url = %self.api.base_url,
            collection = %self.collection.name,
            archive_url = %self.archive_url,
            work_dir = %self.work_dir.display(),
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}

/// Where and how to reach the knowledge service.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// The knowledge collection the documentation is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    pub name: String,
    pub description: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COLLECTION_NAME.to_string(),
            description: DEFAULT_COLLECTION_DESCRIPTION.to_string(),
        }
    }
}
