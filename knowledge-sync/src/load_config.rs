/// `load_config` module: builds the run's [`SyncConfig`] from defaults, an optional static YAML
/// file and the environment.
///
/// # Sources, lowest to highest precedence
/// 1. Built-in defaults (see `knowledge_sync_core::config`)
/// 2. A YAML file whose path is in `KNOWLEDGE_SYNC_CONFIG`, if set
/// 3. The `--zip-url` flag for the archive URL
///
/// The API credential is never read from a file: it always comes from the
/// `KNOWLEDGE_API_KEY` environment variable.
///
/// # Errors
/// All errors are `anyhow::Error` with the offending path or variable in the message.
///
/// Example file:
/// ```yaml
/// api_url: https://chat.example.com/api/v1/
/// work_dir: /var/lib/knowledge-sync
/// collection:
///   name: OpenWebUI Documentation
///   description: Documentation for Open WebUI
/// ```
use anyhow::{Context, Result};
use knowledge_sync_core::config::{ApiConfig, CollectionConfig, SyncConfig, DEFAULT_API_URL};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const API_KEY_ENV: &str = "KNOWLEDGE_API_KEY";
pub const CONFIG_PATH_ENV: &str = "KNOWLEDGE_SYNC_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticConfig {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    work_dir: Option<PathBuf>,
    #[serde(default)]
    collection: Option<CollectionSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CollectionSection {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn read_static_config(path: &Path) -> Result<StaticConfig> {
    info!(config_path = ?path, "Loading configuration from file");
    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path, e)
    })?;
    let parsed: StaticConfig = serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;
    info!(config_path = ?path, "Parsed config YAML successfully");
    Ok(parsed)
}

/// Merge defaults, the optional YAML file at `config_path`, the archive URL and
/// the `KNOWLEDGE_API_KEY` secret into a [`SyncConfig`].
pub fn load_config(config_path: Option<&Path>, archive_url: String) -> Result<SyncConfig> {
    let static_conf = match config_path {
        Some(path) => read_static_config(path)?,
        None => StaticConfig::default(),
    };

    let api_key = match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => {
            info!("{API_KEY_ENV} found in env");
            key
        }
        Ok(_) => {
            error!("{API_KEY_ENV} is set but empty");
            anyhow::bail!("{API_KEY_ENV} environment variable is empty");
        }
        Err(e) => {
            error!(error = ?e, "{API_KEY_ENV} environment variable not set");
            return Err(anyhow::anyhow!(
                "{API_KEY_ENV} environment variable not set: {e}"
            ));
        }
    };

    let mut collection = CollectionConfig::default();
    if let Some(section) = static_conf.collection {
        if let Some(name) = section.name {
            collection.name = name;
        }
        if let Some(description) = section.description {
            collection.description = description;
        }
    }

    let work_dir = match static_conf.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };

    let config = SyncConfig {
        api: ApiConfig {
            base_url: static_conf
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key,
        },
        collection,
        archive_url,
        work_dir,
    };
    config.trace_loaded();
    Ok(config)
}

/// Path of the optional YAML file, taken from `KNOWLEDGE_SYNC_CONFIG`.
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
