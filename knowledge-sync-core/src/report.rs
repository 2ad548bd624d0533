//! Per-file outcomes and the final tally of a run.

use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

use crate::error::SyncError;
use crate::upload::Association;

/// Which per-file step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Upload,
    Associate,
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedStage::Upload => f.write_str("upload"),
            FailedStage::Associate => f.write_str("associate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Uploaded {
        file_id: String,
        association: Association,
    },
    Failed {
        stage: FailedStage,
        error: String,
    },
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Result of a completed run. Individual file failures do not make a run fail;
/// they only show up here.
#[derive(Debug, Clone)]
pub struct SynchroniseReport {
    pub collection_id: String,
    pub successful_uploads: usize,
    pub failed_uploads: usize,
    pub files: Vec<FileReport>,
}

impl SynchroniseReport {
    pub fn new(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            successful_uploads: 0,
            failed_uploads: 0,
            files: Vec::new(),
        }
    }

    pub fn record_success(&mut self, path: PathBuf, file_id: String, association: Association) {
        info!(file_id = %file_id, ?association, "Successfully processed: {}", path.display());
        self.successful_uploads += 1;
        self.files.push(FileReport {
            path,
            outcome: FileOutcome::Uploaded {
                file_id,
                association,
            },
        });
    }

    pub fn record_failure(&mut self, path: PathBuf, stage: FailedStage, err: &SyncError) {
        let what = match stage {
            FailedStage::Upload => "Failed to upload",
            FailedStage::Associate => "Failed to add to knowledge base",
        };
        error!(stage = %stage, "{}: {}, error: {}", what, path.display(), err);
        self.failed_uploads += 1;
        self.files.push(FileReport {
            path,
            outcome: FileOutcome::Failed {
                stage,
                error: err.to_string(),
            },
        });
    }

    /// True when every discovered file was uploaded and associated.
    pub fn is_complete(&self) -> bool {
        self.failed_uploads == 0
    }

    /// Emit the closing tally.
    pub fn log_summary(&self) {
        info!(collection_id = %self.collection_id, "Upload processing complete.");
        info!("Successfully processed: {} files", self.successful_uploads);
        info!("Failed to process: {} files", self.failed_uploads);
    }
}
