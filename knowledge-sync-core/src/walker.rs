use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use crate::error::SyncError;

/// File name suffixes treated as documentation.
pub const DOC_SUFFIXES: &[&str] = &[".md", ".mdx"];

/// True when the last path component ends in one of [`DOC_SUFFIXES`] (case-sensitive).
pub fn is_doc_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| DOC_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
        .unwrap_or(false)
}

/// Every documentation file under `root`, depth-first, siblings in file name order.
///
/// Any traversal error is returned: the walk is part of run setup.
pub fn discover_docs(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_doc_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    info!(root = %root.display(), count = files.len(), "Discovered documentation files");
    Ok(files)
}
