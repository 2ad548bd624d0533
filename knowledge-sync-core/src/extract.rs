//! Content extraction: documentation archive → flattened `docs_content` tree.
//!
//! Extraction happens in two passes:
//! 1. Every archive entry except the first is materialised under a scratch
//!    directory. Directories are always created; files are written only when
//!    their name carries a documentation suffix.
//! 2. The extracted root (the directory named by the archive's first entry) is
//!    walked and every documentation file is copied into the content directory
//!    at the same path relative to that root.
//!
//! The first entry of a source-hosting archive is its synthetic top-level
//! directory (`docs-main/`); it only anchors relative paths and is never written.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::SyncError;
use crate::walker::is_doc_file;

/// Extract the documentation files of `archive_path` into `content_dir`.
///
/// `scratch_dir` receives the raw extraction and is expected to be cleaned up
/// by the caller. `content_dir` is emptied first, so it holds exactly the files
/// of this archive afterwards. Returns the number of files copied.
pub fn extract_docs(
    archive_path: &Path,
    scratch_dir: &Path,
    content_dir: &Path,
) -> Result<usize, SyncError> {
    info!(archive = %archive_path.display(), "Opening documentation archive");
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;

    reset_dir(content_dir)?;

    if archive.len() == 0 {
        info!(archive = %archive_path.display(), "Archive has no entries, nothing to extract");
        return Ok(0);
    }

    let root = archive_root(&mut archive)?;
    debug!(root = %root.display(), "Resolved archive root entry");

    for index in 1..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(rel) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            warn!(entry = entry.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let target = scratch_dir.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if !is_doc_file(&rel) {
            debug!(entry = %rel.display(), "Skipping non-documentation entry");
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
    }

    let copied = copy_docs(&scratch_dir.join(&root), content_dir)?;
    info!(
        content_dir = %content_dir.display(),
        files = copied,
        "Extracted documentation files"
    );
    Ok(copied)
}

/// Relative path of the archive root: the first entry when it is a directory,
/// otherwise that entry's parent.
fn archive_root<R: io::Read + io::Seek>(archive: &mut ZipArchive<R>) -> Result<PathBuf, SyncError> {
    let first = archive.by_index(0)?;
    let name = first
        .enclosed_name()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    if first.is_dir() {
        return Ok(name);
    }
    warn!(
        entry = first.name(),
        "First archive entry is a file; using its parent as root and skipping the entry"
    );
    Ok(name.parent().map(Path::to_path_buf).unwrap_or_default())
}

fn reset_dir(dir: &Path) -> Result<(), SyncError> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
        debug!(path = %dir.display(), "Removed stale content directory");
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Copy every documentation file below `root` into `dest`, keeping relative paths.
fn copy_docs(root: &Path, dest: &Path) -> Result<usize, SyncError> {
    if !root.is_dir() {
        debug!(root = %root.display(), "Extracted root does not exist, no files to copy");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() || !is_doc_file(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let target = dest.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        debug!(file = %rel.display(), "Copied documentation file");
        copied += 1;
    }
    Ok(copied)
}
