//! Recursive export traversal, bucketing files into message JSON and loose media.
//!
//! Directories are entered unconditionally and symlinks are followed. A
//! symlink whose target is missing is logged and skipped. A directory symlink
//! cycle is reported by the traversal as an error, which aborts the walk like
//! any other unreadable entry.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::classify;

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("failed to traverse export under {}", .root.display())]
    Traverse {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A file found in the export, tagged by how it will be consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedPath {
    /// Channel message log, consumed by the scanner.
    Json(PathBuf),
    /// Media file stored directly in the export, consumed by the copy sink.
    Media(PathBuf),
}

/// Both buckets of a walk, each in traversal order.
#[derive(Debug, Default, Clone)]
pub struct ExportInventory {
    pub json_files: Vec<PathBuf>,
    pub media_files: Vec<PathBuf>,
}

impl ExportInventory {
    fn push(&mut self, classified: ClassifiedPath) {
        match classified {
            ClassifiedPath::Json(p) => self.json_files.push(p),
            ClassifiedPath::Media(p) => self.media_files.push(p),
        }
    }
}

/// Classifies a single file path. `None` for files that are neither JSON nor media.
pub fn classify_path(path: &Path) -> Option<ClassifiedPath> {
    let name = path.file_name()?.to_string_lossy();
    if name.to_ascii_lowercase().ends_with(".json") {
        Some(ClassifiedPath::Json(path.to_path_buf()))
    } else if classify::is_media_filename(&name) {
        Some(ClassifiedPath::Media(path.to_path_buf()))
    } else {
        None
    }
}

/// True for an entry that is a symlink pointing at nothing.
fn is_dangling_link(err: &walkdir::Error) -> bool {
    if err.loop_ancestor().is_some() {
        return false;
    }
    let not_found = err
        .io_error()
        .map(|e| e.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false);
    not_found
        && err
            .path()
            .and_then(|p| p.symlink_metadata().ok())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
}

/// Walks `root` recursively and returns the JSON and media files found.
pub fn walk_export(root: &Path) -> Result<ExportInventory, WalkError> {
    let mut inventory = ExportInventory::default();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling_link(&e) => {
                if let Some(p) = e.path() {
                    tracing::warn!(path = %p.display(), "skipping dangling symlink");
                }
                continue;
            }
            Err(source) => {
                return Err(WalkError::Traverse {
                    root: root.to_path_buf(),
                    source,
                })
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(classified) = classify_path(entry.path()) {
            if let ClassifiedPath::Media(p) = &classified {
                tracing::trace!(path = %p.display(), kind = ?classify::media_kind(&p.to_string_lossy()), "media file");
            }
            inventory.push(classified);
        }
    }

    tracing::debug!(
        root = %root.display(),
        json = inventory.json_files.len(),
        media = inventory.media_files.len(),
        "export walk complete"
    );
    Ok(inventory)
}
