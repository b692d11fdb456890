//! Export preparation: resolve the user-supplied path to a directory to walk.
//!
//! Directories are used in place. Zip archives are extracted into a fresh
//! temporary directory that is removed when the [`ExportRoot`] is dropped,
//! unless it was persisted with [`ExportRoot::keep`].

use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error("export path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("export path must be a directory or a .zip file: {}", .0.display())]
    Unsupported(PathBuf),
    #[error("failed to extract {}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The directory the walker runs over.
#[derive(Debug)]
pub enum ExportRoot {
    /// A user-supplied directory, used as-is.
    Directory(PathBuf),
    /// A zip archive extracted into a scoped temporary directory.
    Extracted { archive: PathBuf, dir: TempDir },
    /// An extracted archive whose temporary directory was kept on disk.
    Persisted { archive: PathBuf, dir: PathBuf },
}

impl ExportRoot {
    pub fn path(&self) -> &Path {
        match self {
            ExportRoot::Directory(p) => p,
            ExportRoot::Extracted { dir, .. } => dir.path(),
            ExportRoot::Persisted { dir, .. } => dir,
        }
    }

    /// Disables cleanup of an extracted archive. No-op for plain directories.
    pub fn keep(self) -> Self {
        match self {
            ExportRoot::Extracted { archive, dir } => {
                let dir = dir.keep();
                tracing::info!(path = %dir.display(), "keeping extracted export");
                ExportRoot::Persisted { archive, dir }
            }
            other => other,
        }
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

/// Extracts every entry of the zip at `archive` into `dest`.
///
/// Entry names that would escape `dest` are rejected by the zip reader.
pub fn extract_zip(archive: &Path, dest: &Path) -> std::io::Result<()> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(std::io::Error::other)?;
    zip.extract(dest).map_err(std::io::Error::other)?;
    Ok(())
}

/// Resolves `path` to a walkable export root, extracting it if it is a zip.
pub fn prepare_export(path: &Path, keep_extracted: bool) -> Result<ExportRoot, PrepareError> {
    if !path.exists() {
        return Err(PrepareError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Ok(ExportRoot::Directory(path.to_path_buf()));
    }
    if !(path.is_file() && is_zip(path)) {
        return Err(PrepareError::Unsupported(path.to_path_buf()));
    }

    let extract_err = |source| PrepareError::Extract {
        path: path.to_path_buf(),
        source,
    };
    let dir = tempfile::Builder::new()
        .prefix("smx-export-")
        .tempdir()
        .map_err(extract_err)?;
    tracing::info!(
        archive = %path.display(),
        dest = %dir.path().display(),
        "extracting export archive"
    );
    extract_zip(path, dir.path()).map_err(extract_err)?;

    let root = ExportRoot::Extracted {
        archive: path.to_path_buf(),
        dir,
    };
    Ok(if keep_extracted { root.keep() } else { root })
}
