//! Materializer: the two sinks that write media into the output directory.
//!
//! The copy sink takes media files found directly in the export tree; the
//! fetch sink downloads media referenced by URL in message JSON. Per-item
//! failures are logged and counted, never propagated. Only failing to create
//! a sink's output directory is an error.

mod copy;
mod fetch;
mod http;

pub use copy::{copy_media_files, CopyOptions, CopyReport};
pub use fetch::{dedup_by_url, fetch_media_references, FetchOptions, FetchReport};
pub use http::{get_with_bearer, FetchError, HttpOptions};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Subdirectory of the output root for files copied out of the export.
pub const EXPORTED_FILES_DIR: &str = "exported_files";
/// Subdirectory of the output root for files fetched from URLs.
pub const DOWNLOADED_FILES_DIR: &str = "downloaded_from_urls";

/// Creates `<out_root>/<name>` if missing and returns it.
pub(crate) fn ensure_sink_dir(out_root: &Path, name: &str) -> Result<PathBuf> {
    let dir = out_root.join(name);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;
    Ok(dir)
}
