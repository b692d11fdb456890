//! Local-copy sink: media stored inside the export tree.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::logging::Tag;
use crate::naming;

use super::{ensure_sink_dir, EXPORTED_FILES_DIR};

#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Suffix names with a hash of the source path relative to the export root.
    pub disambiguate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub failed: usize,
}

/// Copies each of `paths` byte-for-byte into `<out_root>/exported_files/`.
///
/// Same-named files overwrite each other unless `opts.disambiguate` is set.
/// `export_root` only feeds the disambiguation key. A failure on one file is
/// logged and the rest are still copied.
pub fn copy_media_files(
    export_root: &Path,
    paths: &[PathBuf],
    out_root: &Path,
    opts: &CopyOptions,
) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    if paths.is_empty() {
        return Ok(report);
    }
    let dest_dir = ensure_sink_dir(out_root, EXPORTED_FILES_DIR)?;

    for src in paths {
        let mut name = naming::copy_filename(src);
        if opts.disambiguate {
            let key = src.strip_prefix(export_root).unwrap_or(src);
            name = naming::disambiguate(&name, &key.to_string_lossy());
        }
        let dest = dest_dir.join(&name);
        match std::fs::copy(src, &dest) {
            Ok(bytes) => {
                report.copied += 1;
                tracing::info!(
                    tag = %Tag::Copy,
                    src = %src.display(),
                    dest = %dest.display(),
                    bytes,
                    "copied"
                );
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    tag = %Tag::CopyError,
                    src = %src.display(),
                    dest = %dest.display(),
                    "copy failed: {}",
                    e
                );
            }
        }
    }

    Ok(report)
}
