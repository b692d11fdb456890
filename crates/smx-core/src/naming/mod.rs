//! Output filename derivation for both sinks.
//!
//! Copied files keep their base name; fetched files use the display name from
//! the export, with an extension derived from the MIME type when missing.
//! Everything is sanitized before it touches the filesystem.

mod extension;
mod sanitize;

pub use extension::{extension_from_mime, has_extension};
pub use sanitize::{sanitize_filename, FALLBACK_FILENAME};

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex digits of the identity hash appended by [`disambiguate`].
const SUFFIX_LEN: usize = 8;

/// Output name for a fetched reference.
///
/// # Examples
///
/// - `fetch_filename("photo", Some("image/png"))` → `"photo.png"`
/// - `fetch_filename("a.jpg", Some("image/png"))` → `"a.jpg"`
/// - `fetch_filename("doc", Some("weird"))` → `"doc"`
pub fn fetch_filename(display_name: &str, mime: Option<&str>) -> String {
    let name = if has_extension(display_name) {
        display_name.to_string()
    } else {
        match mime.and_then(extension_from_mime) {
            Some(ext) => format!("{}.{}", display_name, ext),
            None => display_name.to_string(),
        }
    };
    sanitize_filename(&name)
}

/// Output name for a media file copied out of the export tree.
pub fn copy_filename(source: &Path) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_filename(&base)
}

/// Inserts a short stable hash of `key` before the extension of `name`.
///
/// `photo.png` keyed by a URL becomes `photo-1a2b3c4d.png`.
pub fn disambiguate(name: &str, key: &str) -> String {
    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    let suffix = &digest[..SUFFIX_LEN];
    let path = Path::new(name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) if !ext.is_empty() => format!("{}-{}.{}", stem, suffix, ext),
        _ => format!("{}-{}", name, suffix),
    }
}
