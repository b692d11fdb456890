//! File extensions derived from MIME types.

use std::path::Path;

/// Extension implied by a MIME type's subtype, e.g. `image/png` -> `png`.
///
/// Parameters after `;` are ignored. A type without exactly one `/` or with an
/// empty subtype yields `None`.
pub fn extension_from_mime(mime: &str) -> Option<String> {
    let essence = mime.split(';').next().unwrap_or("").trim();
    let mut parts = essence.split('/');
    let (_, subtype) = match (parts.next(), parts.next(), parts.next()) {
        (Some(t), Some(s), None) => (t, s),
        _ => return None,
    };
    let subtype = subtype.trim().to_ascii_lowercase();
    if subtype.is_empty() {
        None
    } else {
        Some(subtype)
    }
}

/// True if `name` already ends in a (non-empty) extension.
pub fn has_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| !e.is_empty())
        .unwrap_or(false)
}
