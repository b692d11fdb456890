//! Media classification by filename extension or MIME type.

use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "heif", "avif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "avi", "mkv", "webm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

fn lowercase_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Image or video, judged by the lowercased extension of `name`.
pub fn media_kind(name: &str) -> Option<MediaKind> {
    let ext = lowercase_extension(name)?;
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// True if the extension of `name` is a known image or video extension (any case).
pub fn is_media_filename(name: &str) -> bool {
    media_kind(name).is_some()
}

/// True if `mime` starts with `image/` or `video/`. Absent or empty is false.
pub fn is_media_mime(mime: Option<&str>) -> bool {
    match mime {
        Some(m) => m.starts_with("image/") || m.starts_with("video/"),
        None => false,
    }
}

/// Media if either the filename or the MIME type says so.
///
/// Export JSON sometimes carries a MIME type with no matching extension and
/// vice versa, so both are consulted.
pub fn is_media(name: &str, mime: Option<&str>) -> bool {
    is_media_mime(mime) || is_media_filename(name)
}
