//! Cross-platform filename sanitization.

/// Characters that are rejected in filenames on at least one common platform.
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Name used when nothing usable is left after sanitizing.
pub const FALLBACK_FILENAME: &str = "file";

/// Sanitizes a candidate filename.
///
/// - Removes `\ / : * ? " < > |`
/// - Trims surrounding whitespace
/// - Falls back to `file` when the result is empty
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
