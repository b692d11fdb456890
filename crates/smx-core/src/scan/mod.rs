//! Message scanner: discover remote media referenced by export JSON.
//!
//! Reads each channel message file, pulls the `files` attachments, keeps the
//! ones that look like images or videos, and normalizes their URLs. A file that
//! cannot be read or parsed contributes nothing; it never aborts the run.

mod normalize;
mod parse;

pub use normalize::normalize_url;

use std::path::{Path, PathBuf};

use crate::classify;
use crate::model::MediaReference;

/// Outcome of scanning every JSON file of an export.
#[derive(Debug, Default, Clone)]
pub struct ScanReport {
    /// References in file, message and attachment order.
    pub references: Vec<MediaReference>,
    /// JSON files read and parsed.
    pub files_scanned: usize,
    /// JSON files skipped because they were unreadable or not valid JSON.
    pub files_skipped: usize,
}

/// Extracts media references from raw message JSON.
///
/// Returns `None` if `bytes` is not JSON. A document that is not a top-level
/// array yields an empty list.
pub fn scan_messages(bytes: &[u8]) -> Option<Vec<MediaReference>> {
    let doc: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    let refs = parse::file_records(&doc)
        .into_iter()
        .filter_map(|rec| {
            let url = rec.url?;
            if !classify::is_media(&rec.display_name, rec.mimetype.as_deref()) {
                return None;
            }
            Some(MediaReference {
                url: normalize_url(&url),
                display_name: rec.display_name,
                mime_type: rec.mimetype,
                id: rec.id,
            })
        })
        .collect();
    Some(refs)
}

fn try_scan_file(path: &Path) -> Option<Vec<MediaReference>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(path = %path.display(), "skipping unreadable JSON: {}", e);
            return None;
        }
    };
    let refs = scan_messages(&bytes);
    if refs.is_none() {
        tracing::debug!(path = %path.display(), "skipping malformed JSON");
    }
    refs
}

/// Media references in one message file; empty if the file is unreadable or malformed.
pub fn scan_message_file(path: &Path) -> Vec<MediaReference> {
    try_scan_file(path).unwrap_or_default()
}

/// Scans every file in `paths`, concatenating references in input order.
pub fn scan_all(paths: &[PathBuf]) -> ScanReport {
    let mut report = ScanReport::default();
    for path in paths {
        match try_scan_file(path) {
            Some(refs) => {
                report.files_scanned += 1;
                report.references.extend(refs);
            }
            None => report.files_skipped += 1,
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn keeps_media_by_mime_or_name_and_normalizes() {
        let json = br#"[
            {"files": [
                {"id": "F1", "name": "photo", "mimetype": "image/png",
                 "url_private_download": "https://x/y?token=abc&t=1&pub_secret=zzz&keep=1"},
                {"id": "F2", "name": "clip.mov", "mimetype": "application/octet-stream",
                 "url_private": "https://x/clip.mov"},
                {"id": "F3", "name": "report.pdf", "mimetype": "application/pdf",
                 "url_private": "https://x/report.pdf"},
                {"id": "F4", "name": "nourl.png", "mimetype": "image/png"}
            ]}
        ]"#;
        let refs = scan_messages(json).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].url, "https://x/y?keep=1");
        assert_eq!(refs[0].display_name, "photo");
        assert_eq!(refs[0].mime_type.as_deref(), Some("image/png"));
        assert_eq!(refs[0].id.as_deref(), Some("F1"));
        assert_eq!(refs[1].url, "https://x/clip.mov");
        assert!(refs.iter().all(|r| !r.url.is_empty()));
    }

    #[test]
    fn malformed_and_non_array() {
        assert!(scan_messages(b"{not json").is_none());
        assert_eq!(scan_messages(br#"{"files": []}"#), Some(Vec::new()));
        assert_eq!(scan_messages(b"[]"), Some(Vec::new()));
    }

    #[test]
    fn unreadable_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_message_file(&dir.path().join("missing.json")).is_empty());
    }

    #[test]
    fn scan_all_isolates_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        let good = dir.path().join("good.json");
        fs::write(&bad, b"[{\"files\": [").unwrap();
        fs::write(
            &good,
            br#"[{"files": [{"name": "a.jpg", "url_private": "https://x/a.jpg"}]}]"#,
        )
        .unwrap();

        let report = scan_all(&[bad, good, dir.path().join("gone.json")]);
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.files_skipped, 2);
        assert_eq!(report.references.len(), 1);
        assert_eq!(report.references[0].display_name, "a.jpg");
    }
}
