//! Field extraction from Slack export message JSON.
//!
//! Export files are read as untyped JSON so that one odd record (a non-string
//! `name`, a `files` entry that is not an object) only drops that record.

use serde_json::{Map, Value};

/// Name used when a file record has no `name`, `title` or `id`.
pub(crate) const FALLBACK_DISPLAY_NAME: &str = "file";

/// The fields of a `files[]` entry the scanner cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileRecord {
    pub mimetype: Option<String>,
    pub display_name: String,
    pub id: Option<String>,
    pub url: Option<String>,
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl FileRecord {
    pub(crate) fn from_object(obj: &Map<String, Value>) -> Self {
        let display_name = non_empty_str(obj, "name")
            .or_else(|| non_empty_str(obj, "title"))
            .or_else(|| non_empty_str(obj, "id"))
            .unwrap_or(FALLBACK_DISPLAY_NAME)
            .to_string();
        let url = non_empty_str(obj, "url_private_download")
            .or_else(|| non_empty_str(obj, "url_private"))
            .map(String::from);
        Self {
            mimetype: non_empty_str(obj, "mimetype").map(String::from),
            display_name,
            id: non_empty_str(obj, "id").map(String::from),
            url,
        }
    }
}

/// Object-shaped file records of every message, in message then file order.
///
/// Yields nothing unless the document is a top-level array.
pub(crate) fn file_records(doc: &Value) -> Vec<FileRecord> {
    let Some(messages) = doc.as_array() else {
        return Vec::new();
    };
    messages
        .iter()
        .filter_map(|m| m.get("files").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
        .map(FileRecord::from_object)
        .collect()
}
