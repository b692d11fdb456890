//! Records passed between the scanner and the fetch sink.

/// A remotely hosted image or video found in an export message file.
///
/// `url` is normalized (signed query parameters removed) and is the identity
/// used for deduplication. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub url: String,
    pub display_name: String,
    pub mime_type: Option<String>,
    pub id: Option<String>,
}
