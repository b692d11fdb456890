//! URL normalization: strip short-lived signed query parameters.

/// Query parameters that carry export-time signatures. They expire, and the
/// caller authenticates with its own token instead.
const SIGNED_PARAMS: &[&str] = &["token", "t", "pub_secret"];

/// Removes `token`, `t` and `pub_secret` from the query of `raw`.
///
/// Other parameters keep their order. If nothing is left the `?` is dropped.
/// Strings that do not parse as a URL are returned unchanged.
pub fn normalize_url(raw: &str) -> String {
    let mut parsed = match url::Url::parse(raw) {
        Ok(u) => u,
        Err(_) => return raw.to_string(),
    };
    if parsed.query().is_none() {
        return parsed.to_string();
    }

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !SIGNED_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }
    parsed.to_string()
}
