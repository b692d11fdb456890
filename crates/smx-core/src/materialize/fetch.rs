//! Remote-fetch sink: media referenced by URL in export JSON.
//!
//! References are deduplicated by normalized URL before any request goes out,
//! so each unique URL maps to exactly one request and one destination file.
//! Up to `max_concurrent` blocking curl transfers run at once. Transfers that
//! write the same destination file share one task and run in reference order.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::logging::Tag;
use crate::model::MediaReference;
use crate::naming;

use super::http::{get_with_bearer, FetchError, HttpOptions};
use super::{ensure_sink_dir, DOWNLOADED_FILES_DIR};

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Maximum requests in flight (at least 1 is used).
    pub max_concurrent: usize,
    pub http: HttpOptions,
    /// Suffix names with a hash of the URL.
    pub disambiguate: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            http: HttpOptions::default(),
            disambiguate: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub downloaded: usize,
    pub failed: usize,
    /// References dropped because an earlier one had the same URL.
    pub duplicates: usize,
    /// References not fetched because no token was supplied.
    pub skipped_no_token: usize,
}

/// Keeps the first reference for each URL, preserving order.
/// Returns the unique references and how many were dropped.
pub fn dedup_by_url(refs: &[MediaReference]) -> (Vec<MediaReference>, usize) {
    let mut seen: HashSet<&str> = HashSet::with_capacity(refs.len());
    let unique: Vec<MediaReference> = refs
        .iter()
        .filter(|r| seen.insert(r.url.as_str()))
        .cloned()
        .collect();
    let dropped = refs.len() - unique.len();
    (unique, dropped)
}

struct FetchJob {
    url: String,
    dest: PathBuf,
}

fn destination_name(r: &MediaReference, disambiguate: bool) -> String {
    let name = naming::fetch_filename(&r.display_name, r.mime_type.as_deref());
    if disambiguate {
        naming::disambiguate(&name, &r.url)
    } else {
        name
    }
}

fn fetch_one(job: &FetchJob, token: &str, http: &HttpOptions) -> Result<u64, FetchError> {
    let body = get_with_bearer(&job.url, token, http)?;
    std::fs::write(&job.dest, &body).map_err(|source| FetchError::Write {
        path: job.dest.clone(),
        source,
    })?;
    Ok(body.len() as u64)
}

fn log_outcome(job: &FetchJob, outcome: &Result<u64, FetchError>) {
    match outcome {
        Ok(bytes) => tracing::info!(
            tag = %Tag::Download,
            url = %job.url,
            dest = %job.dest.display(),
            bytes,
            "downloaded"
        ),
        Err(e) => match e.status() {
            Some(status) => tracing::warn!(
                tag = %Tag::DownloadError,
                url = %job.url,
                status,
                "download failed: HTTP {}",
                status
            ),
            None => tracing::warn!(
                tag = %Tag::DownloadError,
                url = %job.url,
                "download failed: {}",
                e
            ),
        },
    }
}

/// Groups jobs by destination path, preserving reference order within and
/// across groups. Jobs that share a destination must run one after another so
/// the last reference in order is the one left on disk.
fn group_by_destination(jobs: Vec<FetchJob>) -> Vec<Vec<FetchJob>> {
    let mut index: HashMap<PathBuf, usize> = HashMap::new();
    let mut groups: Vec<Vec<FetchJob>> = Vec::new();
    for job in jobs {
        match index.get(&job.dest) {
            Some(&i) => groups[i].push(job),
            None => {
                index.insert(job.dest.clone(), groups.len());
                groups.push(vec![job]);
            }
        }
    }
    groups
}

/// Downloads every unique reference into `<out_root>/downloaded_from_urls/`.
///
/// Does nothing (beyond an informational log) when `token` is absent or blank.
/// Non-2xx responses and transport errors are logged and counted as failures.
/// References that map to the same output name are fetched sequentially in
/// reference order, so the later reference wins.
pub async fn fetch_media_references(
    refs: &[MediaReference],
    token: Option<&str>,
    out_root: &Path,
    opts: &FetchOptions,
) -> Result<FetchReport> {
    let mut report = FetchReport::default();
    if refs.is_empty() {
        return Ok(report);
    }

    let (unique, duplicates) = dedup_by_url(refs);
    report.duplicates = duplicates;
    if duplicates > 0 {
        tracing::debug!(duplicates, "dropped duplicate media URLs");
    }

    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        report.skipped_no_token = unique.len();
        tracing::info!(
            tag = %Tag::Info,
            references = unique.len(),
            "media URLs found in messages but no token supplied; skipping downloads"
        );
        return Ok(report);
    };

    let dest_dir = ensure_sink_dir(out_root, DOWNLOADED_FILES_DIR)?;
    let jobs: Vec<FetchJob> = unique
        .into_iter()
        .map(|r| FetchJob {
            dest: dest_dir.join(destination_name(&r, opts.disambiguate)),
            url: r.url,
        })
        .collect();
    let mut queue = group_by_destination(jobs).into_iter();

    let max_concurrent = opts.max_concurrent.max(1);
    let token: Arc<str> = Arc::from(token);
    let http = opts.http;
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < max_concurrent {
            let Some(group) = queue.next() else {
                break;
            };
            let token = Arc::clone(&token);
            join_set.spawn_blocking(move || {
                let mut ok = 0usize;
                let mut failed = 0usize;
                for job in &group {
                    let outcome = fetch_one(job, &token, &http);
                    log_outcome(job, &outcome);
                    if outcome.is_ok() {
                        ok += 1;
                    } else {
                        failed += 1;
                    }
                }
                (ok, failed)
            });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        match res {
            Ok((ok, failed)) => {
                report.downloaded += ok;
                report.failed += failed;
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!(tag = %Tag::DownloadError, "download task failed: {}", e);
            }
        }
    }

    Ok(report)
}
