//! Run orchestration: prepare, walk and scan, then copy and fetch.
//!
//! Each phase finishes completely before the next one starts. Fatal errors
//! (bad export path, traversal failure, output directory creation) abort the
//! run; everything per item is counted in the [`RunSummary`].

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SmxConfig;
use crate::logging::Tag;
use crate::materialize::{self, CopyOptions, CopyReport, FetchOptions, FetchReport, HttpOptions};
use crate::prepare;
use crate::scan;
use crate::walker;

/// Inputs for one extraction run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Export directory or `.zip` archive.
    pub export_path: PathBuf,
    pub output_dir: PathBuf,
    /// Bearer token for remote fetches; blank or absent disables them.
    pub token: Option<String>,
}

/// Counts from every phase of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub json_files: usize,
    pub json_skipped: usize,
    pub media_files: usize,
    pub media_references: usize,
    pub copy: CopyReport,
    pub fetch: FetchReport,
}

impl RunSummary {
    /// Per-item failures across both sinks.
    pub fn failures(&self) -> usize {
        self.copy.failed + self.fetch.failed
    }
}

fn fetch_options(cfg: &SmxConfig) -> FetchOptions {
    FetchOptions {
        max_concurrent: cfg.max_concurrent_fetches,
        http: HttpOptions {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.request_timeout_secs),
        },
        disambiguate: cfg.disambiguate_names,
    }
}

/// Runs the whole pipeline for `opts`.
pub async fn run(opts: &RunOptions, cfg: &SmxConfig) -> Result<RunSummary> {
    let root = prepare::prepare_export(&opts.export_path, cfg.keep_extracted)?;
    let root_path = root.path().to_path_buf();

    let (inventory, scan_report) = {
        let root_path = root_path.clone();
        tokio::task::spawn_blocking(move || -> Result<_> {
            let inventory = walker::walk_export(&root_path)?;
            let scan_report = scan::scan_all(&inventory.json_files);
            Ok((inventory, scan_report))
        })
        .await
        .context("walk task failed")??
    };
    tracing::info!(
        tag = %Tag::Info,
        json_files = inventory.json_files.len(),
        json_skipped = scan_report.files_skipped,
        media_files = inventory.media_files.len(),
        media_references = scan_report.references.len(),
        "scanned export"
    );

    let mut summary = RunSummary {
        json_files: inventory.json_files.len(),
        json_skipped: scan_report.files_skipped,
        media_files: inventory.media_files.len(),
        media_references: scan_report.references.len(),
        ..RunSummary::default()
    };

    let copy_opts = CopyOptions {
        disambiguate: cfg.disambiguate_names,
    };
    let output_dir = opts.output_dir.clone();
    let media_files = inventory.media_files;
    summary.copy = tokio::task::spawn_blocking(move || {
        materialize::copy_media_files(&root_path, &media_files, &output_dir, &copy_opts)
    })
    .await
    .context("copy task failed")??;

    summary.fetch = materialize::fetch_media_references(
        &scan_report.references,
        opts.token.as_deref(),
        &opts.output_dir,
        &fetch_options(cfg),
    )
    .await?;

    tracing::info!(
        tag = %Tag::Ok,
        copied = summary.copy.copied,
        copy_failed = summary.copy.failed,
        downloaded = summary.fetch.downloaded,
        download_failed = summary.fetch.failed,
        duplicates = summary.fetch.duplicates,
        "done"
    );

    drop(root);
    Ok(summary)
}
