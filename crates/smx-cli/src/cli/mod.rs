//! CLI for the SMX Slack export media extractor.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use smx_core::config::{self, SmxConfig};
use smx_core::pipeline::{self, RunOptions, RunSummary};
use std::path::PathBuf;

/// Copy and download the images and videos of a Slack workspace export.
#[derive(Debug, Parser)]
#[command(name = "smx", version)]
#[command(about = "SMX: extract media from a Slack workspace export", long_about = None)]
pub struct Cli {
    /// Export directory or .zip archive.
    pub export_path: PathBuf,

    /// Directory to write `exported_files/` and `downloaded_from_urls/` into.
    pub output_dir: PathBuf,

    /// Slack token used as `Authorization: Bearer` to download files referenced in messages.
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Maximum concurrent downloads (overrides config).
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Keep the temporary directory a .zip export is extracted into.
    #[arg(long)]
    pub keep_extracted: bool,
}

impl Cli {
    /// Parses process arguments. Usage errors exit with status 1; `--help`
    /// and `--version` exit with status 0.
    pub fn parse_or_exit() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => {
                    let _ = err.print();
                    std::process::exit(1);
                }
            },
        }
    }

    /// Applies command-line overrides on top of the loaded config.
    fn apply_overrides(&self, cfg: &mut SmxConfig) {
        if let Some(jobs) = self.jobs {
            cfg.max_concurrent_fetches = jobs.max(1);
        }
        if self.keep_extracted {
            cfg.keep_extracted = true;
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut cfg = config::load_or_init()?;
        self.apply_overrides(&mut cfg);
        tracing::debug!("loaded config: {:?}", cfg);

        let opts = RunOptions {
            export_path: self.export_path,
            output_dir: self.output_dir,
            token: self.token,
        };
        let summary = pipeline::run(&opts, &cfg).await?;
        print_summary(&opts, &summary);
        Ok(())
    }
}

fn print_summary(opts: &RunOptions, summary: &RunSummary) {
    println!(
        "Copied {} of {} media file(s), downloaded {} of {} referenced URL(s) into {}",
        summary.copy.copied,
        summary.media_files,
        summary.fetch.downloaded,
        summary.media_references - summary.fetch.duplicates,
        opts.output_dir.display()
    );
    if summary.failures() > 0 {
        println!("  ({} item(s) failed; see log)", summary.failures());
    }
}
