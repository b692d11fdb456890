use smx_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Parse before logging so usage errors print cleanly.
    let cli = Cli::parse_or_exit();

    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::debug!("log file unavailable, logging to stderr only: {:#}", err);
    }

    if let Err(err) = cli.run().await {
        eprintln!("smx error: {:#}", err);
        std::process::exit(1);
    }
}
