//! CLI mode for mame-dl: argument parsing and the process-level run.

mod progress;

use std::path::PathBuf;

use clap::Parser;

pub use progress::{COMPLETE_LINE, ConsoleProgress, insufficient_space_message, progress_line};

use crate::{DownloadConfig, DownloadManager, Error, RunOutcome};

/// Downloads every file listed on an archive.org collection page.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Listing page of the collection to download.
    #[arg(short, long)]
    pub source: Option<String>,

    /// Directory to store downloads in (defaults to <Downloads>/MAME/ROMS).
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Resume the download starting with the specified file.
    #[arg(short, long)]
    pub resume: Option<String>,

    /// Configuration file (defaults to <config dir>/mame-dl/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Applies the command-line overrides on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: DownloadConfig) -> DownloadConfig {
        if let Some(source) = self.source.as_ref().filter(|s| !s.is_empty()) {
            config = config.with_source_url(source.clone());
        }
        if let Some(target) = self.target.as_ref().filter(|t| !t.as_os_str().is_empty()) {
            config = config.with_target_dir(target.clone());
        }
        if self.resume.is_some() {
            config = config.with_resume_filename(self.resume.clone());
        }
        config
    }
}

/// Builds the HTTP client used for the listing page and file downloads.
///
/// No request timeout is set; a stalled transfer blocks the batch.
fn build_http_client(config: &DownloadConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .pool_idle_timeout(std::time::Duration::from_secs(60))
        .tcp_keepalive(std::time::Duration::from_secs(30))
        .build()
}

/// Runs a download with the given arguments, printing progress to stdout.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the target
/// directory cannot be created, or a file transfer fails.
pub async fn run(args: &Args) -> crate::Result<RunOutcome> {
    let config = args.apply(DownloadConfig::load_or_default(args.config.as_deref())?);
    log::debug!("Effective configuration: {config:?}");

    let client = build_http_client(&config)?;
    DownloadManager::new(client, config)
        .run(&ConsoleProgress)
        .await
}

/// Maps the result of [`run`] to a process exit status.
///
/// A run that finishes or stops for lack of space exits with 0. A failed
/// transfer exits with 1; any other failure (configuration, target
/// directory) exits with 2.
#[must_use]
pub fn exit_status(result: &crate::Result<RunOutcome>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(Error::Transfer { .. }) => 1,
        Err(_) => 2,
    }
}
