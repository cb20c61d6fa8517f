//! mame-dl - A library for batch-downloading archive.org collections.
//!
//! This library reads a collection's listing page into an ordered manifest,
//! checks that the estimated total fits on the target volume, and downloads
//! the files one after another, optionally resuming from a named file.
//!
//! # Example
//!
//! ```no_run
//! use mame_dl::{DownloadConfig, DownloadManager, NoProgress, RunOutcome};
//!
//! # async fn example() -> mame_dl::Result<()> {
//! let config = DownloadConfig::new()
//!     .with_target_dir("/data/roms")
//!     .with_resume_filename(Some("nes.zip".to_string()));
//!
//! let manager = DownloadManager::new(reqwest::Client::new(), config);
//! if let RunOutcome::Completed(summary) = manager.run(&NoProgress).await? {
//!     println!("Downloaded {} files", summary.files_transferred);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod capacity;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod manager;
pub mod manifest;
pub mod progress;
pub mod size;
pub mod stats;
pub mod transfer;

// Re-export main types for convenience
pub use capacity::{CapacityChecker, CapacityVerdict, SpaceProbe, SystemSpaceProbe};
pub use config::DownloadConfig;
pub use error::{Error, Result};
pub use fs::{FileSystem, TokioFileSystem};
pub use manager::{DownloadManager, RunOutcome};
pub use manifest::{DownloadEntry, FetchOutcome, Manifest, ManifestFetcher, ResumePoint};
pub use progress::{DownloadProgress, FileStart, NoProgress};
pub use size::{bytes_from_estimate, format_size, parse_size_text};
pub use stats::TransferSummary;
pub use transfer::{TransferRunner, TransferState, percent_complete};
