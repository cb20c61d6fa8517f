//! Error types for the mame-dl library.

use thiserror::Error;

/// Errors that can stop a download run.
///
/// Failures the downloader is expected to tolerate (an unreadable listing
/// page, an unknown size estimate, a failed free-space query) never show up
/// here. They are reported through [`FetchOutcome`](crate::FetchOutcome) and
/// [`CapacityVerdict`](crate::CapacityVerdict) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Fetching a manifest entry failed, aborting the batch.
    #[error("Transfer of {filename} failed: {source}")]
    Transfer {
        /// Name of the entry being downloaded.
        filename: String,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps a failure with the name of the file being transferred.
    pub(crate) fn transfer(filename: &str, source: impl Into<Self>) -> Self {
        Self::Transfer {
            filename: filename.to_string(),
            source: Box::new(source.into()),
        }
    }
}

/// A specialized `Result` type for mame-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
