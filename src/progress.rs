//! Progress callbacks for download runs.

use std::path::Path;

use crate::stats::TransferSummary;

/// Progress details emitted right before a file is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStart<'a> {
    /// Whole percent of the estimated batch size already transferred.
    pub percent: u64,
    /// 1-based position of the file among those being transferred.
    pub index: usize,
    /// Number of files on the listing, including any skipped by a resume.
    pub count: usize,
    /// Destination path.
    pub path: &'a Path,
}

/// Trait for receiving download progress updates.
///
/// Implement this trait to receive callbacks during download operations.
/// All methods have default no-op implementations for convenience.
pub trait DownloadProgress: Send + Sync {
    /// Called once the batch is about to start.
    fn on_batch_start(&self, _target_dir: &Path, _file_count: usize, _source_url: &str) {}

    /// Called when a resumed session will start with `_filename`.
    fn on_resume(&self, _filename: &str) {}

    /// Called when the batch does not fit on the target volume.
    fn on_insufficient_space(&self, _target_dir: &Path, _required: u64, _available: u64) {}

    /// Called before each file download starts.
    fn on_file_start(&self, _start: &FileStart<'_>) {}

    /// Called when a file has been written completely.
    fn on_file_complete(&self, _filename: &str, _bytes_written: u64) {}

    /// Called when a file download fails. The batch stops afterwards.
    fn on_error(&self, _filename: &str, _error: &str) {}

    /// Called after the last file, even if nothing was transferred.
    fn on_batch_complete(&self, _summary: &TransferSummary) {}
}

/// A null progress implementation that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl DownloadProgress for NoProgress {}
