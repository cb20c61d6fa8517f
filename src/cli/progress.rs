//! Line-oriented status output for CLI downloads.

use std::path::Path;

use crate::{DownloadProgress, FileStart, TransferSummary, format_size};

/// Final line printed after every batch.
pub const COMPLETE_LINE: &str = "100% complete!";

/// Formats the status line printed before a file is fetched.
#[must_use]
pub fn progress_line(start: &FileStart<'_>) -> String {
    format!(
        "{}% complete - Downloading file # {} of {} -- {}",
        start.percent,
        start.index,
        start.count,
        start.path.display()
    )
}

/// Formats the message printed when the batch does not fit on disk.
#[must_use]
pub fn insufficient_space_message(target_dir: &Path, required: u64, available: u64) -> String {
    format!(
        "The download operation requires {required} bytes ({}) but the target folder {} has only {available} bytes ({}) available.",
        format_size(required),
        target_dir.display(),
        format_size(available),
    )
}

/// Prints progress as plain lines on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress;

impl DownloadProgress for ConsoleProgress {
    fn on_batch_start(&self, target_dir: &Path, file_count: usize, source_url: &str) {
        println!("Downloading files to {}.", target_dir.display());
        println!("Downloading {file_count} files from {source_url} ...");
    }

    fn on_resume(&self, filename: &str) {
        println!("Resuming download session starting with {filename} ...");
    }

    fn on_insufficient_space(&self, target_dir: &Path, required: u64, available: u64) {
        println!("{}", insufficient_space_message(target_dir, required, available));
    }

    fn on_file_start(&self, start: &FileStart<'_>) {
        println!("{}", progress_line(start));
    }

    fn on_error(&self, filename: &str, error: &str) {
        eprintln!("Download of {filename} failed: {error}");
    }

    fn on_batch_complete(&self, summary: &TransferSummary) {
        println!("{COMPLETE_LINE}");
        log::info!("{summary}");
    }
}
