//! Download statistics types.

use std::fmt;
use std::time::{Duration, Instant};

use crate::size::format_size;

/// Statistics for a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSummary {
    /// Number of files written.
    pub files_transferred: usize,
    /// Bytes actually written to disk.
    pub bytes_written: u64,
    /// Sum of the listing's size estimates for the transferred files.
    pub estimated_bytes: u64,
    /// Wall-clock time of the batch.
    pub elapsed: Duration,
}

impl TransferSummary {
    /// Returns the average download speed in bytes per second.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn average_speed(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.bytes_written as f64 / secs) as u64
        } else {
            0
        }
    }
}

impl fmt::Display for TransferSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} written in {} ({}/s avg)",
            self.files_transferred,
            format_size(self.bytes_written),
            clock(self.elapsed),
            format_size(self.average_speed()),
        )
    }
}

/// `"4.2s"` under a minute, then `"1m 05s"`, then `"1h 01m 05s"`.
fn clock(d: Duration) -> String {
    let secs = d.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    match (hours, minutes) {
        (0, 0) => format!("{seconds}.{}s", d.subsec_millis() / 100),
        (0, _) => format!("{minutes}m {seconds:02}s"),
        _ => format!("{hours}h {minutes:02}m {seconds:02}s"),
    }
}

/// Accumulates a [`TransferSummary`] while a batch runs.
#[derive(Debug)]
pub struct SummaryBuilder {
    start_time: Instant,
    summary: TransferSummary,
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryBuilder {
    /// Starts timing a new batch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            summary: TransferSummary::default(),
        }
    }

    /// Records one completed file.
    pub fn add_file(&mut self, bytes_written: u64, estimated: u64) {
        let summary = &mut self.summary;
        summary.files_transferred = summary.files_transferred.saturating_add(1);
        summary.bytes_written = summary.bytes_written.saturating_add(bytes_written);
        summary.estimated_bytes = summary.estimated_bytes.saturating_add(estimated);
    }

    /// Finishes timing and returns the summary.
    #[must_use]
    pub fn build(self) -> TransferSummary {
        TransferSummary {
            elapsed: self.start_time.elapsed(),
            ..self.summary
        }
    }
}
