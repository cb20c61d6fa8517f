//! Sequential batch transfer of a manifest into a directory.

use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{Error, Result};
use crate::fs::{FileSystem, TokioFileSystem};
use crate::manifest::{DownloadEntry, Manifest, ResumePoint};
use crate::progress::{DownloadProgress, FileStart};
use crate::stats::{SummaryBuilder, TransferSummary};

/// Whole percent of `total` covered by `done`. A zero total is 0%.
#[must_use]
pub fn percent_complete(done: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let percent = u128::from(done) * 100 / u128::from(total);
    u64::try_from(percent).unwrap_or(u64::MAX)
}

/// Byte accounting for one batch run. Lives only as long as the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferState {
    /// Estimated bytes of the files finished so far.
    pub cumulative_bytes: u64,
    /// Estimated bytes of the whole batch.
    pub total_bytes: u64,
    /// 1-based index of the file currently being fetched, 0 before the first.
    pub current_index: usize,
    /// Whether the resume filename was found (always true without one).
    pub resume_reached: bool,
}

impl TransferState {
    /// Creates the state for transferring `pending` from `resume`.
    #[must_use]
    pub fn new(pending: &[DownloadEntry], resume: ResumePoint) -> Self {
        Self {
            cumulative_bytes: 0,
            total_bytes: pending.iter().fold(0u64, |total, e| total.saturating_add(e.size)),
            current_index: 0,
            resume_reached: resume != ResumePoint::NotFound,
        }
    }

    /// Moves to the next file and returns the percent done before it.
    pub fn begin_file(&mut self) -> u64 {
        self.current_index += 1;
        self.percent()
    }

    /// Accounts a finished file by its estimated size.
    pub fn finish_file(&mut self, estimated: u64) {
        self.cumulative_bytes = self.cumulative_bytes.saturating_add(estimated);
    }

    /// Whole percent of the estimated batch already transferred.
    #[must_use]
    pub fn percent(&self) -> u64 {
        percent_complete(self.cumulative_bytes, self.total_bytes)
    }
}

/// Downloads manifest entries one after another.
#[derive(Debug, Clone)]
pub struct TransferRunner<F: FileSystem = TokioFileSystem> {
    client: reqwest::Client,
    fs: F,
}

impl TransferRunner<TokioFileSystem> {
    /// Creates a runner writing through `tokio::fs`.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            fs: TokioFileSystem,
        }
    }
}

impl<F: FileSystem> TransferRunner<F> {
    /// Creates a runner with a custom file system implementation.
    #[must_use]
    pub const fn with_fs(client: reqwest::Client, fs: F) -> Self {
        Self { client, fs }
    }

    /// Transfers the manifest into `target_dir`, starting at `resume` if given.
    ///
    /// Entries before the resume filename are skipped and excluded from the
    /// byte total; the reported file count stays that of the whole manifest.
    /// A resume filename that is not in the manifest transfers nothing.
    /// Existing files are overwritten.
    ///
    /// # Errors
    ///
    /// The first failed file aborts the batch with [`Error::Transfer`]. Its
    /// partially written file stays on disk.
    pub async fn run(
        &self,
        manifest: Manifest,
        target_dir: &Path,
        resume: Option<&str>,
        progress: &dyn DownloadProgress,
    ) -> Result<TransferSummary> {
        let file_count = manifest.len();
        let resume_point = manifest.resume_point(resume);
        let pending = manifest.pending(resume);
        let mut state = TransferState::new(pending, resume_point);
        let mut summary = SummaryBuilder::new();

        if !state.resume_reached {
            log::warn!(
                "Resume file {} is not in the manifest, nothing to transfer",
                resume.unwrap_or_default()
            );
        }

        for entry in pending {
            let path = target_dir.join(&entry.filename);
            let percent = state.begin_file();
            progress.on_file_start(&FileStart {
                percent,
                index: state.current_index,
                count: file_count,
                path: &path,
            });

            let written = match self.fetch_to_file(&entry.url, &path).await {
                Ok(written) => written,
                Err(e) => {
                    log::error!("Download of {} failed: {e}", entry.url);
                    progress.on_error(&entry.filename, &e.to_string());
                    return Err(Error::transfer(&entry.filename, e));
                }
            };

            log::debug!(
                "Wrote {} ({written} bytes, estimated {})",
                path.display(),
                entry.size
            );
            progress.on_file_complete(&entry.filename, written);
            state.finish_file(entry.size);
            summary.add_file(written, entry.size);
        }

        let summary = summary.build();
        progress.on_batch_complete(&summary);
        Ok(summary)
    }

    /// Streams `url` into `path` and returns the number of bytes written.
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let file = self.fs.create_file(path).await?;
        let mut writer = BufWriter::new(file);
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await? {
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        writer.flush().await?;
        Ok(written)
    }
}
