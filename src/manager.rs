//! Orchestration of a complete download run.

use crate::capacity::{CapacityChecker, CapacityVerdict, SpaceProbe, SystemSpaceProbe};
use crate::config::DownloadConfig;
use crate::error::Result;
use crate::fs::{FileSystem, TokioFileSystem};
use crate::manifest::ManifestFetcher;
use crate::progress::DownloadProgress;
use crate::size::format_size;
use crate::stats::TransferSummary;
use crate::transfer::TransferRunner;

/// How a run ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The batch ran to the end.
    Completed(TransferSummary),
    /// The batch did not fit on the target volume; nothing was written.
    InsufficientSpace {
        /// Estimated bytes the batch needs.
        required: u64,
        /// Available bytes on the volume.
        available: u64,
    },
}

/// Builds the manifest, checks free space and runs the transfer.
pub struct DownloadManager<F: FileSystem + Clone = TokioFileSystem, P: SpaceProbe = SystemSpaceProbe>
{
    config: DownloadConfig,
    fetcher: ManifestFetcher,
    checker: CapacityChecker<P>,
    runner: TransferRunner<F>,
    fs: F,
}

impl DownloadManager<TokioFileSystem, SystemSpaceProbe> {
    /// Creates a manager using the real file system and disks.
    #[must_use]
    pub fn new(client: reqwest::Client, config: DownloadConfig) -> Self {
        Self::with_parts(client, config, TokioFileSystem, SystemSpaceProbe)
    }
}

impl<F: FileSystem + Clone, P: SpaceProbe> DownloadManager<F, P> {
    /// Creates a manager with custom file system and free-space implementations.
    #[must_use]
    pub fn with_parts(client: reqwest::Client, config: DownloadConfig, fs: F, probe: P) -> Self {
        let fetcher = ManifestFetcher::new(
            client.clone(),
            config.archive_origin.clone(),
            config.marker_class.clone(),
        );
        Self {
            fetcher,
            checker: CapacityChecker::with_probe(probe),
            runner: TransferRunner::with_fs(client, fs.clone()),
            fs,
            config,
        }
    }

    /// Returns a reference to the download configuration.
    #[must_use]
    pub const fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Runs the whole batch.
    ///
    /// An unreadable listing page results in an empty batch, and a failed
    /// free-space query skips the capacity check. When the batch does not
    /// fit, nothing is downloaded and [`RunOutcome::InsufficientSpace`] is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the target directory cannot be created or a file
    /// transfer fails.
    pub async fn run(&self, progress: &dyn DownloadProgress) -> Result<RunOutcome> {
        let target_dir = self.config.target_dir.as_path();
        let resume = self.config.resume();

        if !self.fs.dir_exists(target_dir).await {
            log::info!("Creating {}", target_dir.display());
            self.fs.create_dir_all(target_dir).await?;
        }

        let manifest = self
            .fetcher
            .fetch(&self.config.source_url)
            .await
            .into_manifest();

        let required = manifest.required_bytes(resume);
        match self.checker.check(target_dir, required) {
            CapacityVerdict::Insufficient {
                required,
                available,
            } => {
                log::error!(
                    "Need {} but only {} is free in {}",
                    format_size(required),
                    format_size(available),
                    target_dir.display()
                );
                progress.on_insufficient_space(target_dir, required, available);
                return Ok(RunOutcome::InsufficientSpace {
                    required,
                    available,
                });
            }
            CapacityVerdict::Sufficient { available } => {
                log::debug!(
                    "{} required, {} available",
                    format_size(required),
                    format_size(available)
                );
            }
            CapacityVerdict::Unknown { .. } => {}
        }

        progress.on_batch_start(target_dir, manifest.len(), &self.config.source_url);
        if let Some(name) = resume {
            progress.on_resume(name);
        }

        let summary = self
            .runner
            .run(manifest, target_dir, resume, progress)
            .await?;
        Ok(RunOutcome::Completed(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    #[derive(Clone, Default)]
    struct MockFileSystem {
        dirs: Arc<Mutex<Vec<std::path::PathBuf>>>,
    }

    #[async_trait]
    impl FileSystem for MockFileSystem {
        async fn dir_exists(&self, path: &Path) -> bool {
            self.dirs.lock().unwrap().iter().any(|d| d == path)
        }

        async fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
            self.dirs.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        async fn create_file(&self, _path: &Path) -> std::io::Result<tokio::fs::File> {
            Err(std::io::Error::new(std::io::ErrorKind::Unsupported, "mock"))
        }
    }

    struct NoDisks;

    impl SpaceProbe for NoDisks {
        fn available_space(&self, _dir: &Path) -> std::result::Result<u64, String> {
            Err("no disks".into())
        }
    }

    #[tokio::test]
    async fn unreachable_listing_is_an_empty_run() {
        let fs = MockFileSystem::default();
        let config = DownloadConfig::new()
            .with_source_url("http://127.0.0.1:1/listing")
            .with_target_dir("/roms");
        let manager = DownloadManager::with_parts(reqwest::Client::new(), config, fs.clone(), NoDisks);

        let outcome = manager.run(&crate::NoProgress).await.unwrap();

        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run, got {outcome:?}");
        };
        assert_eq!(summary.files_transferred, 0);
        assert_eq!(*fs.dirs.lock().unwrap(), vec![std::path::PathBuf::from("/roms")]);
    }

    #[tokio::test]
    async fn existing_target_dir_is_not_recreated() {
        let fs = MockFileSystem::default();
        fs.dirs.lock().unwrap().push("/roms".into());
        let config = DownloadConfig::new()
            .with_source_url("http://127.0.0.1:1/listing")
            .with_target_dir("/roms");
        let manager = DownloadManager::with_parts(reqwest::Client::new(), config, fs.clone(), NoDisks);

        manager.run(&crate::NoProgress).await.unwrap();
        assert_eq!(fs.dirs.lock().unwrap().len(), 1);
    }
}
