//! Free-space checks for the download directory.

use std::path::{Path, PathBuf};

use sysinfo::Disks;

/// Reports the bytes available on the volume holding a directory.
pub trait SpaceProbe: Send + Sync {
    /// Returns the available bytes for `dir`, or why they could not be determined.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure when the volume cannot be queried.
    fn available_space(&self, dir: &Path) -> std::result::Result<u64, String>;
}

/// [`SpaceProbe`] backed by the operating system's mounted disk list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpaceProbe;

impl SystemSpaceProbe {
    /// Creates a new `SystemSpaceProbe` instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SpaceProbe for SystemSpaceProbe {
    fn available_space(&self, dir: &Path) -> std::result::Result<u64, String> {
        let target = nearest_existing_path(dir);
        let target = std::fs::canonicalize(&target).unwrap_or(target);
        let disks = Disks::new_with_refreshed_list();

        // The deepest mount point containing the directory owns it.
        disks
            .list()
            .iter()
            .filter(|disk| target.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(sysinfo::Disk::available_space)
            .ok_or_else(|| format!("no mounted volume contains {}", target.display()))
    }
}

fn nearest_existing_path(path: &Path) -> PathBuf {
    let mut candidate = path.to_path_buf();
    while !candidate.exists() {
        if !candidate.pop() {
            return PathBuf::from(".");
        }
    }
    candidate
}

/// Outcome of comparing required bytes with the free space on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapacityVerdict {
    /// Enough space is available.
    Sufficient {
        /// Available bytes on the volume.
        available: u64,
    },
    /// The download would not fit. The batch must not start.
    Insufficient {
        /// Estimated bytes the batch needs.
        required: u64,
        /// Available bytes on the volume.
        available: u64,
    },
    /// Free space is unknown; the download proceeds without a gate.
    Unknown {
        /// Why the query failed.
        reason: String,
    },
}

impl CapacityVerdict {
    /// Returns true if the batch may start.
    #[must_use]
    pub const fn allows_download(&self) -> bool {
        !matches!(self, Self::Insufficient { .. })
    }
}

/// Gates a batch on the free space of its target volume.
#[derive(Debug, Clone, Default)]
pub struct CapacityChecker<P: SpaceProbe = SystemSpaceProbe> {
    probe: P,
}

impl CapacityChecker<SystemSpaceProbe> {
    /// Creates a checker querying the real disks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            probe: SystemSpaceProbe,
        }
    }
}

impl<P: SpaceProbe> CapacityChecker<P> {
    /// Creates a checker with a custom probe.
    #[must_use]
    pub const fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Compares `required` bytes with the space available for `dir`.
    ///
    /// A failed query yields [`CapacityVerdict::Unknown`], never an error.
    pub fn check(&self, dir: &Path, required: u64) -> CapacityVerdict {
        match self.probe.available_space(dir) {
            Ok(available) if required > available => CapacityVerdict::Insufficient {
                required,
                available,
            },
            Ok(available) => CapacityVerdict::Sufficient { available },
            Err(reason) => {
                log::warn!(
                    "Free space query for {} failed, continuing without a capacity check: {reason}",
                    dir.display()
                );
                CapacityVerdict::Unknown { reason }
            }
        }
    }
}
