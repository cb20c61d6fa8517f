//! Configuration types for download operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Listing page of the MAME 0.202 software list collection.
pub const DEFAULT_SOURCE_URL: &str =
    "https://archive.org/details/MAME_0.202_Software_List_ROMs_merged";

/// Origin that relative download links are resolved against.
pub const DEFAULT_ARCHIVE_ORIGIN: &str = "https://archive.org";

/// Class attribute marking a downloadable-file row on the listing page.
pub const DEFAULT_MARKER_CLASS: &str = "format-file";

/// Configuration for download operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Listing page to read the manifest from.
    pub source_url: String,
    /// Directory the files are written to.
    pub target_dir: PathBuf,
    /// File name to resume the batch from.
    pub resume_filename: Option<String>,
    /// Origin used to resolve relative download links.
    pub archive_origin: String,
    /// Class attribute of a file row on the listing page.
    pub marker_class: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            target_dir: default_target_dir(),
            resume_filename: None,
            archive_origin: DEFAULT_ARCHIVE_ORIGIN.to_string(),
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            user_agent: concat!("mame-dl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `<downloads>/MAME/ROMS`, or `./MAME/ROMS` when the platform has no downloads folder.
#[must_use]
pub fn default_target_dir() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("MAME")
        .join("ROMS")
}

/// Default location of the configuration file.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mame-dl").join("config.toml"))
}

impl DownloadConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the listing page URL.
    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Sets the target directory.
    #[must_use]
    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = dir.into();
        self
    }

    /// Sets the file to resume from. An empty name clears it.
    #[must_use]
    pub fn with_resume_filename(mut self, filename: Option<String>) -> Self {
        self.resume_filename = filename.filter(|name| !name.is_empty());
        self
    }

    /// Sets the origin for relative download links.
    #[must_use]
    pub fn with_archive_origin(mut self, origin: impl Into<String>) -> Self {
        self.archive_origin = origin.into();
        self
    }

    /// Sets the class attribute identifying file rows.
    #[must_use]
    pub fn with_marker_class(mut self, class: impl Into<String>) -> Self {
        self.marker_class = class.into();
        self
    }

    /// Returns the resume filename, treating an empty string as unset.
    #[must_use]
    pub fn resume(&self) -> Option<&str> {
        self.resume_filename.as_deref().filter(|name| !name.is_empty())
    }

    /// Loads a configuration from a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Loads `path`, or the default config file if it exists, or the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be loaded, or if
    /// the default file exists but is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn from_toml(contents: &str) -> std::result::Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }
}
