//! Listing-page scraping and the ordered download manifest.

use reqwest::Url;
use scraper::{Html, Selector};

use crate::size::parse_size_text;

/// A single downloadable file found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    /// Local file name, also used as the resume key.
    pub filename: String,
    /// Estimated size in bytes.
    pub size: u64,
    /// Absolute download URL.
    pub url: String,
}

impl DownloadEntry {
    /// Creates a new entry.
    pub fn new(filename: impl Into<String>, size: u64, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            size,
            url: url.into(),
        }
    }
}

/// Where a resumed session starts within a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePoint {
    /// No resume filename was given; start with the first entry.
    Start,
    /// The resume filename is the entry at this index.
    At(usize),
    /// The resume filename is not in the manifest. Nothing is transferred.
    NotFound,
}

/// An ordered list of entries with unique file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<DownloadEntry>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry unless its file name is already present.
    ///
    /// Returns `false` when the entry was dropped as a duplicate.
    pub fn push(&mut self, entry: DownloadEntry) -> bool {
        if self.entries.iter().any(|e| e.filename == entry.filename) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Returns all entries in listing order.
    #[must_use]
    pub fn entries(&self) -> &[DownloadEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Locates the resume filename. `None` and `""` both mean "from the start".
    #[must_use]
    pub fn resume_point(&self, resume: Option<&str>) -> ResumePoint {
        match resume.filter(|name| !name.is_empty()) {
            None => ResumePoint::Start,
            Some(name) => self
                .entries
                .iter()
                .position(|e| e.filename == name)
                .map_or(ResumePoint::NotFound, ResumePoint::At),
        }
    }

    /// Returns the entries a run with this resume filename would transfer.
    #[must_use]
    pub fn pending(&self, resume: Option<&str>) -> &[DownloadEntry] {
        match self.resume_point(resume) {
            ResumePoint::Start => &self.entries,
            ResumePoint::At(index) => &self.entries[index..],
            ResumePoint::NotFound => &[],
        }
    }

    /// Estimated bytes needed to transfer the pending entries.
    #[must_use]
    pub fn required_bytes(&self, resume: Option<&str>) -> u64 {
        self.pending(resume)
            .iter()
            .fold(0u64, |total, e| total.saturating_add(e.size))
    }
}

impl FromIterator<DownloadEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = DownloadEntry>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for entry in iter {
            manifest.push(entry);
        }
        manifest
    }
}

/// Result of reading a listing page.
///
/// A page that cannot be fetched or understood is not an error for the
/// caller: it produces [`FetchOutcome::Empty`] and the run has nothing to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was read; the manifest may still be empty.
    Fetched(Manifest),
    /// The page could not be used.
    Empty {
        /// Why the page was discarded.
        reason: String,
    },
}

impl FetchOutcome {
    /// Returns the manifest, or an empty one if the page was discarded.
    #[must_use]
    pub fn into_manifest(self) -> Manifest {
        match self {
            Self::Fetched(manifest) => manifest,
            Self::Empty { .. } => Manifest::new(),
        }
    }

    /// Returns true if the page was discarded.
    #[must_use]
    pub const fn is_empty_fallback(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Returns the last `/` segment of `href`, or the last `\` segment if there is no `/`.
#[must_use]
pub fn filename_from_href(href: &str) -> &str {
    href.rsplit_once('/')
        .or_else(|| href.rsplit_once('\\'))
        .map_or(href, |(_, name)| name)
}

/// Extracts the manifest from a listing page's HTML.
///
/// Every element carrying `marker_class` is a file row: its first `<a href>`
/// is the download link and its text holds the size estimate. A row without
/// a link makes the whole page unusable.
///
/// # Errors
///
/// Returns the reason the page was rejected.
pub fn parse_listing(
    html: &str,
    origin: &Url,
    marker_class: &str,
) -> std::result::Result<Manifest, String> {
    let rows = Selector::parse(&format!(".{marker_class}"))
        .map_err(|e| format!("invalid marker class {marker_class:?}: {e}"))?;
    let anchors = Selector::parse("a").map_err(|e| e.to_string())?;

    let document = Html::parse_document(html);
    let mut manifest = Manifest::new();

    for row in document.select(&rows) {
        let href = row
            .select(&anchors)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| format!("{marker_class} row without a download link"))?;

        let url = origin
            .join(href)
            .map_err(|e| format!("cannot resolve {href:?}: {e}"))?;
        let filename = filename_from_href(href);
        let text: String = row.text().collect();
        let entry = DownloadEntry::new(filename, parse_size_text(&text), url.to_string());

        if !manifest.push(entry) {
            log::warn!("Ignoring duplicate listing entry {filename}");
        }
    }

    Ok(manifest)
}

/// Loads listing pages and turns them into manifests.
#[derive(Debug, Clone)]
pub struct ManifestFetcher {
    client: reqwest::Client,
    origin: String,
    marker_class: String,
}

impl ManifestFetcher {
    /// Creates a fetcher resolving links against `origin` and matching rows by `marker_class`.
    pub fn new(
        client: reqwest::Client,
        origin: impl Into<String>,
        marker_class: impl Into<String>,
    ) -> Self {
        Self {
            client,
            origin: origin.into(),
            marker_class: marker_class.into(),
        }
    }

    /// Fetches `url` and extracts its manifest.
    ///
    /// Network, HTTP status and parse failures are folded into
    /// [`FetchOutcome::Empty`].
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let outcome = match self.load(url).await {
            Ok(html) => self.parse(&html),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(manifest) => {
                log::debug!("Found {} file(s) on {url}", manifest.len());
                FetchOutcome::Fetched(manifest)
            }
            Err(reason) => {
                log::warn!("Could not read listing {url}: {reason}");
                FetchOutcome::Empty { reason }
            }
        }
    }

    async fn load(&self, url: &str) -> crate::Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn parse(&self, html: &str) -> std::result::Result<Manifest, String> {
        let origin =
            Url::parse(&self.origin).map_err(|e| format!("invalid origin {:?}: {e}", self.origin))?;
        parse_listing(html, &origin, &self.marker_class)
    }
}
