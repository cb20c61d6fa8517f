#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use mame_dl::{DownloadProgress, FileStart, SpaceProbe, TransferSummary};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Progress events captured as plain strings.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn file_starts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with("start"))
            .collect()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl DownloadProgress for RecordingProgress {
    fn on_batch_start(&self, _target_dir: &Path, file_count: usize, source_url: &str) {
        self.push(format!("batch {file_count} {source_url}"));
    }

    fn on_resume(&self, filename: &str) {
        self.push(format!("resume {filename}"));
    }

    fn on_insufficient_space(&self, _target_dir: &Path, required: u64, available: u64) {
        self.push(format!("no-space {required} {available}"));
    }

    fn on_file_start(&self, start: &FileStart<'_>) {
        let name = start.path.file_name().unwrap().to_string_lossy();
        self.push(format!(
            "start {}% {}/{} {name}",
            start.percent, start.index, start.count
        ));
    }

    fn on_error(&self, filename: &str, _error: &str) {
        self.push(format!("error {filename}"));
    }

    fn on_batch_complete(&self, _summary: &TransferSummary) {
        self.push("complete".to_string());
    }
}

/// Reports a fixed free-space answer.
pub struct FixedProbe(pub Result<u64, String>);

impl SpaceProbe for FixedProbe {
    fn available_space(&self, _dir: &Path) -> Result<u64, String> {
        self.0.clone()
    }
}

/// Builds a listing page with one `format-file` row per `(filename, size)`.
pub fn listing_html(files: &[(&str, &str)]) -> String {
    let rows: String = files
        .iter()
        .map(|(name, size)| {
            format!(
                "<div class=\"format-file\"><a href=\"/download/set/{name}\">{name}</a>\n  {size}  \n</div>\n"
            )
        })
        .collect();
    format!("<html><body><div class=\"header\">Collection</div>\n{rows}</body></html>")
}

/// Serves the listing at `/details/set` and each file body at `/download/set/<name>`.
pub async fn serve_collection(server: &MockServer, files: &[(&str, &str, &str)]) {
    let listing: Vec<(&str, &str)> = files.iter().map(|(name, size, _)| (*name, *size)).collect();
    Mock::given(method("GET"))
        .and(path("/details/set"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&listing)))
        .mount(server)
        .await;

    for (name, _, body) in files {
        serve_file(server, name, body.as_bytes()).await;
    }
}

pub async fn serve_file(server: &MockServer, name: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/download/set/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}
