mod common;

use mame_dl::{DownloadEntry, Error, Manifest, TransferRunner};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{RecordingProgress, serve_file};

fn manifest(server: &MockServer, files: &[(&str, u64)]) -> Manifest {
    files
        .iter()
        .map(|(name, size)| {
            DownloadEntry::new(*name, *size, format!("{}/download/set/{name}", server.uri()))
        })
        .collect()
}

#[tokio::test]
async fn downloads_every_entry_in_order() {
    let server = MockServer::start().await;
    serve_file(&server, "a.zip", b"first file").await;
    serve_file(&server, "b.zip", b"second").await;

    let dir = TempDir::new().unwrap();
    let progress = RecordingProgress::default();
    let runner = TransferRunner::new(reqwest::Client::new());

    let summary = runner
        .run(
            manifest(&server, &[("a.zip", 1024), ("b.zip", 2048)]),
            dir.path(),
            None,
            &progress,
        )
        .await
        .unwrap();

    assert_eq!(
        progress.events(),
        vec!["start 0% 1/2 a.zip", "start 33% 2/2 b.zip", "complete"]
    );
    assert_eq!(std::fs::read(dir.path().join("a.zip")).unwrap(), b"first file");
    assert_eq!(std::fs::read(dir.path().join("b.zip")).unwrap(), b"second");

    assert_eq!(summary.files_transferred, 2);
    assert_eq!(summary.estimated_bytes, 3072);
    assert_eq!(summary.bytes_written, 16);
}

#[tokio::test]
async fn resume_skips_earlier_entries() {
    let server = MockServer::start().await;
    serve_file(&server, "b.zip", b"bbb").await;
    serve_file(&server, "c.zip", b"ccc").await;

    let dir = TempDir::new().unwrap();
    let progress = RecordingProgress::default();
    let runner = TransferRunner::new(reqwest::Client::new());

    let summary = runner
        .run(
            manifest(&server, &[("a.zip", 100), ("b.zip", 100), ("c.zip", 300)]),
            dir.path(),
            Some("b.zip"),
            &progress,
        )
        .await
        .unwrap();

    // total is b + c = 400, so c starts at 100 * 100 / 400; the count is the whole listing
    assert_eq!(
        progress.events(),
        vec!["start 0% 1/3 b.zip", "start 25% 2/3 c.zip", "complete"]
    );
    assert!(!dir.path().join("a.zip").exists());
    assert_eq!(summary.estimated_bytes, 400);
}

#[tokio::test]
async fn unknown_resume_name_transfers_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let progress = RecordingProgress::default();
    let runner = TransferRunner::new(reqwest::Client::new());

    let summary = runner
        .run(
            manifest(&server, &[("a.zip", 100), ("b.zip", 100)]),
            dir.path(),
            Some("zzz.zip"),
            &progress,
        )
        .await
        .unwrap();

    assert_eq!(progress.events(), vec!["complete"]);
    assert_eq!(summary.files_transferred, 0);
    assert_eq!(summary.bytes_written, 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn empty_manifest_only_completes() {
    let dir = TempDir::new().unwrap();
    let progress = RecordingProgress::default();
    let runner = TransferRunner::new(reqwest::Client::new());

    runner
        .run(Manifest::new(), dir.path(), None, &progress)
        .await
        .unwrap();

    assert!(progress.file_starts().is_empty());
    assert_eq!(progress.count("complete"), 1);
}

#[tokio::test]
async fn zero_size_estimates_report_zero_percent() {
    let server = MockServer::start().await;
    serve_file(&server, "a.zip", b"a").await;
    serve_file(&server, "b.zip", b"b").await;

    let dir = TempDir::new().unwrap();
    let progress = RecordingProgress::default();
    let runner = TransferRunner::new(reqwest::Client::new());

    runner
        .run(
            manifest(&server, &[("a.zip", 0), ("b.zip", 0)]),
            dir.path(),
            None,
            &progress,
        )
        .await
        .unwrap();

    assert_eq!(
        progress.file_starts(),
        vec!["start 0% 1/2 a.zip", "start 0% 2/2 b.zip"]
    );
}

#[tokio::test]
async fn existing_files_are_overwritten() {
    let server = MockServer::start().await;
    serve_file(&server, "a.zip", b"new").await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.zip"), b"old and longer contents").unwrap();

    TransferRunner::new(reqwest::Client::new())
        .run(
            manifest(&server, &[("a.zip", 3)]),
            dir.path(),
            None,
            &mame_dl::NoProgress,
        )
        .await
        .unwrap();

    assert_eq!(std::fs::read(dir.path().join("a.zip")).unwrap(), b"new");
}

#[tokio::test]
async fn failed_file_aborts_the_batch() {
    let server = MockServer::start().await;
    serve_file(&server, "a.zip", b"aaa").await;
    Mock::given(method("GET"))
        .and(path("/download/set/b.zip"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let progress = RecordingProgress::default();
    let runner = TransferRunner::new(reqwest::Client::new());

    let result = runner
        .run(
            manifest(&server, &[("a.zip", 1), ("b.zip", 1), ("c.zip", 1)]),
            dir.path(),
            None,
            &progress,
        )
        .await;

    match result {
        Err(Error::Transfer { filename, .. }) => assert_eq!(filename, "b.zip"),
        other => panic!("expected a transfer error, got {other:?}"),
    }
    assert_eq!(
        progress.events(),
        vec!["start 0% 1/3 a.zip", "start 33% 2/3 b.zip", "error b.zip"]
    );
    assert!(dir.path().join("a.zip").exists());
    assert!(!dir.path().join("c.zip").exists());
}
