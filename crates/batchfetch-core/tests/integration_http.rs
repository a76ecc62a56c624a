//! Integration tests: HTTP transport against a local server.

mod common;

use batchfetch_core::fetch;
use batchfetch_core::progress::{ProgressValues, ReadClose};
use batchfetch_core::transport::{HttpTransport, Transport};
use std::io::Read;
use std::path::PathBuf;
use tempfile::tempdir;
use url::Url;

fn urls(base: &str, paths: &[&str]) -> Vec<Url> {
    paths
        .iter()
        .map(|p| Url::parse(&format!("{}{}", base, p)).unwrap())
        .collect()
}

#[test]
fn get_streams_body_and_tracks_progress() {
    let want = "Content to be served";
    let base = common::path_server::start(&[("/", want)]);
    let progress = ProgressValues::new();
    let transport = HttpTransport::default();

    let mut reader = fetch::get(&progress, &transport, &urls(&base, &["/"])[0]).unwrap();
    let mut got = String::new();
    reader.read_to_string(&mut got).unwrap();
    reader.close().unwrap();

    assert_eq!(got, want);
    assert_eq!(progress.total(), Some(want.len() as u64));
    assert_eq!(progress.current(), want.len() as u64);
    assert!(progress.is_finished());
}

#[test]
fn get_file_saves_body() {
    let want = "Content to be served";
    let base = common::path_server::start(&[("/file.txt", want)]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("testGetFile.txt");
    let progress = ProgressValues::new();

    let n = fetch::get_file(
        &progress,
        &HttpTransport::default(),
        &urls(&base, &["/file.txt"])[0],
        &path,
    )
    .unwrap();

    assert_eq!(n, want.len() as u64);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), want);
    assert_eq!(progress.current(), progress.total().unwrap());
}

#[test]
fn open_of_missing_path_is_404() {
    let base = common::path_server::start(&[("/here", "x")]);
    let err = HttpTransport::default()
        .open(&urls(&base, &["/gone"])[0])
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "received HTTP code 404: Not Found");
}

#[test]
fn get_list_concatenates_sources() {
    let base = common::path_server::start(&[("/path1", "foo"), ("/path2", "bar"), ("/path3", "BOO!")]);
    let progress = ProgressValues::new();
    let sources = urls(&base, &["/path1", "/path2", "/path3"]);

    let mut reader = fetch::get_list(&progress, HttpTransport::default(), sources).unwrap();
    assert_eq!(progress.total(), Some(10));
    let mut got = String::new();
    reader.read_to_string(&mut got).unwrap();

    assert_eq!(got, "foobarBOO!");
    assert_eq!(progress.current(), 10);
}

#[test]
fn get_list_reports_bad_url_from_probe() {
    let base = common::path_server::start(&[("/path1", "foo"), ("/path2", "bar"), ("/path3", "BOO!")]);
    let progress = ProgressValues::new();
    let sources = urls(&base, &["/path1", "/path2", "/path4"]);

    let err = fetch::get_list(&progress, HttpTransport::default(), sources).unwrap_err();
    assert_eq!(err.index(), 2);
    assert_eq!(err.error().status(), Some(404));
    assert_eq!(progress.total(), Some(6));

    // the returned reader still yields what it can before failing on /path4
    let mut reader = err.into_reader();
    let mut got = Vec::new();
    assert!(reader.read_to_end(&mut got).is_err());
    assert_eq!(got, b"foobar");
}

#[test]
fn total_size_sums_content_lengths() {
    let base = common::path_server::start(&[("/a", "12345"), ("/b", "678")]);
    let transport = HttpTransport::default();
    assert_eq!(fetch::total_size(&transport, &urls(&base, &["/a", "/b"])).unwrap(), 8);
    let err = fetch::total_size(&transport, &urls(&base, &["/a", "/nope"])).unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn fetch_all_reports_each_failed_download() {
    let base = common::path_server::start(&[("/one", "1"), ("/three", "333")]);
    let dir = tempdir().unwrap();
    let targets: Vec<(Url, PathBuf)> = urls(&base, &["/one", "/two", "/three"])
        .into_iter()
        .zip(["one", "two", "three"])
        .map(|(u, name)| (u, dir.path().join(name)))
        .collect();

    let err = fetch::fetch_all(&HttpTransport::default(), &targets, |_| ProgressValues::new())
        .unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(err.errors()[0].index, 1);
    assert_eq!(std::fs::read_to_string(dir.path().join("one")).unwrap(), "1");
    assert_eq!(std::fs::read_to_string(dir.path().join("three")).unwrap(), "333");
    assert!(!dir.path().join("two").exists());
}
