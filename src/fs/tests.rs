use std::io::ErrorKind;

use super::*;
use crate::arc_path;

#[tokio::test]
async fn test_mock_write_then_read() {
    let fs = Fs::mock();
    let dir = arc_path("/etc/sandwich-hub");
    let file = arc_path("/etc/sandwich-hub/config.toml");

    fs.mkdir(dir).await.unwrap();
    fs.write(file.clone(), "api_base_url = \"x\"").await.unwrap();
    assert_eq!(
        fs.read_to_string(file).await.unwrap(),
        "api_base_url = \"x\""
    );
}

#[tokio::test]
async fn test_mock_append_creates_and_extends() {
    let fs = Fs::mock();
    let file = arc_path("latest.log");

    fs.append(file.clone(), "one\n").await.unwrap();
    fs.append(file.clone(), "two\n").await.unwrap();
    assert_eq!(fs.read_to_string(file).await.unwrap(), "one\ntwo\n");
}

#[tokio::test]
async fn test_mock_missing_file_is_not_found() {
    let fs = Fs::mock();
    let err = fs.read_to_string(arc_path("nope.toml")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_mock_read_dir_returns_virtual_paths() {
    let fs = Fs::mock();
    let dir = arc_path("/logs");
    fs.mkdir(dir.clone()).await.unwrap();
    fs.write(arc_path("/logs/a.log"), "").await.unwrap();

    let entries = fs.read_dir(dir).await.unwrap();
    assert_eq!(entries, vec![arc_path("/logs/a.log")]);

    // The listed path is usable with the same mock
    fs.remove_file(entries[0].clone()).await.unwrap();
    assert!(fs.read_dir(arc_path("/logs")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_actual_fs_round_trip() {
    let tmp = tempfile::TempDir::new().unwrap();
    let fs = Fs::spawn();
    let file = arc_path(tmp.path().join("nested").join("storage.toml"));

    fs.mkdir(arc_path(tmp.path().join("nested"))).await.unwrap();
    fs.write(file.clone(), "a").await.unwrap();
    fs.append(file.clone(), "b").await.unwrap();
    assert_eq!(fs.read_to_string(file.clone()).await.unwrap(), "ab");
    assert!(fs.age(file.clone()).await.unwrap().as_secs() < 60);
    fs.remove_file(file.clone()).await.unwrap();
    assert!(fs.read_to_string(file).await.is_err());
}
