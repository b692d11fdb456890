//! Integration tests for the remote-fetch sink against a local HTTP server.

mod common;

use common::media_server::{self, MediaServer};
use smx_core::materialize::{fetch_media_references, FetchOptions, DOWNLOADED_FILES_DIR};
use smx_core::model::MediaReference;
use std::fs;
use tempfile::tempdir;

fn reference(url: String, name: &str, mime: Option<&str>) -> MediaReference {
    MediaReference {
        url,
        display_name: name.to_string(),
        mime_type: mime.map(String::from),
        id: None,
    }
}

#[tokio::test]
async fn duplicate_urls_fetched_once_with_bearer() {
    let server = MediaServer::start(vec![("/files/cat.png", media_server::ok(b"meow"))]);
    let out = tempdir().unwrap();
    let url = server.url("/files/cat.png");
    let refs = vec![
        reference(url.clone(), "cat", Some("image/png")),
        reference(url.clone(), "cat-again.png", Some("image/png")),
    ];

    let report = fetch_media_references(&refs, Some("xoxp-secret"), out.path(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(server.hits("/files/cat.png"), 1);
    let req = &server.requests()[0];
    assert_eq!(req.method, "GET");
    assert_eq!(req.authorization.as_deref(), Some("Bearer xoxp-secret"));

    let dir = out.path().join(DOWNLOADED_FILES_DIR);
    assert_eq!(fs::read(dir.join("cat.png")).unwrap(), b"meow");
    assert!(!dir.join("cat-again.png").exists());
}

#[tokio::test]
async fn failures_are_isolated() {
    let server = MediaServer::start(vec![
        ("/ok.jpg", media_server::ok(b"jpeg-bytes")),
        ("/denied.jpg", media_server::status(403)),
        ("/broken.mp4", media_server::status(500)),
    ]);
    let out = tempdir().unwrap();
    let refs = vec![
        reference(server.url("/denied.jpg"), "denied.jpg", None),
        reference(server.url("/ok.jpg"), "ok.jpg", None),
        reference(server.url("/missing.gif"), "missing.gif", None),
        reference(server.url("/broken.mp4"), "broken.mp4", None),
    ];

    let opts = FetchOptions {
        max_concurrent: 2,
        ..FetchOptions::default()
    };
    let report = fetch_media_references(&refs, Some("tok"), out.path(), &opts)
        .await
        .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.failed, 3);
    assert_eq!(server.requests().len(), 4);
    let dir = out.path().join(DOWNLOADED_FILES_DIR);
    assert_eq!(fs::read(dir.join("ok.jpg")).unwrap(), b"jpeg-bytes");
    assert!(!dir.join("denied.jpg").exists());
    assert!(!dir.join("broken.mp4").exists());
}

#[tokio::test]
async fn unreachable_host_is_isolated() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let server = MediaServer::start(vec![("/a.png", media_server::ok(b"a"))]);
    let out = tempdir().unwrap();
    let refs = vec![
        reference(format!("http://127.0.0.1:{}/gone.png", port), "gone.png", None),
        reference(server.url("/a.png"), "a.png", None),
    ];

    let report = fetch_media_references(&refs, Some("tok"), out.path(), &FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn mime_extension_and_overwrite() {
    let server = MediaServer::start(vec![("/F123/download", media_server::ok(b"new"))]);
    let out = tempdir().unwrap();
    let dir = out.path().join(DOWNLOADED_FILES_DIR);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("photo.png"), b"old contents").unwrap();

    let refs = vec![reference(server.url("/F123/download"), "photo", Some("image/png"))];
    let report = fetch_media_references(&refs, Some("tok"), out.path(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(fs::read(dir.join("photo.png")).unwrap(), b"new");
}

#[tokio::test]
async fn many_urls_with_small_concurrency_cap() {
    let paths: Vec<String> = (0..10).map(|i| format!("/m/{}.gif", i)).collect();
    let routes = paths
        .iter()
        .map(|p| (p.as_str(), media_server::ok(p.as_bytes())))
        .collect();
    let server = MediaServer::start(routes);
    let out = tempdir().unwrap();
    let refs: Vec<_> = (0..10)
        .map(|i| reference(server.url(&paths[i]), &format!("{}.gif", i), None))
        .collect();

    let opts = FetchOptions {
        max_concurrent: 3,
        ..FetchOptions::default()
    };
    let report = fetch_media_references(&refs, Some("tok"), out.path(), &opts)
        .await
        .unwrap();
    assert_eq!(report.downloaded, 10);
    for (i, p) in paths.iter().enumerate() {
        let got = fs::read(out.path().join(DOWNLOADED_FILES_DIR).join(format!("{}.gif", i))).unwrap();
        assert_eq!(got, p.as_bytes());
    }
}

#[tokio::test]
async fn shared_destination_keeps_last_reference_regardless_of_latency() {
    let server = MediaServer::start(vec![
        ("/slow", media_server::delayed(b"FIRST", 600)),
        ("/fast", media_server::ok(b"SECOND")),
    ]);
    let out = tempdir().unwrap();
    let refs = vec![
        reference(server.url("/slow"), "image", Some("image/png")),
        reference(server.url("/fast"), "image", Some("image/png")),
    ];

    let report = fetch_media_references(&refs, Some("tok"), out.path(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.downloaded, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(server.hits("/slow"), 1);
    assert_eq!(server.hits("/fast"), 1);
    let got = fs::read(out.path().join(DOWNLOADED_FILES_DIR).join("image.png")).unwrap();
    assert_eq!(got, b"SECOND");
}
