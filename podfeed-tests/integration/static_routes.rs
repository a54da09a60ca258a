//! Generic static files under the `/feed` prefix

use axum::http::StatusCode;
use podfeed_core::FeedStrategy;

use crate::support::{TestServer, body_bytes, body_text, header};

#[tokio::test]
async fn test_serves_any_file_type() {
    let server = TestServer::start(
        &[("notes.txt", b"show notes"), ("episode.mp3", b"audio")],
        FeedStrategy::Rebuild,
    )
    .await;

    let notes = server.get("/feed/notes.txt").await;
    assert_eq!(notes.status(), StatusCode::OK);
    assert_eq!(body_text(notes).await, "show notes");

    let episode = server.get("/feed/episode.mp3").await;
    assert_eq!(episode.status(), StatusCode::OK);
    assert_eq!(body_bytes(episode).await, b"audio".to_vec());
}

#[tokio::test]
async fn test_static_prefix_supports_ranges() {
    let server = TestServer::start(&[("notes.txt", b"0123456789")], FeedStrategy::Rebuild).await;

    let response = server.get_range("/feed/notes.txt", "bytes=2-4").await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header(&response, "content-range"), Some("bytes 2-4/10"));
    assert_eq!(body_text(response).await, "234");
}

#[tokio::test]
async fn test_static_prefix_reaches_subdirectories() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;
    std::fs::create_dir(server.root().join("extras")).unwrap();
    std::fs::write(server.root().join("extras").join("cover.txt"), b"art").unwrap();

    let response = server.get("/feed/extras/cover.txt").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "art");
}

#[tokio::test]
async fn test_static_prefix_cannot_escape_root() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;
    std::fs::write(server.dir.path().join("secret.txt"), b"private").unwrap();

    for uri in [
        "/feed/../secret.txt",
        "/feed/%2e%2e/secret.txt",
        "/feed/..%2Fsecret.txt",
        "/feed/../",
        "/feed/%2e%2e/",
    ] {
        let response = server.get(uri).await;
        assert_ne!(response.status(), StatusCode::OK, "{uri}");
        let body = body_text(response).await;
        assert!(!body.contains("private"), "{uri}");
        assert!(!body.contains("secret.txt"), "{uri}");
    }
}

#[tokio::test]
async fn test_prefix_root_lists_directory() {
    let server = TestServer::start(
        &[("notes.txt", b"show notes"), ("episode 1.mp3", b"audio")],
        FeedStrategy::Rebuild,
    )
    .await;
    std::fs::create_dir(server.root().join("extras")).unwrap();

    let response = server.get("/feed/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        header(&response, "content-type").is_some_and(|value| value.starts_with("text/html"))
    );
    let page = body_text(response).await;
    assert!(page.contains("<a href=\"episode%201.mp3\">episode 1.mp3</a>"), "{page}");
    assert!(page.contains("<a href=\"extras/\">extras/</a>"), "{page}");
    assert!(page.contains("<a href=\"notes.txt\">notes.txt</a>"), "{page}");
}

#[tokio::test]
async fn test_bare_prefix_redirects_to_listing() {
    let server = TestServer::start(&[("notes.txt", b"show notes")], FeedStrategy::Rebuild).await;

    let response = server.get("/feed").await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(header(&response, "location"), Some("/feed/"));
}

#[tokio::test]
async fn test_subdirectory_listing() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;
    std::fs::create_dir(server.root().join("extras")).unwrap();
    std::fs::write(server.root().join("extras").join("cover.txt"), b"art").unwrap();
    std::fs::write(server.root().join("extras").join("<b>&.txt"), b"odd").unwrap();

    let redirect = server.get("/feed/extras").await;
    assert_eq!(redirect.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(header(&redirect, "location"), Some("/feed/extras/"));

    let response = server.get("/feed/extras/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<a href=\"cover.txt\">cover.txt</a>"), "{page}");
    assert!(page.contains("<a href=\"%3Cb%3E%26.txt\">&lt;b&gt;&amp;.txt</a>"), "{page}");
}

#[tokio::test]
async fn test_missing_directory_is_404() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;

    let response = server.get("/feed/absent/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_static_file_is_404() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;

    let response = server.get("/feed/absent.txt").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
