//! Audio responder: validation, confinement and byte ranges

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use podfeed_core::FeedStrategy;

use crate::support::{TestServer, body_bytes, body_text, header};

fn sample_audio() -> Vec<u8> {
    (0..=255u8).cycle().take(1000).collect()
}

#[tokio::test]
async fn test_full_file_download() {
    let audio = sample_audio();
    let server = TestServer::start(&[("track.mp3", &audio)], FeedStrategy::Rebuild).await;

    let response = server.get("/files/track.mp3").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("audio/mpeg"));
    assert_eq!(header(&response, "accept-ranges"), Some("bytes"));
    assert_eq!(header(&response, "content-length"), Some("1000"));
    assert_eq!(body_bytes(response).await, audio);
}

#[tokio::test]
async fn test_partial_content_for_range() {
    let audio = sample_audio();
    let server = TestServer::start(&[("track.mp3", &audio)], FeedStrategy::Rebuild).await;

    let response = server.get_range("/files/track.mp3", "bytes=100-199").await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header(&response, "content-range"), Some("bytes 100-199/1000"));
    assert_eq!(header(&response, "content-length"), Some("100"));
    assert_eq!(body_bytes(response).await, audio[100..200].to_vec());
}

#[tokio::test]
async fn test_suffix_range_returns_tail() {
    let audio = sample_audio();
    let server = TestServer::start(&[("track.mp3", &audio)], FeedStrategy::Rebuild).await;

    let response = server.get_range("/files/track.mp3", "bytes=-10").await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header(&response, "content-range"), Some("bytes 990-999/1000"));
    assert_eq!(body_bytes(response).await, audio[990..].to_vec());
}

#[tokio::test]
async fn test_range_past_end_is_416() {
    let server = TestServer::start(&[("track.mp3", &sample_audio())], FeedStrategy::Rebuild).await;

    let response = server.get_range("/files/track.mp3", "bytes=5000-").await;

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(header(&response, "content-range"), Some("bytes */1000"));
}

#[tokio::test]
async fn test_mixed_case_extension_is_served() {
    let server = TestServer::start(&[("track.MP3", b"loud")], FeedStrategy::Rebuild).await;

    let response = server.get("/files/track.MP3").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("audio/mpeg"));
    assert_eq!(body_bytes(response).await, b"loud".to_vec());
}

#[tokio::test]
async fn test_non_audio_name_is_400() {
    let server = TestServer::start(&[("readme.txt", b"hello")], FeedStrategy::Rebuild).await;

    let response = server.get("/files/readme.txt").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Only MP3 files are supported");
}

#[tokio::test]
async fn test_missing_audio_file_is_404() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;

    let response = server.get("/files/evil.mp3").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_directory_named_like_audio_is_404() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;
    std::fs::create_dir(server.root().join("album.mp3")).unwrap();

    let response = server.get("/files/album.mp3").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_encoded_traversal_is_rejected() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;
    std::fs::write(server.dir.path().join("secret.mp3"), b"private").unwrap();

    for uri in ["/files/..%2Fsecret.mp3", "/files/..%5Csecret.mp3"] {
        let response = server.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_ne!(body_bytes(response).await, b"private".to_vec());
    }
}

#[tokio::test]
async fn test_head_request_has_headers_only() {
    let server = TestServer::start(&[("track.mp3", &sample_audio())], FeedStrategy::Rebuild).await;

    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/files/track.mp3")
        .body(Body::empty())
        .unwrap();
    let response = server.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-length"), Some("1000"));
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_conditional_request_gets_304() {
    let audio = sample_audio();
    let server = TestServer::start(&[("track.mp3", &audio)], FeedStrategy::Rebuild).await;

    let first = server.get("/files/track.mp3").await;
    assert_eq!(first.status(), StatusCode::OK);
    let last_modified = header(&first, "last-modified")
        .expect("last-modified header")
        .to_string();
    assert!(last_modified.ends_with(" GMT"), "{last_modified}");

    for since in [last_modified.as_str(), "Fri, 01 Jan 2100 00:00:00 GMT"] {
        let request = Request::get("/files/track.mp3")
            .header("if-modified-since", since)
            .body(Body::empty())
            .unwrap();
        let response = server.send(request).await;

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED, "{since}");
        assert_eq!(header(&response, "last-modified"), Some(last_modified.as_str()));
        assert!(body_bytes(response).await.is_empty());
    }

    let stale = Request::get("/files/track.mp3")
        .header("if-modified-since", "Thu, 01 Jan 1970 00:00:00 GMT")
        .body(Body::empty())
        .unwrap();
    let response = server.send(stale).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, audio);
}
