//! Feed route behaviour against a real directory

use axum::http::StatusCode;
use podfeed_core::{FeedStrategy, RssDocument};
use podfeed_web::AppState;
use tempfile::TempDir;

use crate::support::{ITEM_URL, TestServer, body_text, header, test_config};

#[tokio::test]
async fn test_feed_lists_every_entry_in_order() {
    let server = TestServer::start(
        &[
            ("episode1.mp3", &[7u8; 1000]),
            ("notes.txt", b"show notes"),
        ],
        FeedStrategy::Rebuild,
    )
    .await;

    let response = server.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("application/rss+xml"));

    let doc = RssDocument::parse(&body_text(response).await).unwrap();
    assert_eq!(doc.channel.title, "Morning Show");
    assert_eq!(doc.channel.items.len(), 2);

    let episode = &doc.channel.items[0];
    assert_eq!(episode.title, "episode1.mp3");
    assert_eq!(episode.link, format!("{ITEM_URL}/episode1.mp3"));
    let enclosure = episode.enclosure.as_ref().unwrap();
    assert_eq!(enclosure.url, format!("{ITEM_URL}/files/episode1.mp3"));
    assert_eq!(enclosure.length, 1000);
    assert_eq!(enclosure.mime_type, "audio/mpeg");

    let notes = &doc.channel.items[1];
    assert_eq!(notes.title, "notes.txt");
    assert_eq!(notes.enclosure, None);
}

#[tokio::test]
async fn test_rebuild_strategy_reflects_directory_changes() {
    let server = TestServer::start(&[("a.mp3", b"aaaa")], FeedStrategy::Rebuild).await;

    std::fs::write(server.root().join("b.mp3"), b"bbbbbb").unwrap();
    std::fs::remove_file(server.root().join("a.mp3")).unwrap();

    let doc = RssDocument::parse(&body_text(server.get("/").await).await).unwrap();
    let titles: Vec<_> = doc.channel.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["b.mp3"]);
    assert_eq!(doc.channel.items[0].enclosure.as_ref().map(|e| e.length), Some(6));
}

#[tokio::test]
async fn test_startup_strategy_serves_snapshot() {
    let server = TestServer::start(&[("a.mp3", b"aaaa")], FeedStrategy::Startup).await;
    let first = body_text(server.get("/").await).await;

    std::fs::write(server.root().join("b.mp3"), b"bbbbbb").unwrap();
    let second = body_text(server.get("/").await).await;

    assert_eq!(first, second);
    assert_eq!(RssDocument::parse(&second).unwrap().channel.items.len(), 1);
}

// Regular files only: a directory with an audio name is covered below.
#[tokio::test]
async fn test_enclosure_urls_resolve_on_media_route() {
    let server = TestServer::start(
        &[("loud.MP3", b"0123456789"), ("quiet.mp3", b"01234")],
        FeedStrategy::Rebuild,
    )
    .await;

    let doc = RssDocument::parse(&body_text(server.get("/").await).await).unwrap();
    for item in &doc.channel.items {
        let enclosure = item.enclosure.as_ref().unwrap();
        let path = enclosure.url.strip_prefix(ITEM_URL).unwrap();

        let response = server.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(
            header(&response, "content-length"),
            Some(enclosure.length.to_string().as_str())
        );
    }
}

#[tokio::test]
async fn test_audio_named_directory_enclosure_is_not_servable() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;
    std::fs::create_dir(server.root().join("album.mp3")).unwrap();

    let doc = RssDocument::parse(&body_text(server.get("/").await).await).unwrap();
    let enclosure = doc.channel.items[0].enclosure.as_ref().unwrap();
    assert_eq!(enclosure.url, format!("{ITEM_URL}/files/album.mp3"));

    let path = enclosure.url.strip_prefix(ITEM_URL).unwrap();
    assert_eq!(server.get(path).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_removed_root_returns_500() {
    let server = TestServer::start(&[], FeedStrategy::Rebuild).await;
    std::fs::remove_dir(server.root()).unwrap();

    let response = server.get("/").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert_eq!(body, "Internal server error");
}

#[tokio::test]
async fn test_missing_root_fails_before_serving() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("files");

    for strategy in [FeedStrategy::Rebuild, FeedStrategy::Startup] {
        let result = AppState::initialize(test_config(&missing, strategy)).await;
        assert!(result.is_err(), "{strategy} started without a files root");
    }
}
