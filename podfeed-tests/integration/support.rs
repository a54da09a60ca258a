//! Shared fixtures for the integration tests

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response};
use podfeed_core::{FeedMetadata, FeedStrategy, PodfeedConfig};
use podfeed_web::{AppState, build_router};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ITEM_URL: &str = "http://cast.local";

/// A temporary files root with a router serving it
pub struct TestServer {
    pub dir: TempDir,
    pub router: Router,
}

impl TestServer {
    pub async fn start(files: &[(&str, &[u8])], strategy: FeedStrategy) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("files");
        std::fs::create_dir(&root).unwrap();
        for (name, contents) in files {
            std::fs::write(root.join(name), contents).unwrap();
        }

        let state = AppState::initialize(test_config(&root, strategy))
            .await
            .unwrap();

        Self {
            dir,
            router: build_router(state),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("files")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_range(&self, uri: &str, range: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header("range", range)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn test_config(root: &Path, strategy: FeedStrategy) -> PodfeedConfig {
    let mut config = PodfeedConfig {
        feed: FeedMetadata {
            title: "Morning Show".to_string(),
            link: "http://cast.local/".to_string(),
            description: "Daily episodes".to_string(),
            author: "Ana".to_string(),
            item_url: ITEM_URL.to_string(),
        },
        strategy,
        ..Default::default()
    };
    config.library.files_dir = root.to_path_buf();
    config
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
