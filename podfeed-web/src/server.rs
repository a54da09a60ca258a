//! HTTP server for Podfeed
//!
//! Three route classes share one files root: the RSS document at `/`, the
//! audio responder under `/files/`, and a generic static server under `/feed`
//! that lists directories when no file matches.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::handler::Handler;
use axum::routing::get;
use podfeed_core::routes::{FEED_ROUTE, STATIC_ROUTE_PREFIX, media_route};
use podfeed_core::{FeedError, FeedProvider, PodfeedConfig, PodfeedError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{directory_index, feed_document, serve_media};

/// State shared by every handler.
///
/// Both fields are immutable after startup, so clones are handed to
/// concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Process configuration, read once at startup
    pub config: Arc<PodfeedConfig>,
    /// Source of the feed document
    pub feed: FeedProvider,
}

impl AppState {
    /// Freeze `config` and prepare the feed provider for its strategy.
    ///
    /// # Errors
    /// - `FeedError::RootMissing` - Files root absent (rebuild strategy)
    /// - Any feed build error (startup strategy)
    pub async fn initialize(config: PodfeedConfig) -> Result<Self, FeedError> {
        let config = Arc::new(config);
        let feed = FeedProvider::initialize(Arc::clone(&config)).await?;
        Ok(Self { config, feed })
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.library.files_dir)
        .append_index_html_on_directories(false)
        .fallback(directory_index.with_state(state.clone()));

    Router::new()
        .route(FEED_ROUTE, get(feed_document))
        .route(&media_route(), get(serve_media))
        .nest_service(STATIC_ROUTE_PREFIX, static_files)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until the process stops.
///
/// # Errors
/// - `PodfeedError::Io` - Binding the listener or serving failed
pub async fn run_server(state: AppState) -> Result<(), PodfeedError> {
    let address = SocketAddr::new(state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(address).await?;

    info!(
        "HTTP server running on {} (files: {}, feed strategy: {})",
        listener.local_addr()?,
        state.config.library.files_dir.display(),
        state.feed.strategy()
    );

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
