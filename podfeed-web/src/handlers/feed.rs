//! RSS document handler

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use podfeed_core::routes::RSS_CONTENT_TYPE;

use crate::error::ServeError;
use crate::server::AppState;

/// Serve the feed document, rebuilt or cached depending on strategy.
///
/// # Errors
/// - `ServeError::Feed` - Listing or rendering failed (logged, 500)
pub async fn feed_document(State(state): State<AppState>) -> Result<Response, ServeError> {
    let document = state.feed.document().await?;
    Ok(([(CONTENT_TYPE, RSS_CONTENT_TYPE)], document).into_response())
}
