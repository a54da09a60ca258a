//! Mapping of request failures onto HTTP responses

use axum::http::StatusCode;
use axum::http::header::{ACCEPT_RANGES, CONTENT_RANGE};
use axum::response::{IntoResponse, Response};
use podfeed_core::FeedError;
use tracing::{debug, error};

/// Errors a request handler can end with.
///
/// Client mistakes get a specific 4xx status. Everything else is logged and
/// answered with a generic 500 so server paths never reach the client.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// The media route was asked for a non-audio file
    #[error("Only MP3 files are supported")]
    UnsupportedMediaType {
        /// Requested name
        filename: String,
    },

    /// The requested name would resolve outside the files root
    #[error("Invalid file name")]
    InvalidPath {
        /// Requested name
        filename: String,
    },

    /// No regular file with that name exists
    #[error("File not found")]
    NotFound {
        /// Requested name
        filename: String,
    },

    /// The Range header lies entirely past the end of the file
    #[error("Requested range not satisfiable")]
    RangeNotSatisfiable {
        /// Size of the file in bytes
        total_size: u64,
    },

    /// Listing or rendering the feed failed
    #[error("Feed generation failed: {0}")]
    Feed(#[from] FeedError),

    /// Reading a file failed after it was found
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The response could not be assembled
    #[error("Failed to build response: {0}")]
    Http(#[from] axum::http::Error),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        match &self {
            ServeError::UnsupportedMediaType { filename } | ServeError::InvalidPath { filename } => {
                debug!("Rejected media request for {:?}: {}", filename, self);
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ServeError::NotFound { filename } => {
                debug!("File not found: {:?}", filename);
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            ServeError::RangeNotSatisfiable { total_size } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [
                    (CONTENT_RANGE, format!("bytes */{total_size}")),
                    (ACCEPT_RANGES, "bytes".to_string()),
                ],
                self.to_string(),
            )
                .into_response(),
            ServeError::Feed(e) => {
                error!("Error generating feed: {}", e);
                internal_error()
            }
            ServeError::Io(e) => {
                error!("Error reading media file: {}", e);
                internal_error()
            }
            ServeError::Http(e) => {
                error!("Error building response: {}", e);
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
