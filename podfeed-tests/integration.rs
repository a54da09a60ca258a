//! Integration tests for Podfeed
//!
//! These tests drive the full router in process: feed generation from a real
//! directory, the audio responder with byte ranges, and the static prefix.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/feed_routes.rs"]
mod feed_routes;

#[path = "integration/media_routes.rs"]
mod media_routes;

#[path = "integration/static_routes.rs"]
mod static_routes;
