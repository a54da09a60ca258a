//! HTTP paths shared between feed generation and the router.
//!
//! Enclosure URLs are built from the same constants the web server registers,
//! so a changed prefix moves both together.

/// Path of the RSS document.
pub const FEED_ROUTE: &str = "/";

/// Prefix of the audio-only file route. Enclosure URLs are
/// `<item url>` + this prefix + file name.
pub const MEDIA_ROUTE_PREFIX: &str = "/files/";

/// Prefix of the generic static file route.
pub const STATIC_ROUTE_PREFIX: &str = "/feed";

/// Content type of the RSS document.
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";

/// Axum route pattern for the media responder.
pub fn media_route() -> String {
    format!("{MEDIA_ROUTE_PREFIX}{{filename}}")
}
