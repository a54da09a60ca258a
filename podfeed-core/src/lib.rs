//! Podfeed Core - Directory to podcast feed
//!
//! Lists a directory of audio files and turns it into an RSS 2.0 document:
//! configuration, directory listing, item and feed assembly, the wire model,
//! and the paths the web layer serves enclosures from.

pub mod config;
pub mod feed;
pub mod item;
pub mod library;
pub mod routes;
pub mod rss;
pub mod strategy;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ConfigError, FeedMetadata, LibraryConfig, PodfeedConfig, ServerConfig};
pub use feed::{FeedEnvelope, FeedError, FeedProvider, assemble_feed, generate_feed};
pub use item::{AUDIO_EXTENSION, AUDIO_MIME_TYPE, Enclosure, FeedItem, build_item, is_audio_file};
pub use library::{
    DirectoryEntry, EntryKind, list_directory, resolve_in_root, resolve_segments_in_root,
};
pub use rss::RssDocument;
pub use strategy::FeedStrategy;

/// Errors that can bubble up from any Podfeed subsystem.
#[derive(Debug, thiserror::Error)]
pub enum PodfeedError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PodfeedError>;
