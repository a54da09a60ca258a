//! HTTP request handlers organized by functionality

pub mod feed;
pub mod index;
pub mod media;
pub mod range;

// Re-export handler functions
pub use feed::feed_document;
pub use index::directory_index;
pub use media::serve_media;
pub use range::{ByteRange, RangeRequest, parse_range_header};
