//! Podfeed Web - Feed and media HTTP server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Serves the RSS document built by `podfeed-core`, streams audio files with
//! byte-range support, and exposes the files root as plain static content.

pub mod error;
pub mod handlers;
pub mod server;

// Re-export main types
pub use error::ServeError;
pub use server::{AppState, build_router, run_server};
