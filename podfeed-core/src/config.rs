//! Centralized configuration for Podfeed.
//!
//! Every setting is read once at startup, from the environment or an
//! equivalent key lookup, and frozen for the lifetime of the process.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::strategy::FeedStrategy;

/// Base URL used to build item links and enclosure URLs.
pub const ENV_ITEM_URL: &str = "ITEM_URL";
/// Channel title.
pub const ENV_FEED_TITLE: &str = "FEED_TITLE";
/// Channel link.
pub const ENV_FEED_URL: &str = "FEED_URL";
/// Channel description.
pub const ENV_FEED_DESC: &str = "FEED_DESC";
/// Channel author name.
pub const ENV_FEED_AUTHOR: &str = "FEED_AUTHOR";
/// Listening port.
pub const ENV_HTTP_PORT: &str = "HTTP_PORT";
/// Listening address.
pub const ENV_HTTP_HOST: &str = "HTTP_HOST";
/// Root directory of servable files.
pub const ENV_FILES_DIR: &str = "FILES_DIR";
/// Feed build strategy, `rebuild` or `startup`.
pub const ENV_FEED_STRATEGY: &str = "FEED_STRATEGY";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FILES_DIR: &str = "./files";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Central configuration for all Podfeed components.
#[derive(Debug, Clone, Default)]
pub struct PodfeedConfig {
    pub feed: FeedMetadata,
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub strategy: FeedStrategy,
}

/// Channel-level metadata copied into every generated feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedMetadata {
    /// Channel title
    pub title: String,
    /// Channel link
    pub link: String,
    /// Channel description
    pub description: String,
    /// Author name, rendered as the managing editor
    pub author: String,
    /// Base URL for item links and enclosures
    pub item_url: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Location of the files exposed by the feed.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub files_dir: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            files_dir: PathBuf::from(DEFAULT_FILES_DIR),
        }
    }
}

impl PodfeedConfig {
    /// Creates configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidValue` - If a port, host or strategy variable is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Missing feed metadata becomes an empty string. Missing listener,
    /// directory and strategy keys fall back to their defaults; present but
    /// malformed values are rejected.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidValue` - If a port, host or strategy value is malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).unwrap_or_default();

        let mut config = Self {
            feed: FeedMetadata {
                title: text(ENV_FEED_TITLE),
                link: text(ENV_FEED_URL),
                description: text(ENV_FEED_DESC),
                author: text(ENV_FEED_AUTHOR),
                item_url: text(ENV_ITEM_URL),
            },
            ..Default::default()
        };

        if let Some(port) = lookup(ENV_HTTP_PORT) {
            config.server.port = parse_value(ENV_HTTP_PORT, &port)?;
        }

        if let Some(host) = lookup(ENV_HTTP_HOST) {
            config.server.host = parse_value(ENV_HTTP_HOST, &host)?;
        }

        if let Some(dir) = lookup(ENV_FILES_DIR).filter(|dir| !dir.is_empty()) {
            config.library.files_dir = PathBuf::from(dir);
        }

        if let Some(strategy) = lookup(ENV_FEED_STRATEGY) {
            config.strategy = parse_value(ENV_FEED_STRATEGY, &strategy)?;
        }

        Ok(config)
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_values() {
        let config = PodfeedConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.feed, FeedMetadata::default());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.library.files_dir, PathBuf::from("./files"));
        assert_eq!(config.strategy, FeedStrategy::Rebuild);
    }

    #[test]
    fn test_reads_all_keys() {
        let config = PodfeedConfig::from_lookup(lookup_from(&[
            ("ITEM_URL", "http://cast.local"),
            ("FEED_TITLE", "Morning Show"),
            ("FEED_URL", "http://cast.local/"),
            ("FEED_DESC", "Daily episodes"),
            ("FEED_AUTHOR", "Ana"),
            ("HTTP_PORT", "9000"),
            ("HTTP_HOST", "127.0.0.1"),
            ("FILES_DIR", "/srv/audio"),
            ("FEED_STRATEGY", "startup"),
        ]))
        .unwrap();

        assert_eq!(config.feed.item_url, "http://cast.local");
        assert_eq!(config.feed.title, "Morning Show");
        assert_eq!(config.feed.link, "http://cast.local/");
        assert_eq!(config.feed.description, "Daily episodes");
        assert_eq!(config.feed.author, "Ana");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.library.files_dir, PathBuf::from("/srv/audio"));
        assert_eq!(config.strategy, FeedStrategy::Startup);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = PodfeedConfig::from_lookup(lookup_from(&[("HTTP_PORT", "eighty")])).unwrap_err();

        let ConfigError::InvalidValue { key, value, .. } = err;
        assert_eq!(key, "HTTP_PORT");
        assert_eq!(value, "eighty");
    }

    #[test]
    fn test_invalid_strategy_is_rejected() {
        let result = PodfeedConfig::from_lookup(lookup_from(&[("FEED_STRATEGY", "lazy")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_files_dir_keeps_default() {
        let config = PodfeedConfig::from_lookup(lookup_from(&[("FILES_DIR", "")])).unwrap();
        assert_eq!(config.library.files_dir, PathBuf::from("./files"));
    }
}
