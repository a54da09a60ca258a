//! Feed assembly and the build-strategy aware feed provider
//!
//! A feed is built in three steps: list the files root, map every entry to a
//! [`FeedItem`], then serialize the [`FeedEnvelope`] as RSS 2.0. Any failing
//! item fails the whole build; there is no partial feed.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::PodfeedConfig;
use crate::item::{FeedItem, build_item};
use crate::library::{DirectoryEntry, ensure_root_exists, list_directory};
use crate::rss::RssDocument;
use crate::strategy::FeedStrategy;

/// Errors that occur while building or reading a feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Files directory '{}' does not exist", path.display())]
    RootMissing { path: PathBuf },

    #[error("Failed to read directory '{}': {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Feed item has no title")]
    EmptyTitle,

    #[error("Failed to serialize feed: {0}")]
    Serialize(#[from] quick_xml::SeError),

    #[error("Failed to parse feed: {0}")]
    Parse(#[from] quick_xml::DeError),
}

/// Channel metadata plus its ordered items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEnvelope {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: String,
    pub created: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

impl FeedEnvelope {
    /// Serialize the envelope as an RSS 2.0 document.
    ///
    /// # Errors
    ///
    /// - `FeedError::Serialize` - If XML serialization fails
    pub fn render(&self) -> Result<String, FeedError> {
        RssDocument::from(self).to_xml()
    }
}

/// Build the envelope for `entries`, one item per entry in listing order.
///
/// # Errors
///
/// - `FeedError::EmptyTitle` - If any entry has an empty name
pub async fn assemble_feed(
    entries: &[DirectoryEntry],
    config: &PodfeedConfig,
    created: DateTime<Utc>,
) -> Result<FeedEnvelope, FeedError> {
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let item = build_item(entry, &config.feed.item_url, &config.library.files_dir).await?;
        items.push(item);
    }

    Ok(FeedEnvelope {
        title: config.feed.title.clone(),
        link: config.feed.link.clone(),
        description: config.feed.description.clone(),
        author: config.feed.author.clone(),
        created,
        items,
    })
}

/// List the files root and render a fresh feed document.
///
/// # Errors
///
/// - `FeedError::DirectoryRead` - If the files root cannot be listed
/// - `FeedError::EmptyTitle` - If an entry has an empty name
/// - `FeedError::Serialize` - If XML serialization fails
pub async fn generate_feed(config: &PodfeedConfig) -> Result<String, FeedError> {
    let entries = list_directory(&config.library.files_dir).await?;
    let feed = assemble_feed(&entries, config, Utc::now()).await?;
    let document = feed.render()?;

    debug!(
        "Generated feed with {} items ({} bytes)",
        feed.items.len(),
        document.len()
    );
    Ok(document)
}

#[derive(Debug, Clone)]
enum FeedSource {
    Rebuild(Arc<PodfeedConfig>),
    Snapshot(Bytes),
}

/// Hands out the feed document according to the configured [`FeedStrategy`].
///
/// Cloning is cheap; the snapshot and configuration are shared and never
/// mutated after initialization. Handing out the snapshot bumps a reference
/// count instead of copying the document.
#[derive(Debug, Clone)]
pub struct FeedProvider {
    source: FeedSource,
}

impl FeedProvider {
    /// Prepare the provider for `config.strategy`.
    ///
    /// `Rebuild` only checks that the files root exists. `Startup` builds the
    /// document immediately and keeps it.
    ///
    /// # Errors
    ///
    /// - `FeedError::RootMissing` - If the files root does not exist (rebuild)
    /// - Any error of [`generate_feed`] (startup)
    pub async fn initialize(config: Arc<PodfeedConfig>) -> Result<Self, FeedError> {
        let source = match config.strategy {
            FeedStrategy::Rebuild => {
                ensure_root_exists(&config.library.files_dir).await?;
                FeedSource::Rebuild(config)
            }
            FeedStrategy::Startup => {
                let document = generate_feed(&config).await?;
                info!("Built feed snapshot ({} bytes)", document.len());
                FeedSource::Snapshot(Bytes::from(document))
            }
        };

        Ok(Self { source })
    }

    /// Strategy this provider was initialized with.
    pub fn strategy(&self) -> FeedStrategy {
        match self.source {
            FeedSource::Rebuild(_) => FeedStrategy::Rebuild,
            FeedSource::Snapshot(_) => FeedStrategy::Startup,
        }
    }

    /// Current feed document.
    ///
    /// # Errors
    ///
    /// - Any error of [`generate_feed`] when rebuilding per request
    pub async fn document(&self) -> Result<Bytes, FeedError> {
        match &self.source {
            FeedSource::Rebuild(config) => Ok(Bytes::from(generate_feed(config).await?)),
            FeedSource::Snapshot(document) => Ok(document.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::config::FeedMetadata;
    use crate::library::EntryKind;

    fn parse(document: &[u8]) -> RssDocument {
        RssDocument::parse(std::str::from_utf8(document).unwrap()).unwrap()
    }

    fn config_for(root: &Path, strategy: FeedStrategy) -> PodfeedConfig {
        let mut config = PodfeedConfig {
            feed: FeedMetadata {
                title: "Morning Show".to_string(),
                link: "http://cast.local/".to_string(),
                description: "Daily episodes".to_string(),
                author: "Ana".to_string(),
                item_url: "http://cast.local".to_string(),
            },
            strategy,
            ..Default::default()
        };
        config.library.files_dir = root.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_assemble_keeps_listing_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("episode1.mp3"), vec![1u8; 1000]).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        let config = config_for(dir.path(), FeedStrategy::Rebuild);
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();

        let entries = list_directory(dir.path()).await.unwrap();
        let feed = assemble_feed(&entries, &config, created).await.unwrap();

        assert_eq!(feed.title, "Morning Show");
        assert_eq!(feed.author, "Ana");
        assert_eq!(feed.created, created);
        let titles: Vec<_> = feed.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["episode1.mp3", "notes.txt"]);
        assert_eq!(feed.items[0].enclosure.as_ref().map(|e| e.length), Some(1000));
        assert_eq!(feed.items[1].enclosure, None);
    }

    #[tokio::test]
    async fn test_one_bad_entry_fails_whole_feed() {
        let dir = TempDir::new().unwrap();
        let config = config_for(dir.path(), FeedStrategy::Rebuild);
        let entries = vec![
            DirectoryEntry::new("good.txt", EntryKind::File),
            DirectoryEntry::new("", EntryKind::File),
        ];

        let result = assemble_feed(&entries, &config, Utc::now()).await;
        assert!(matches!(result, Err(FeedError::EmptyTitle)));
    }

    #[tokio::test]
    async fn test_rendered_feed_round_trips() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.mp3"), vec![0u8; 12]).unwrap();
        std::fs::write(dir.path().join("b.MP3"), vec![0u8; 34]).unwrap();
        std::fs::write(dir.path().join("c.pdf"), b"%PDF").unwrap();
        let config = config_for(dir.path(), FeedStrategy::Rebuild);
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();

        let entries = list_directory(dir.path()).await.unwrap();
        let feed = assemble_feed(&entries, &config, created).await.unwrap();
        let doc = RssDocument::parse(&feed.render().unwrap()).unwrap();

        assert_eq!(doc.version, "2.0");
        assert_eq!(doc.channel.title, "Morning Show");
        assert_eq!(doc.channel.link, "http://cast.local/");
        assert_eq!(doc.channel.description, "Daily episodes");
        assert_eq!(doc.channel.managing_editor.as_deref(), Some("Ana"));
        assert_eq!(
            doc.channel.pub_date.as_deref(),
            Some("Wed, 1 May 2024 08:30:00 +0000")
        );
        assert_eq!(doc.channel.items.len(), feed.items.len());
        for (parsed, built) in doc.channel.items.iter().zip(&feed.items) {
            assert_eq!(parsed.title, built.title);
            assert_eq!(parsed.link, built.link);
            assert_eq!(
                parsed.enclosure.as_ref().map(|e| (&e.url, e.length, &e.mime_type)),
                built.enclosure.as_ref().map(|e| (&e.url, e.length, &e.mime_type))
            );
        }
        assert_eq!(
            doc.channel.items[1].enclosure.as_ref().map(|e| e.url.as_str()),
            Some("http://cast.local/files/b.MP3")
        );
    }

    #[tokio::test]
    async fn test_rebuild_provider_sees_new_files() {
        let dir = TempDir::new().unwrap();
        let config = Arc::new(config_for(dir.path(), FeedStrategy::Rebuild));
        let provider = FeedProvider::initialize(config).await.unwrap();
        assert_eq!(provider.strategy(), FeedStrategy::Rebuild);

        let before = parse(&provider.document().await.unwrap());
        std::fs::write(dir.path().join("late.mp3"), b"abc").unwrap();
        let after = parse(&provider.document().await.unwrap());

        assert!(before.channel.items.is_empty());
        assert_eq!(after.channel.items.len(), 1);
        assert_eq!(after.channel.items[0].title, "late.mp3");
    }

    #[tokio::test]
    async fn test_startup_provider_keeps_snapshot() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("first.mp3"), b"abc").unwrap();
        let config = Arc::new(config_for(dir.path(), FeedStrategy::Startup));
        let provider = FeedProvider::initialize(config).await.unwrap();
        assert_eq!(provider.strategy(), FeedStrategy::Startup);

        let before = provider.document().await.unwrap();
        std::fs::write(dir.path().join("second.mp3"), b"def").unwrap();
        let after = provider.document().await.unwrap();

        // Same allocation: the snapshot is shared, not copied per request
        assert_eq!(before.as_ptr(), after.as_ptr());
        assert_eq!(before, after);
        assert_eq!(parse(&after).channel.items.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_root_fails_both_strategies() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("files");

        let rebuild = Arc::new(config_for(&missing, FeedStrategy::Rebuild));
        assert!(matches!(
            FeedProvider::initialize(rebuild).await,
            Err(FeedError::RootMissing { .. })
        ));

        let startup = Arc::new(config_for(&missing, FeedStrategy::Startup));
        assert!(matches!(
            FeedProvider::initialize(startup).await,
            Err(FeedError::DirectoryRead { .. })
        ));
    }

    #[tokio::test]
    async fn test_rebuild_reports_root_removed_after_start() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("files");
        std::fs::create_dir(&root).unwrap();
        let config = Arc::new(config_for(&root, FeedStrategy::Rebuild));
        let provider = FeedProvider::initialize(config).await.unwrap();

        std::fs::remove_dir(&root).unwrap();

        assert!(matches!(
            provider.document().await,
            Err(FeedError::DirectoryRead { .. })
        ));
    }
}
