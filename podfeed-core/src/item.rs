//! Feed item construction from directory entries

use std::path::Path;

use tracing::{debug, warn};

use crate::feed::FeedError;
use crate::library::DirectoryEntry;
use crate::routes::MEDIA_ROUTE_PREFIX;

/// File extension that earns an enclosure, compared case-insensitively.
pub const AUDIO_EXTENSION: &str = ".mp3";

/// MIME type advertised for audio enclosures and media responses.
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Downloadable media attached to a feed item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    /// Size in bytes at build time
    pub length: u64,
    pub mime_type: String,
}

/// One entry of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub enclosure: Option<Enclosure>,
}

/// Check whether a file name carries the recognized audio extension.
pub fn is_audio_file(name: &str) -> bool {
    name.to_lowercase().ends_with(AUDIO_EXTENSION)
}

/// Build the enclosure URL for `name`.
///
/// A single trailing slash on `item_url` is dropped before the media route
/// prefix is appended.
pub fn enclosure_url(item_url: &str, name: &str) -> String {
    let base = item_url.strip_suffix('/').unwrap_or(item_url);
    format!("{base}{MEDIA_ROUTE_PREFIX}{name}")
}

/// Map a directory entry onto a feed item.
///
/// Audio files get an enclosure sized from a fresh stat of `root/name`. If
/// that stat fails the item is still produced, without an enclosure.
///
/// # Errors
///
/// - `FeedError::EmptyTitle` - If the entry has an empty name
pub async fn build_item(
    entry: &DirectoryEntry,
    item_url: &str,
    root: &Path,
) -> Result<FeedItem, FeedError> {
    let title = entry.name.clone();
    if title.is_empty() {
        return Err(FeedError::EmptyTitle);
    }

    let link = format!("{item_url}/{title}");

    let enclosure = if is_audio_file(&title) {
        match tokio::fs::metadata(root.join(&title)).await {
            Ok(metadata) => Some(Enclosure {
                url: enclosure_url(item_url, &title),
                length: metadata.len(),
                mime_type: AUDIO_MIME_TYPE.to_string(),
            }),
            Err(e) => {
                warn!("Could not get file info for {}: {}", title, e);
                None
            }
        }
    } else {
        None
    };

    debug!(
        "Built feed item {} (enclosure: {})",
        title,
        enclosure.is_some()
    );

    Ok(FeedItem {
        title,
        link,
        enclosure,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::library::EntryKind;

    #[test]
    fn test_is_audio_file_ignores_case() {
        assert!(is_audio_file("episode.mp3"));
        assert!(is_audio_file("EPISODE.MP3"));
        assert!(is_audio_file("mixed.Mp3"));
        assert!(!is_audio_file("notes.txt"));
        assert!(!is_audio_file("mp3"));
        assert!(!is_audio_file("track.mp3.part"));
    }

    #[test]
    fn test_enclosure_url_trims_one_slash() {
        assert_eq!(
            enclosure_url("http://cast.local", "a.mp3"),
            "http://cast.local/files/a.mp3"
        );
        assert_eq!(
            enclosure_url("http://cast.local/", "a.mp3"),
            "http://cast.local/files/a.mp3"
        );
        assert_eq!(
            enclosure_url("http://cast.local//", "a.mp3"),
            "http://cast.local//files/a.mp3"
        );
    }

    #[tokio::test]
    async fn test_audio_entry_gets_sized_enclosure() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("episode1.mp3"), vec![0u8; 1000]).unwrap();
        let entry = DirectoryEntry::new("episode1.mp3", EntryKind::File);

        let item = build_item(&entry, "http://cast.local", dir.path())
            .await
            .unwrap();

        assert_eq!(item.title, "episode1.mp3");
        assert_eq!(item.link, "http://cast.local/episode1.mp3");
        assert_eq!(
            item.enclosure,
            Some(Enclosure {
                url: "http://cast.local/files/episode1.mp3".to_string(),
                length: 1000,
                mime_type: "audio/mpeg".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_link_keeps_base_verbatim() {
        let dir = TempDir::new().unwrap();
        let entry = DirectoryEntry::new("notes.txt", EntryKind::File);

        let item = build_item(&entry, "http://cast.local/", dir.path())
            .await
            .unwrap();

        assert_eq!(item.link, "http://cast.local//notes.txt");
        assert_eq!(item.enclosure, None);
    }

    #[tokio::test]
    async fn test_failed_stat_omits_enclosure() {
        let dir = TempDir::new().unwrap();
        let entry = DirectoryEntry::new("vanished.mp3", EntryKind::File);

        let item = build_item(&entry, "http://cast.local", dir.path())
            .await
            .unwrap();

        assert_eq!(item.title, "vanished.mp3");
        assert_eq!(item.enclosure, None);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let entry = DirectoryEntry::new("", EntryKind::File);

        let result = build_item(&entry, "http://cast.local", dir.path()).await;
        assert!(matches!(result, Err(FeedError::EmptyTitle)));
    }
}
