//! Directory listing and path confinement for the files root

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::feed::FeedError;

/// Kind of filesystem object behind a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// A single direct child of the files root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// File name, without any leading path
    pub name: String,
    /// What the entry points at
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Create an entry from a name and kind
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// List the direct entries of `root`, sorted by name.
///
/// Subdirectories are returned as entries but never descended into.
///
/// # Errors
///
/// - `FeedError::DirectoryRead` - If the directory is missing or unreadable
pub async fn list_directory(root: &Path) -> Result<Vec<DirectoryEntry>, FeedError> {
    let read_error = |source| FeedError::DirectoryRead {
        path: root.to_path_buf(),
        source,
    };

    let mut reader = tokio::fs::read_dir(root).await.map_err(read_error)?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await.map_err(read_error)? {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                let lossy = raw.to_string_lossy().into_owned();
                warn!("Non UTF-8 file name in {}: {}", root.display(), lossy);
                lossy
            }
        };

        let kind = match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => EntryKind::File,
            Ok(file_type) if file_type.is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        };

        entries.push(DirectoryEntry { name, kind });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Verify the files root exists and is a directory.
///
/// # Errors
///
/// - `FeedError::RootMissing` - If the path is absent or not a directory
pub async fn ensure_root_exists(root: &Path) -> Result<(), FeedError> {
    match tokio::fs::metadata(root).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        _ => Err(FeedError::RootMissing {
            path: root.to_path_buf(),
        }),
    }
}

/// Join a requested file name onto `root`, refusing anything that could
/// leave it.
///
/// The name must be exactly one normal path component: separators, `.`,
/// `..` and absolute prefixes are rejected. Returns `None` when the name is
/// not confined.
pub fn resolve_in_root(root: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return None;
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Some(root.join(part)),
        _ => None,
    }
}

/// Join already-decoded path segments onto `root`, checking each one with
/// [`resolve_in_root`].
///
/// Empty segments (from doubled or trailing slashes) are skipped, so no
/// segments at all resolve to `root` itself.
pub fn resolve_segments_in_root<'a, I>(root: &Path, segments: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .try_fold(root.to_path_buf(), |path, segment| {
            resolve_in_root(&path, segment)
        })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_list_directory_sorted_without_recursion() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"bb").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("season2")).unwrap();
        std::fs::write(dir.path().join("season2").join("nested.mp3"), b"n").unwrap();

        let entries = list_directory(dir.path()).await.unwrap();

        assert_eq!(
            entries,
            vec![
                DirectoryEntry::new("a.txt", EntryKind::File),
                DirectoryEntry::new("b.mp3", EntryKind::File),
                DirectoryEntry::new("season2", EntryKind::Directory),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_name_is_listed_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.mp3");
        if std::fs::write(dir.path().join(raw), b"x").is_err() {
            // Some filesystems refuse names that are not valid UTF-8
            return;
        }

        let entries = list_directory(dir.path()).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "caf\u{FFFD}.mp3");
        assert_eq!(entries[0].kind, EntryKind::File);
    }

    #[tokio::test]
    async fn test_list_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");

        let err = list_directory(&missing).await.unwrap_err();
        assert!(matches!(err, FeedError::DirectoryRead { ref path, .. } if *path == missing));
    }

    #[tokio::test]
    async fn test_ensure_root_exists() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(ensure_root_exists(dir.path()).await.is_ok());
        assert!(matches!(
            ensure_root_exists(&file).await,
            Err(FeedError::RootMissing { .. })
        ));
        assert!(matches!(
            ensure_root_exists(&dir.path().join("nope")).await,
            Err(FeedError::RootMissing { .. })
        ));
    }

    #[test]
    fn test_resolve_in_root_accepts_plain_names() {
        let root = Path::new("/srv/files");
        assert_eq!(
            resolve_in_root(root, "episode 1.mp3"),
            Some(PathBuf::from("/srv/files/episode 1.mp3"))
        );
        assert_eq!(
            resolve_in_root(root, "..hidden.mp3"),
            Some(PathBuf::from("/srv/files/..hidden.mp3"))
        );
    }

    #[test]
    fn test_resolve_in_root_rejects_escapes() {
        let root = Path::new("/srv/files");
        for name in [
            "",
            ".",
            "..",
            "../secret.mp3",
            "nested/track.mp3",
            "/etc/passwd",
            "..\\secret.mp3",
            "a\0.mp3",
        ] {
            assert_eq!(resolve_in_root(root, name), None, "accepted {name:?}");
        }
    }

    #[test]
    fn test_resolve_segments_in_root() {
        let root = Path::new("/srv/files");

        assert_eq!(
            resolve_segments_in_root(root, ["season2", "", "extras"]),
            Some(PathBuf::from("/srv/files/season2/extras"))
        );
        assert_eq!(
            resolve_segments_in_root(root, std::iter::empty::<&str>()),
            Some(PathBuf::from("/srv/files"))
        );
        for segments in [
            vec!["season2", ".."],
            vec![".."],
            vec!["a/b"],
            vec!["a\0b"],
        ] {
            assert_eq!(
                resolve_segments_in_root(root, segments.iter().copied()),
                None,
                "accepted {segments:?}"
            );
        }
    }
}
