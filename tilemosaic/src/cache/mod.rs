//! Disk-backed tile cache.
//!
//! Raw tile bytes live on disk at paths derived deterministically from the
//! tile key, one cache root per layer:
//!
//! ```text
//! <root>/<level>/<row>/<level>_<row>_<col>.<ext>
//! ```
//!
//! Entries are content-addressed by key and immutable once written: the
//! bytes behind a key never change, so a hit needs no validation beyond
//! existence. Writes go to a process-unique temp name and are renamed into
//! place, which makes same-key races between concurrent sessions resolve
//! last-writer-wins with identical content and guarantees no reader ever
//! observes a half-written entry.

use crate::schema::ImageFormat;
use crate::tile::TileKey;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Failed to persist a cache entry.
///
/// Not retried internally; the orchestrator decides whether to skip the
/// tile or abort the render.
#[derive(Debug, Error)]
#[error("failed to write cache entry {path}: {source}")]
pub struct CacheWriteError {
    /// Destination path of the failed write.
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Monotonic suffix distinguishing temp files of concurrent writers
/// within this process; the pid distinguishes processes.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Key-addressed store of raw tile bytes for one layer.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
    format: ImageFormat,
}

impl FileCache {
    /// Create a cache rooted at `root`, storing tiles of `format`.
    ///
    /// The directory is created lazily on first write, not here.
    pub fn new(root: impl Into<PathBuf>, format: ImageFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The image format this cache stores.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Deterministic path for a key. Pure; performs no I/O.
    pub fn file_name(&self, key: &TileKey) -> PathBuf {
        self.root
            .join(key.level.to_string())
            .join(key.row.to_string())
            .join(format!(
                "{}_{}_{}.{}",
                key.level,
                key.row,
                key.col,
                self.format.extension()
            ))
    }

    /// True iff a complete artifact for `key` is on disk.
    pub fn exists(&self, key: &TileKey) -> bool {
        self.file_name(key).is_file()
    }

    /// Write `bytes` as the entry for `key`, creating parent directories
    /// as needed. Returns the entry's path.
    ///
    /// Idempotent-safe: re-adding a key with the same bytes leaves the
    /// entry unchanged in content. The write lands in a temp file first
    /// and is renamed into place, so concurrent writers of the same key
    /// race harmlessly.
    ///
    /// # Errors
    ///
    /// [`CacheWriteError`] on any I/O failure (disk full, permissions).
    pub fn add(&self, key: &TileKey, bytes: &[u8]) -> Result<PathBuf, CacheWriteError> {
        let path = self.file_name(key);
        let parent = path.parent().expect("cache paths always have a parent");

        let wrap = |source: std::io::Error| CacheWriteError {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(parent).map_err(wrap)?;

        let temp = parent.join(format!(
            ".{}_{}_{}.{}-{}.part",
            key.level,
            key.row,
            key.col,
            std::process::id(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed),
        ));

        fs::write(&temp, bytes).map_err(wrap)?;
        if let Err(e) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(wrap(e));
        }

        Ok(path)
    }

    /// Read the bytes cached for `key`, if present.
    pub fn read(&self, key: &TileKey) -> std::io::Result<Option<Vec<u8>>> {
        match fs::read(self.file_name(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache() -> (TempDir, FileCache) {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("layer"), ImageFormat::Png);
        (dir, cache)
    }

    #[test]
    fn test_file_name_layout() {
        let cache = FileCache::new("/cache/osm", ImageFormat::Jpg);
        let key = TileKey::new(15, 12754, 5279);

        assert_eq!(
            cache.file_name(&key),
            PathBuf::from("/cache/osm/15/12754/15_12754_5279.jpg")
        );
    }

    #[test]
    fn test_file_name_is_format_specific() {
        let png = FileCache::new("/c", ImageFormat::Png);
        let tif = FileCache::new("/c", ImageFormat::Tif);
        let key = TileKey::new(1, 2, 3);

        assert_ne!(png.file_name(&key), tif.file_name(&key));
        assert!(png.file_name(&key).to_string_lossy().ends_with(".png"));
    }

    #[test]
    fn test_add_then_exists_and_read() {
        let (_dir, cache) = cache();
        let key = TileKey::new(3, 4, 5);

        assert!(!cache.exists(&key));

        let path = cache.add(&key, b"tile-bytes").unwrap();
        assert!(cache.exists(&key));
        assert_eq!(path, cache.file_name(&key));
        assert_eq!(cache.read(&key).unwrap().unwrap(), b"tile-bytes");
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_dir, cache) = cache();
        let key = TileKey::new(3, 4, 5);

        cache.add(&key, b"tile-bytes").unwrap();
        cache.add(&key, b"tile-bytes").unwrap();

        assert!(cache.exists(&key));
        assert_eq!(cache.read(&key).unwrap().unwrap(), b"tile-bytes");
    }

    #[test]
    fn test_add_leaves_no_temp_files() {
        let (_dir, cache) = cache();
        let key = TileKey::new(0, 0, 0);

        cache.add(&key, &[7u8; 64]).unwrap();

        let dir = cache.file_name(&key);
        let entries: Vec<_> = fs::read_dir(dir.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["0_0_0.png"]);
    }

    #[test]
    fn test_read_missing_is_none() {
        let (_dir, cache) = cache();
        assert!(cache.read(&TileKey::new(9, 9, 9)).unwrap().is_none());
    }

    #[test]
    fn test_distinct_keys_distinct_paths() {
        let (_dir, cache) = cache();

        cache.add(&TileKey::new(1, 0, 0), b"a").unwrap();
        cache.add(&TileKey::new(1, 0, 1), b"b").unwrap();
        cache.add(&TileKey::new(2, 0, 0), b"c").unwrap();

        assert_eq!(cache.read(&TileKey::new(1, 0, 0)).unwrap().unwrap(), b"a");
        assert_eq!(cache.read(&TileKey::new(1, 0, 1)).unwrap().unwrap(), b"b");
        assert_eq!(cache.read(&TileKey::new(2, 0, 0)).unwrap().unwrap(), b"c");
    }

    #[test]
    fn test_add_unwritable_root_fails() {
        let cache = FileCache::new("/proc/tilemosaic-denied", ImageFormat::Png);
        let result = cache.add(&TileKey::new(0, 0, 0), b"x");
        assert!(result.is_err());
    }
}
