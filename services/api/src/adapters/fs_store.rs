//! services/api/src/adapters/fs_store.rs
//!
//! This module contains the filesystem adapter, the concrete implementation
//! of the `AssetStore` port from the core crate. Each asset lives at a fixed
//! path inside the profile directory; metadata lookups go through a short-TTL
//! cache that is invalidated on every successful mutation.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use profile_pdf_core::domain::{AssetKind, AssetStat};
use profile_pdf_core::ports::{AssetStore, Clock, PortError, PortResult, SystemClock};

/// How long a cached stat snapshot stays fresh.
const STAT_CACHE_TTL_SECONDS: i64 = 5;

#[derive(Debug, Clone, Copy)]
struct CachedStat {
    stat: Option<AssetStat>,
    captured_at: DateTime<Utc>,
}

/// A filesystem-backed asset store.
///
/// Clearing truncates the file in place rather than unlinking it, and an
/// empty file is reported as absent everywhere, per the storage contract.
pub struct FileAssetStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
    cache: Mutex<HashMap<AssetKind, CachedStat>>,
}

impl FileAssetStore {
    /// Creates the store, ensuring the profile directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    /// Like [`FileAssetStore::new`] but with an injected clock, so tests can
    /// steer the stat-cache TTL.
    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            clock,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn path_of(&self, kind: AssetKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn invalidate(&self, kind: AssetKind) {
        self.cache
            .lock()
            .expect("stat cache lock poisoned")
            .remove(&kind);
    }

    fn cached(&self, kind: AssetKind, now: DateTime<Utc>) -> Option<Option<AssetStat>> {
        let cache = self.cache.lock().expect("stat cache lock poisoned");
        cache.get(&kind).and_then(|entry| {
            if now - entry.captured_at < Duration::seconds(STAT_CACHE_TTL_SECONDS) {
                Some(entry.stat)
            } else {
                None
            }
        })
    }

    async fn fresh_stat(&self, path: &Path) -> PortResult<Option<AssetStat>> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => {
                // Cleared assets are truncated, not removed; empty == absent.
                if metadata.len() == 0 {
                    return Ok(None);
                }
                let modified = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .map_err(|e| PortError::Io(e.to_string()))?;
                Ok(Some(AssetStat {
                    size: metadata.len(),
                    modified,
                }))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Io(e.to_string())),
        }
    }
}

#[async_trait]
impl AssetStore for FileAssetStore {
    async fn read(&self, kind: AssetKind) -> PortResult<Bytes> {
        match tokio::fs::read(self.path_of(kind)).await {
            Ok(bytes) if bytes.is_empty() => {
                Err(PortError::NotFound(kind.file_name().to_string()))
            }
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(PortError::NotFound(kind.file_name().to_string()))
            }
            Err(e) => Err(PortError::Io(e.to_string())),
        }
    }

    async fn write(&self, kind: AssetKind, bytes: &[u8]) -> PortResult<()> {
        tokio::fs::write(self.path_of(kind), bytes)
            .await
            .map_err(|e| PortError::Io(e.to_string()))?;
        self.invalidate(kind);
        debug!(asset = kind.file_name(), size = bytes.len(), "asset written");
        Ok(())
    }

    async fn clear(&self, kind: AssetKind) -> PortResult<bool> {
        let path = self.path_of(kind);
        match self.fresh_stat(&path).await? {
            Some(_) => {
                // Truncate in place so the path stays stable.
                tokio::fs::write(&path, b"")
                    .await
                    .map_err(|e| PortError::Io(e.to_string()))?;
                self.invalidate(kind);
                debug!(asset = kind.file_name(), "asset cleared");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn stat(&self, kind: AssetKind) -> PortResult<Option<AssetStat>> {
        let now = self.clock.now();
        if let Some(cached) = self.cached(kind, now) {
            return Ok(cached);
        }
        let stat = self.fresh_stat(&self.path_of(kind)).await?;
        self.cache
            .lock()
            .expect("stat cache lock poisoned")
            .insert(
                kind,
                CachedStat {
                    stat,
                    captured_at: now,
                },
            );
        Ok(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(now),
            })
        }

        fn advance(&self, seconds: i64) {
            let mut now = self.now.lock().unwrap();
            *now += Duration::seconds(seconds);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn store_with_manual_clock() -> (TempDir, Arc<ManualClock>, FileAssetStore) {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::starting_at(Utc::now());
        let store = FileAssetStore::with_clock(dir.path(), clock.clone()).unwrap();
        (dir, clock, store)
    }

    #[tokio::test]
    async fn write_then_read_round_trips_bytes() {
        let (_dir, _clock, store) = store_with_manual_clock();
        let payload = b"%PDF-1.4 1 0 obj endobj".to_vec();
        store.write(AssetKind::Document, &payload).await.unwrap();
        let read_back = store.read(AssetKind::Document).await.unwrap();
        assert_eq!(read_back.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn reading_an_absent_asset_is_not_found() {
        let (_dir, _clock, store) = store_with_manual_clock();
        assert!(matches!(
            store.read(AssetKind::Document).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn cleared_asset_is_truncated_in_place_and_reported_absent() {
        let (_dir, _clock, store) = store_with_manual_clock();
        store.write(AssetKind::Document, b"content").await.unwrap();

        assert!(store.clear(AssetKind::Document).await.unwrap());

        // The path still exists, but the asset reads and stats as absent.
        let path = store.path_of(AssetKind::Document);
        assert!(path.exists());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
        assert!(matches!(
            store.read(AssetKind::Document).await,
            Err(PortError::NotFound(_))
        ));
        assert_eq!(store.stat(AssetKind::Document).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clearing_an_absent_asset_reports_nothing_cleared() {
        let (_dir, _clock, store) = store_with_manual_clock();
        assert!(!store.clear(AssetKind::Document).await.unwrap());
        // Clearing twice is just as fine.
        store.write(AssetKind::Watermark, b"w").await.unwrap();
        assert!(store.clear(AssetKind::Watermark).await.unwrap());
        assert!(!store.clear(AssetKind::Watermark).await.unwrap());
    }

    #[tokio::test]
    async fn stat_is_cached_within_the_ttl() {
        let (_dir, clock, store) = store_with_manual_clock();
        store.write(AssetKind::Document, b"original").await.unwrap();
        let first = store.stat(AssetKind::Document).await.unwrap().unwrap();
        assert_eq!(first.size, 8);

        // Grow the file behind the store's back: the cached snapshot must
        // keep being served until the TTL lapses.
        std::fs::write(store.path_of(AssetKind::Document), b"much longer content").unwrap();
        let cached = store.stat(AssetKind::Document).await.unwrap().unwrap();
        assert_eq!(cached.size, 8);

        clock.advance(STAT_CACHE_TTL_SECONDS + 1);
        let refreshed = store.stat(AssetKind::Document).await.unwrap().unwrap();
        assert_eq!(refreshed.size, 19);
    }

    #[tokio::test]
    async fn write_invalidates_the_stat_cache_immediately() {
        let (_dir, _clock, store) = store_with_manual_clock();
        store.write(AssetKind::Document, b"original").await.unwrap();
        assert_eq!(
            store.stat(AssetKind::Document).await.unwrap().unwrap().size,
            8
        );

        // Same tick, no TTL expiry: the write alone must refresh the stat.
        store
            .write(AssetKind::Document, b"replacement bytes")
            .await
            .unwrap();
        assert_eq!(
            store.stat(AssetKind::Document).await.unwrap().unwrap().size,
            17
        );
    }

    #[tokio::test]
    async fn clear_invalidates_the_stat_cache_immediately() {
        let (_dir, _clock, store) = store_with_manual_clock();
        store.write(AssetKind::Document, b"original").await.unwrap();
        assert!(store.stat(AssetKind::Document).await.unwrap().is_some());

        store.clear(AssetKind::Document).await.unwrap();
        assert_eq!(store.stat(AssetKind::Document).await.unwrap(), None);
    }

    #[tokio::test]
    async fn absence_is_cached_too() {
        let (_dir, clock, store) = store_with_manual_clock();
        assert_eq!(store.stat(AssetKind::Watermark).await.unwrap(), None);

        // A file appearing outside the store is invisible until the TTL lapses.
        std::fs::write(store.path_of(AssetKind::Watermark), b"sneaky").unwrap();
        assert_eq!(store.stat(AssetKind::Watermark).await.unwrap(), None);

        clock.advance(STAT_CACHE_TTL_SECONDS + 1);
        assert!(store.stat(AssetKind::Watermark).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn assets_of_different_kinds_do_not_collide() {
        let (_dir, _clock, store) = store_with_manual_clock();
        store.write(AssetKind::Document, b"pdf bytes").await.unwrap();
        store.write(AssetKind::Watermark, b"png").await.unwrap();

        assert_eq!(store.read(AssetKind::Document).await.unwrap().len(), 9);
        assert_eq!(store.read(AssetKind::Watermark).await.unwrap().len(), 3);
    }
}
