//! crates/profile_pdf_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete storage backend and delivery transport.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::domain::{AssetKind, AssetStat, SimpleStatus};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the backing store or transport.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for the two single-slot binary assets.
///
/// Implementations must treat an empty payload as "not present": clearing an
/// asset truncates it in place rather than unlinking the path, and both
/// `read` and `stat` report a truncated asset as absent.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Returns the full payload, or `PortError::NotFound` when the asset is
    /// absent or empty.
    async fn read(&self, kind: AssetKind) -> PortResult<Bytes>;

    /// Overwrites the single slot for `kind` and invalidates any cached
    /// metadata for it. Callers validate before writing; this method never
    /// inspects the payload.
    async fn write(&self, kind: AssetKind, bytes: &[u8]) -> PortResult<()>;

    /// Truncates the asset if present. Returns whether a non-empty asset was
    /// actually cleared; clearing an absent asset is not an error.
    async fn clear(&self, kind: AssetKind) -> PortResult<bool>;

    /// Returns cached metadata when fresh, refreshing from the backing store
    /// otherwise. `Ok(None)` means absent (or empty, see above).
    async fn stat(&self, kind: AssetKind) -> PortResult<Option<AssetStat>>;
}

/// An injectable clock so the stat-cache TTL is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// What a render session needs from the delivery side.
///
/// The viewer engine talks to this port instead of HTTP directly so it can be
/// driven in-process (server-side previews, tests) as well as remotely.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// The cheap availability gate checked before any document fetch.
    async fn simple_status(&self) -> PortResult<SimpleStatus>;

    /// Fetches the full document payload. `cache_bust` is an opaque token the
    /// implementation must use to bypass any intermediary cache, so a
    /// just-replaced document is never served stale.
    async fn fetch_document(&self, cache_bust: u64) -> PortResult<Bytes>;

    /// Fetches the watermark payload (custom or default). `Ok(None)` means no
    /// watermark is available at all; the viewer degrades to no overlay.
    async fn fetch_watermark(&self) -> PortResult<Option<Bytes>>;
}
