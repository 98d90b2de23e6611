//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::LocalAssetSource;
use crate::config::Config;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use profile_pdf_core::ports::{AssetSource, AssetStore};
use profile_pdf_core::status::StatusService;
use std::sync::Arc;

/// The fallback watermark shipped with the binary, served whenever no custom
/// watermark has been uploaded.
pub const DEFAULT_WATERMARK: &[u8] = include_bytes!("../../assets/default-watermark.svg");

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AssetStore>,
    pub status: Arc<StatusService>,
    /// The engine-facing view of the store, used by the preview endpoint.
    pub viewer_source: Arc<dyn AssetSource>,
    pub config: Arc<Config>,
    pub default_watermark: Bytes,
    /// Stands in as the Last-Modified of the bundled default watermark.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn AssetStore>, config: Arc<Config>) -> Self {
        let default_watermark = Bytes::from_static(DEFAULT_WATERMARK);
        let status = Arc::new(StatusService::new(
            store.clone(),
            Some(default_watermark.clone()),
        ));
        let viewer_source = Arc::new(LocalAssetSource::new(
            store.clone(),
            Some(default_watermark.clone()),
        ));
        Self {
            store,
            status,
            viewer_source,
            config,
            default_watermark,
            started_at: Utc::now(),
        }
    }
}
