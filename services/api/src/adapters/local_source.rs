//! services/api/src/adapters/local_source.rs
//!
//! An `AssetSource` that serves the rendering engine straight from the local
//! store, with the bundled fallback watermark when no custom one is uploaded.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use profile_pdf_core::domain::SimpleStatus;
use profile_pdf_core::ports::{AssetSource, AssetStore, PortError, PortResult};
use profile_pdf_core::status::StatusService;

pub struct LocalAssetSource {
    store: Arc<dyn AssetStore>,
    status: StatusService,
    default_watermark: Option<Bytes>,
}

impl LocalAssetSource {
    pub fn new(store: Arc<dyn AssetStore>, default_watermark: Option<Bytes>) -> Self {
        let status = StatusService::new(store.clone(), default_watermark.clone());
        Self {
            store,
            status,
            default_watermark,
        }
    }
}

#[async_trait]
impl AssetSource for LocalAssetSource {
    async fn simple_status(&self) -> PortResult<SimpleStatus> {
        Ok(self.status.simple().await)
    }

    async fn fetch_document(&self, _cache_bust: u64) -> PortResult<Bytes> {
        // The store reads from disk on every call, so the cache-busting token
        // carried for remote transports has no work to do here.
        self.store.read(profile_pdf_core::domain::AssetKind::Document).await
    }

    async fn fetch_watermark(&self) -> PortResult<Option<Bytes>> {
        match self.store.read(profile_pdf_core::domain::AssetKind::Watermark).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(PortError::NotFound(_)) => Ok(self.default_watermark.clone()),
            Err(e) => Err(e),
        }
    }
}
