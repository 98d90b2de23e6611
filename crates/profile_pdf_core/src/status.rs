//! crates/profile_pdf_core/src/status.rs
//!
//! Computes the two status shapes: the cheap availability gate used by the
//! viewer and the verbose diagnostic report used by the admin panel. Both are
//! read-only; the only side effect is refreshing the store's stat cache.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::warn;

use crate::domain::{AssetKind, AssetReport, DiagnosticReport, HealthState, SimpleStatus};
use crate::ports::{AssetStore, PortError};
use crate::validate::{
    self, DOCUMENT_SOFT_LIMIT_BYTES, WATERMARK_SOFT_LIMIT_BYTES,
};

const READ_FAILURE: &str = "Failed to read file";

/// Answers "can the viewer show a document right now" and "what exactly is
/// wrong". Absence is a normal, reportable state, never an error.
pub struct StatusService {
    store: Arc<dyn AssetStore>,
    /// The bundled read-only fallback watermark, if the deployment ships one.
    default_watermark: Option<Bytes>,
}

impl StatusService {
    pub fn new(store: Arc<dyn AssetStore>, default_watermark: Option<Bytes>) -> Self {
        Self {
            store,
            default_watermark,
        }
    }

    /// The boolean gate for the viewer. Available iff the document exists and
    /// passes validation; the watermark is optional and not consulted.
    pub async fn simple(&self) -> SimpleStatus {
        match self.store.read(AssetKind::Document).await {
            Ok(bytes) => match validate::validate_document(&bytes) {
                Ok(()) => SimpleStatus {
                    available: true,
                    error: None,
                },
                Err(e) => SimpleStatus {
                    available: false,
                    error: Some(e.to_string()),
                },
            },
            Err(PortError::NotFound(_)) => SimpleStatus {
                available: false,
                error: None,
            },
            Err(e) => {
                warn!("document read failed during status check: {e}");
                SimpleStatus {
                    available: false,
                    error: Some(READ_FAILURE.to_string()),
                }
            }
        }
    }

    /// The detailed diagnostic report for the admin panel.
    pub async fn detailed(&self) -> DiagnosticReport {
        let document = self.document_report().await;
        let watermark = self.watermark_report().await;

        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if !document.exists {
            errors.push("No PDF file found".to_string());
        } else if document.is_valid == Some(false) {
            errors.push(format!(
                "PDF validation failed: {}",
                document.error.as_deref().unwrap_or("unknown error")
            ));
        }

        if !watermark.exists {
            warnings.push("No watermark file found".to_string());
        } else if watermark.is_valid == Some(false) {
            warnings.push(format!(
                "Watermark validation failed: {}",
                watermark.error.as_deref().unwrap_or("unknown error")
            ));
        }

        if document.size.is_some_and(|s| s > DOCUMENT_SOFT_LIMIT_BYTES) {
            warnings.push("PDF file is large (>25MB), may affect loading performance".to_string());
        }
        if watermark.size.is_some_and(|s| s > WATERMARK_SOFT_LIMIT_BYTES) {
            warnings
                .push("Watermark file is large (>2MB), may affect rendering performance".to_string());
        }

        let healthy = document.exists && document.is_valid != Some(false);
        let health = if healthy {
            HealthState::Healthy
        } else if errors.is_empty() {
            HealthState::Warning
        } else {
            HealthState::Error
        };

        let total_files = [document.exists, watermark.exists]
            .iter()
            .filter(|present| **present)
            .count();
        let total_bytes = document.size.unwrap_or(0) + watermark.size.unwrap_or(0);

        DiagnosticReport {
            generated_at: Utc::now(),
            health,
            healthy,
            warnings,
            errors,
            document,
            watermark,
            total_files,
            total_bytes,
        }
    }

    async fn document_report(&self) -> AssetReport {
        let stat = match self.store.stat(AssetKind::Document).await {
            Ok(Some(stat)) => stat,
            Ok(None) => return AssetReport::absent(),
            Err(e) => {
                warn!("document stat failed during status check: {e}");
                return AssetReport {
                    error: Some(READ_FAILURE.to_string()),
                    ..AssetReport::absent()
                };
            }
        };

        let validation = match self.store.read(AssetKind::Document).await {
            Ok(bytes) => validate::validate_document(&bytes).map_err(|e| e.to_string()),
            Err(e) => {
                warn!("document read failed during status check: {e}");
                Err(READ_FAILURE.to_string())
            }
        };

        AssetReport {
            exists: true,
            size: Some(stat.size),
            size_in_mib: Some(stat.size_in_mib()),
            size_in_kib: Some(stat.size_in_kib()),
            is_valid: Some(validation.is_ok()),
            error: validation.err(),
            last_modified: Some(stat.modified),
            is_default: false,
        }
    }

    async fn watermark_report(&self) -> AssetReport {
        match self.store.stat(AssetKind::Watermark).await {
            Ok(Some(stat)) => {
                let validation = match self.store.read(AssetKind::Watermark).await {
                    Ok(bytes) => {
                        validate::validate_watermark_strict(&bytes).map_err(|e| e.to_string())
                    }
                    Err(e) => {
                        warn!("watermark read failed during status check: {e}");
                        Err(READ_FAILURE.to_string())
                    }
                };
                AssetReport {
                    exists: true,
                    size: Some(stat.size),
                    size_in_mib: Some(stat.size_in_mib()),
                    size_in_kib: Some(stat.size_in_kib()),
                    is_valid: Some(validation.is_ok()),
                    error: validation.err(),
                    last_modified: Some(stat.modified),
                    is_default: false,
                }
            }
            Ok(None) => self.default_watermark_report(),
            Err(e) => {
                warn!("watermark stat failed during status check: {e}");
                AssetReport {
                    error: Some(READ_FAILURE.to_string()),
                    ..AssetReport::absent()
                }
            }
        }
    }

    /// No custom watermark was uploaded; report the bundled default instead.
    fn default_watermark_report(&self) -> AssetReport {
        let Some(bytes) = &self.default_watermark else {
            return AssetReport::absent();
        };
        let validation = validate::validate_watermark_strict(bytes).map_err(|e| e.to_string());
        let size = bytes.len() as u64;
        AssetReport {
            exists: true,
            size: Some(size),
            size_in_mib: Some(format!("{:.2}", size as f64 / (1024.0 * 1024.0))),
            size_in_kib: Some(format!("{:.2}", size as f64 / 1024.0)),
            is_valid: Some(validation.is_ok()),
            error: validation.err(),
            last_modified: None,
            is_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssetStat;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A store over an in-memory map, with the empty-means-absent rule.
    #[derive(Default)]
    struct MemoryStore {
        slots: Mutex<HashMap<AssetKind, Vec<u8>>>,
    }

    impl MemoryStore {
        fn with_document(bytes: &[u8]) -> Self {
            let store = Self::default();
            store
                .slots
                .lock()
                .unwrap()
                .insert(AssetKind::Document, bytes.to_vec());
            store
        }

        fn put(&self, kind: AssetKind, bytes: &[u8]) {
            self.slots.lock().unwrap().insert(kind, bytes.to_vec());
        }
    }

    #[async_trait]
    impl AssetStore for MemoryStore {
        async fn read(&self, kind: AssetKind) -> PortResult<Bytes> {
            match self.slots.lock().unwrap().get(&kind) {
                Some(bytes) if !bytes.is_empty() => Ok(Bytes::from(bytes.clone())),
                _ => Err(PortError::NotFound(kind.file_name().to_string())),
            }
        }

        async fn write(&self, kind: AssetKind, bytes: &[u8]) -> PortResult<()> {
            self.put(kind, bytes);
            Ok(())
        }

        async fn clear(&self, kind: AssetKind) -> PortResult<bool> {
            let mut slots = self.slots.lock().unwrap();
            let had_content = slots.get(&kind).is_some_and(|b| !b.is_empty());
            slots.insert(kind, Vec::new());
            Ok(had_content)
        }

        async fn stat(&self, kind: AssetKind) -> PortResult<Option<AssetStat>> {
            Ok(self.slots.lock().unwrap().get(&kind).and_then(|bytes| {
                if bytes.is_empty() {
                    None
                } else {
                    Some(AssetStat {
                        size: bytes.len() as u64,
                        modified: Utc::now(),
                    })
                }
            }))
        }
    }

    const VALID_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< >>\nendobj\ntrailer\n%%EOF";
    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn service(store: MemoryStore) -> StatusService {
        StatusService::new(Arc::new(store), None)
    }

    #[tokio::test]
    async fn simple_status_reports_valid_document_available() {
        let status = service(MemoryStore::with_document(VALID_PDF)).simple().await;
        assert!(status.available);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn simple_status_flips_when_document_is_truncated() {
        let store = MemoryStore::with_document(VALID_PDF);
        let service = StatusService::new(Arc::new(store), None);
        assert!(service.simple().await.available);

        // Truncated to an invalid prefix: available must flip deterministically.
        service
            .store
            .write(AssetKind::Document, b"%PD")
            .await
            .unwrap();
        let status = service.simple().await;
        assert!(!status.available);
        assert!(status.error.is_some());
    }

    #[tokio::test]
    async fn simple_status_treats_absence_as_unavailable_without_error() {
        let status = service(MemoryStore::default()).simple().await;
        assert!(!status.available);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn detailed_report_is_healthy_with_document_only() {
        let report = service(MemoryStore::with_document(VALID_PDF))
            .detailed()
            .await;
        assert!(report.healthy);
        assert_eq!(report.health, HealthState::Healthy);
        assert_eq!(report.document.is_valid, Some(true));
        assert!(report.errors.is_empty());
        // Watermark absence is a warning, not an error.
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("No watermark file found")));
        assert_eq!(report.total_files, 1);
    }

    #[tokio::test]
    async fn detailed_report_errors_when_document_missing() {
        let report = service(MemoryStore::default()).detailed().await;
        assert!(!report.healthy);
        assert_eq!(report.health, HealthState::Error);
        assert!(report.errors.iter().any(|e| e.contains("No PDF file found")));
        assert_eq!(report.total_files, 0);
    }

    #[tokio::test]
    async fn detailed_report_flags_default_watermark() {
        let store = MemoryStore::with_document(VALID_PDF);
        let service = StatusService::new(
            Arc::new(store),
            Some(Bytes::from_static(b"<svg xmlns=\"x\"></svg>")),
        );
        let report = service.detailed().await;
        assert!(report.watermark.exists);
        assert!(report.watermark.is_default);
        assert_eq!(report.watermark.is_valid, Some(true));
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn detailed_report_prefers_custom_watermark_over_default() {
        let store = MemoryStore::with_document(VALID_PDF);
        store.put(AssetKind::Watermark, PNG_HEADER);
        let service = StatusService::new(
            Arc::new(store),
            Some(Bytes::from_static(b"<svg></svg>")),
        );
        let report = service.detailed().await;
        assert!(report.watermark.exists);
        assert!(!report.watermark.is_default);
        assert_eq!(report.total_files, 2);
    }

    #[tokio::test]
    async fn oversized_document_produces_soft_warning() {
        let mut bytes = VALID_PDF.to_vec();
        bytes.resize(DOCUMENT_SOFT_LIMIT_BYTES as usize + 1, b' ');
        let report = service(MemoryStore::with_document(&bytes)).detailed().await;
        assert!(report.healthy, "soft limit must not affect health");
        assert!(report.warnings.iter().any(|w| w.contains(">25MB")));
    }
}
