//! crates/profile_pdf_core/src/domain.rs
//!
//! Defines the pure, core data structures for the profile-PDF subsystem.
//! These structs are independent of any storage backend or serialization format.

use chrono::{DateTime, Utc};

/// The two binary assets managed by this subsystem.
///
/// At most one of each kind exists at a time; uploads overwrite the single
/// slot for that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// The protected company-profile PDF.
    Document,
    /// The watermark image tiled over rendered pages.
    Watermark,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Document, AssetKind::Watermark];

    /// The fixed, well-known file name for this asset inside the profile directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            AssetKind::Document => "company-profile.pdf",
            AssetKind::Watermark => "watermark.png",
        }
    }
}

/// A snapshot of an asset's storage metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetStat {
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl AssetStat {
    /// ETag derived from the last-modified timestamp, as a quoted string.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.modified.timestamp_millis())
    }

    /// The last-modified timestamp formatted as an HTTP date (RFC 7231).
    pub fn http_date(&self) -> String {
        self.modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    pub fn size_in_mib(&self) -> String {
        format!("{:.2}", self.size as f64 / (1024.0 * 1024.0))
    }

    pub fn size_in_kib(&self) -> String {
        format!("{:.2}", self.size as f64 / 1024.0)
    }
}

/// The cheap availability answer used to gate the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleStatus {
    /// True iff the document exists and passes validation. The watermark is
    /// optional and never consulted here.
    pub available: bool,
    pub error: Option<String>,
}

/// Per-asset section of the detailed diagnostic report.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetReport {
    pub exists: bool,
    pub size: Option<u64>,
    pub size_in_mib: Option<String>,
    pub size_in_kib: Option<String>,
    pub is_valid: Option<bool>,
    pub error: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Whether the bundled default asset is standing in because no custom
    /// one was uploaded. Only ever true for the watermark.
    pub is_default: bool,
}

impl AssetReport {
    /// The report for an asset that is not present at all.
    pub fn absent() -> Self {
        Self {
            exists: false,
            size: None,
            size_in_mib: None,
            size_in_kib: None,
            is_valid: None,
            error: None,
            last_modified: None,
            is_default: false,
        }
    }
}

/// Aggregate health of the subsystem.
///
/// Warnings alone do not make the system unhealthy; only a missing or
/// invalid document does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    Warning,
    Error,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Warning => "warning",
            HealthState::Error => "error",
        }
    }
}

/// The verbose diagnostic report for the admin panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    pub generated_at: DateTime<Utc>,
    pub health: HealthState,
    pub healthy: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub document: AssetReport,
    pub watermark: AssetReport,
    pub total_files: usize,
    pub total_bytes: u64,
}
