//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use profile_pdf_core::domain::{AssetKind, AssetReport, DiagnosticReport};
use profile_pdf_core::ports::{AssetStore, PortError};
use profile_pdf_core::validate::{
    detect_image_content_type, validate_document, validate_watermark_upload,
    MAX_DOCUMENT_BYTES, MAX_WATERMARK_BYTES,
};
use profile_pdf_core::viewer::{
    RenderSession, SuppressionRegistry, ViewerError, ViewerOptions,
};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_document_handler,
        upload_assets_handler,
        delete_assets_handler,
        status_handler,
        get_watermark_handler,
        preview_handler,
    ),
    components(
        schemas(
            ErrorBody,
            SimpleStatusResponse,
            DetailedStatusResponse,
            SystemStatusResponse,
            AssetStatusResponse,
            StorageResponse,
            CapabilitiesResponse,
            UploadResponse,
            UploadResults,
            UploadPartResponse,
            DeleteResponse,
        )
    ),
    tags(
        (name = "Company Profile PDF API", description = "Endpoints for serving and managing the company profile document and its watermark.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The error payload every non-2xx JSON response carries.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct SimpleStatusResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SystemStatusResponse {
    pub status: String,
    pub healthy: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AssetStatusResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "sizeInMB", skip_serializing_if = "Option::is_none")]
    pub size_in_mb: Option<String>,
    #[serde(rename = "sizeInKB", skip_serializing_if = "Option::is_none")]
    pub size_in_kb: Option<String>,
    #[serde(rename = "isValid", skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

impl From<AssetReport> for AssetStatusResponse {
    fn from(report: AssetReport) -> Self {
        Self {
            exists: report.exists,
            size: report.size,
            size_in_mb: report.size_in_mib,
            size_in_kb: report.size_in_kib,
            is_valid: report.is_valid,
            error: report.error,
            last_modified: report.last_modified,
            is_default: report.is_default,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct StorageResponse {
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
    #[serde(rename = "totalSize")]
    pub total_size: u64,
    #[serde(rename = "totalSizeInMB")]
    pub total_size_in_mb: String,
}

/// Static capability advertisement so the admin panel can adapt its UI
/// without probing.
#[derive(Serialize, ToSchema)]
pub struct CapabilitiesResponse {
    #[serde(rename = "supportsRangeRequests")]
    pub supports_range_requests: bool,
    #[serde(rename = "supportsConditionalGet")]
    pub supports_conditional_get: bool,
    #[serde(rename = "maxPdfSizeInMB")]
    pub max_pdf_size_in_mb: u64,
    #[serde(rename = "maxWatermarkSizeInMB")]
    pub max_watermark_size_in_mb: u64,
    #[serde(rename = "supportedImageFormats")]
    pub supported_image_formats: Vec<String>,
}

impl Default for CapabilitiesResponse {
    fn default() -> Self {
        Self {
            supports_range_requests: true,
            supports_conditional_get: true,
            max_pdf_size_in_mb: MAX_DOCUMENT_BYTES / (1024 * 1024),
            max_watermark_size_in_mb: MAX_WATERMARK_BYTES / (1024 * 1024),
            supported_image_formats: ["png", "jpg", "jpeg", "svg", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DetailedStatusResponse {
    pub timestamp: DateTime<Utc>,
    pub system: SystemStatusResponse,
    pub pdf: AssetStatusResponse,
    pub watermark: AssetStatusResponse,
    pub storage: StorageResponse,
    pub capabilities: CapabilitiesResponse,
}

impl From<DiagnosticReport> for DetailedStatusResponse {
    fn from(report: DiagnosticReport) -> Self {
        Self {
            timestamp: report.generated_at,
            system: SystemStatusResponse {
                status: report.health.as_str().to_string(),
                healthy: report.healthy,
                warnings: report.warnings,
                errors: report.errors,
            },
            pdf: report.document.into(),
            watermark: report.watermark.into(),
            storage: StorageResponse {
                total_files: report.total_files,
                total_size: report.total_bytes,
                total_size_in_mb: format!(
                    "{:.2}",
                    report.total_bytes as f64 / (1024.0 * 1024.0)
                ),
            },
            capabilities: CapabilitiesResponse::default(),
        }
    }
}

/// Outcome of one part of a multipart upload. Parts that were not supplied
/// stay at their defaults.
#[derive(Serialize, ToSchema, Default)]
pub struct UploadPartResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema, Default)]
pub struct UploadResults {
    pub pdf: UploadPartResponse,
    pub watermark: UploadPartResponse,
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub results: UploadResults,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(rename = "deletedFiles")]
    pub deleted_files: usize,
    pub message: String,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub simple: Option<String>,
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub page: Option<u32>,
    pub zoom: Option<f32>,
}

//=========================================================================================
// Response helpers
//=========================================================================================

fn json_error(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Builds the fixed header set every document response carries: no shared
/// caching anywhere, revalidation via ETag, and the defensive browser headers.
fn document_response_builder(etag: &str, last_modified: &str) -> axum::http::response::Builder {
    Response::builder()
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CACHE_CONTROL,
            "no-cache, no-store, must-revalidate, private",
        )
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0")
        .header(header::ETAG, etag)
        .header(header::LAST_MODIFIED, last_modified)
        .header(header::ACCEPT_RANGES, "bytes")
        .header("X-Content-Type-Options", "nosniff")
        .header("X-Frame-Options", "SAMEORIGIN")
}

enum RangeOutcome {
    /// No Range header, or one too malformed to honor.
    Full,
    /// A satisfiable `bytes=start-end` slice, both ends inclusive.
    Slice(u64, u64),
    Unsatisfiable,
}

/// Interprets a single-range `Range` header against a body of `total` bytes.
///
/// Open-ended ranges (`bytes=100-`) run to the end; out-of-bounds ends are
/// clamped; a start at or past the end is unsatisfiable.
fn evaluate_range(range: Option<&str>, total: u64) -> RangeOutcome {
    let Some(spec) = range.and_then(|r| r.strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    let Some((start_raw, end_raw)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let Ok(start) = start_raw.trim().parse::<u64>() else {
        return RangeOutcome::Full;
    };
    let end = if end_raw.trim().is_empty() {
        total.saturating_sub(1)
    } else {
        match end_raw.trim().parse::<u64>() {
            Ok(end) => end.min(total.saturating_sub(1)),
            Err(_) => return RangeOutcome::Full,
        }
    };
    if start >= total || start > end {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Slice(start, end)
}

/// Second-granularity comparison, since `Last-Modified` loses sub-second
/// precision on the wire.
fn not_modified_since(if_modified_since: &str, modified: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc2822(if_modified_since)
        .map(|since| since.timestamp() >= modified.timestamp())
        .unwrap_or(false)
}

//=========================================================================================
// Document delivery
//=========================================================================================

/// Serve the company profile PDF.
///
/// Supports single-part `Range` requests and always instructs clients not to
/// cache the body. HEAD returns the same headers without a body.
#[utoipa::path(
    get,
    path = "/profile-pdf",
    responses(
        (status = 200, description = "The full PDF document.", content_type = "application/pdf"),
        (status = 206, description = "The requested byte range of the document.", content_type = "application/pdf"),
        (status = 404, description = "No document has been uploaded.", body = ErrorBody),
        (status = 416, description = "The requested range is not satisfiable.", body = ErrorBody),
    ),
    tag = "Company Profile PDF API"
)]
pub async fn get_document_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let bytes = match state.store.read(AssetKind::Document).await {
        Ok(bytes) => bytes,
        Err(PortError::NotFound(_)) => {
            return json_error(
                StatusCode::NOT_FOUND,
                "PDF not found",
                "No company profile PDF has been uploaded yet.",
            );
        }
        Err(e) => {
            error!("failed to read the profile document: {e}");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to serve PDF",
                "An internal error occurred while serving the PDF file.",
            );
        }
    };

    let total = bytes.len() as u64;
    let (etag, last_modified) = match state.store.stat(AssetKind::Document).await {
        Ok(Some(stat)) => (stat.etag(), stat.http_date()),
        _ => {
            // Stat raced a concurrent clear; validate against the read time.
            let now = Utc::now();
            (
                format!("\"{}\"", now.timestamp_millis()),
                now.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            )
        }
    };

    if method == Method::HEAD {
        return match document_response_builder(&etag, &last_modified)
            .header(header::CONTENT_LENGTH, total)
            .body(Body::empty())
        {
            Ok(response) => response,
            Err(e) => {
                error!("failed to build HEAD response: {e}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let result = match evaluate_range(range, total) {
        RangeOutcome::Full => document_response_builder(&etag, &last_modified)
            .header(header::CONTENT_LENGTH, total)
            .body(Body::from(bytes)),
        RangeOutcome::Slice(start, end) => {
            let slice = bytes.slice(start as usize..(end + 1) as usize);
            document_response_builder(&etag, &last_modified)
                .status(StatusCode::PARTIAL_CONTENT)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {start}-{end}/{total}"),
                )
                .header(header::CONTENT_LENGTH, slice.len() as u64)
                .body(Body::from(slice))
        }
        RangeOutcome::Unsatisfiable => {
            return match Response::builder()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::CONTENT_RANGE, format!("bytes */{total}"))
                .body(Body::empty())
            {
                Ok(response) => response,
                Err(e) => {
                    error!("failed to build 416 response: {e}");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            };
        }
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            error!("failed to build document response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

//=========================================================================================
// Asset mutation
//=========================================================================================

/// Upload a new profile PDF and/or watermark image.
///
/// Accepts a multipart/form-data request with optional `pdf` and `watermark`
/// parts. Each part is validated and stored independently; the response
/// reports a per-part outcome and the request succeeds when at least one
/// part was accepted.
#[utoipa::path(
    post,
    path = "/profile-pdf",
    request_body(content_type = "multipart/form-data", description = "`pdf` and/or `watermark` file parts."),
    responses(
        (status = 200, description = "At least one asset was stored.", body = UploadResponse),
        (status = 400, description = "Every supplied part failed validation.", body = UploadResponse),
        (status = 401, description = "Missing or invalid admin token."),
    ),
    tag = "Company Profile PDF API"
)]
pub async fn upload_assets_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut results = UploadResults::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("failed to read multipart field: {e}");
                return json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upload failed",
                    "Could not read the uploaded form data.",
                );
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf" => {
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        results.pdf.message = format!("Failed to read the PDF part: {e}");
                        continue;
                    }
                };
                results.pdf = store_document(&state, data).await;
            }
            "watermark" => {
                let extension = field
                    .file_name()
                    .and_then(|f| f.rsplit_once('.'))
                    .map(|(_, ext)| ext.to_string())
                    .unwrap_or_default();
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        results.watermark.message =
                            format!("Failed to read the watermark part: {e}");
                        continue;
                    }
                };
                results.watermark = store_watermark(&state, data, &extension).await;
            }
            other => {
                info!(part = other, "ignoring unknown multipart field");
            }
        }
    }

    let success = results.pdf.success || results.watermark.success;
    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    let message = if success {
        "Upload processed.".to_string()
    } else {
        "No file was accepted.".to_string()
    };
    (
        status,
        Json(UploadResponse {
            success,
            results,
            message,
        }),
    )
        .into_response()
}

async fn store_document(state: &AppState, data: Bytes) -> UploadPartResponse {
    if let Err(e) = validate_document(&data) {
        return UploadPartResponse {
            success: false,
            message: e.to_string(),
        };
    }
    match state.store.write(AssetKind::Document, &data).await {
        Ok(()) => {
            info!(size = data.len(), "profile document replaced");
            UploadPartResponse {
                success: true,
                message: "PDF uploaded successfully.".to_string(),
            }
        }
        Err(e) => {
            error!("failed to persist the profile document: {e}");
            UploadPartResponse {
                success: false,
                message: "Failed to save the PDF file.".to_string(),
            }
        }
    }
}

async fn store_watermark(state: &AppState, data: Bytes, extension: &str) -> UploadPartResponse {
    if let Err(e) = validate_watermark_upload(&data, extension) {
        return UploadPartResponse {
            success: false,
            message: e.to_string(),
        };
    }
    match state.store.write(AssetKind::Watermark, &data).await {
        Ok(()) => {
            info!(size = data.len(), "watermark replaced");
            UploadPartResponse {
                success: true,
                message: "Watermark uploaded successfully.".to_string(),
            }
        }
        Err(e) => {
            error!("failed to persist the watermark: {e}");
            UploadPartResponse {
                success: false,
                message: "Failed to save the watermark file.".to_string(),
            }
        }
    }
}

/// Remove both managed assets.
///
/// Clearing is idempotent: assets are truncated in place and the response
/// counts how many were actually non-empty beforehand.
#[utoipa::path(
    delete,
    path = "/profile-pdf",
    responses(
        (status = 200, description = "The assets were cleared.", body = DeleteResponse),
        (status = 401, description = "Missing or invalid admin token."),
        (status = 500, description = "A storage error occurred.", body = ErrorBody),
    ),
    tag = "Company Profile PDF API"
)]
pub async fn delete_assets_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut deleted_files = 0;
    for kind in AssetKind::ALL {
        match state.store.clear(kind).await {
            Ok(true) => deleted_files += 1,
            Ok(false) => {}
            Err(e) => {
                error!(asset = kind.file_name(), "failed to clear asset: {e}");
                return json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Delete failed",
                    "An internal error occurred while deleting the files.",
                );
            }
        }
    }
    info!(deleted_files, "assets cleared");
    Json(DeleteResponse {
        success: true,
        deleted_files,
        message: format!("{deleted_files} file(s) deleted."),
    })
    .into_response()
}

//=========================================================================================
// Status and introspection
//=========================================================================================

/// Report the health of the PDF subsystem.
///
/// With `?simple=true` this is the cheap availability probe the viewer uses;
/// otherwise it returns the full diagnostic report for the admin panel.
#[utoipa::path(
    get,
    path = "/profile-pdf/status",
    params(
        ("simple" = Option<String>, Query, description = "Set to `true` for the minimal availability answer.")
    ),
    responses(
        (status = 200, description = "The status report.", body = DetailedStatusResponse),
    ),
    tag = "Company Profile PDF API"
)]
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Response {
    if query.simple.as_deref() == Some("true") {
        let status = state.status.simple().await;
        return Json(SimpleStatusResponse {
            available: status.available,
            error: status.error,
        })
        .into_response();
    }

    let report = state.status.detailed().await;
    Json(DetailedStatusResponse::from(report)).into_response()
}

//=========================================================================================
// Watermark delivery
//=========================================================================================

/// Serve the watermark image.
///
/// Falls back to the bundled default when no custom watermark is uploaded.
/// Unlike the document, the watermark is freely cacheable and honors
/// conditional requests with 304.
#[utoipa::path(
    get,
    path = "/profile-pdf/watermark",
    responses(
        (status = 200, description = "The watermark image."),
        (status = 304, description = "The client's cached copy is still fresh."),
    ),
    tag = "Company Profile PDF API"
)]
pub async fn get_watermark_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let (bytes, modified, watermark_type) = match state.store.read(AssetKind::Watermark).await {
        Ok(bytes) => {
            let modified = match state.store.stat(AssetKind::Watermark).await {
                Ok(Some(stat)) => stat.modified,
                _ => Utc::now(),
            };
            (bytes, modified, "custom")
        }
        Err(PortError::NotFound(_)) => {
            // The bundled asset never changes while the process lives, so
            // startup time is an honest Last-Modified for it.
            (state.default_watermark.clone(), state.started_at, "default")
        }
        Err(e) => {
            error!("failed to read the watermark: {e}");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to serve watermark",
                "An internal error occurred while serving the watermark image.",
            );
        }
    };

    let etag = format!("\"{}\"", modified.timestamp_millis());
    let last_modified = modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    let content_type = detect_image_content_type(&bytes).unwrap_or("application/octet-stream");

    let cache_builder = |status: StatusCode| {
        Response::builder()
            .status(status)
            .header(header::CACHE_CONTROL, "public, max-age=3600, s-maxage=7200")
            .header(header::ETAG, etag.clone())
            .header(header::LAST_MODIFIED, last_modified.clone())
            .header("X-Watermark-Type", watermark_type)
    };

    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    let if_modified_since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok());
    let fresh = if_none_match.map(|v| v == etag).unwrap_or(false)
        || if_modified_since
            .map(|v| not_modified_since(v, modified))
            .unwrap_or(false);

    let result = if fresh {
        cache_builder(StatusCode::NOT_MODIFIED).body(Body::empty())
    } else {
        cache_builder(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, bytes.len() as u64)
            .body(Body::from(bytes))
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            error!("failed to build watermark response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

//=========================================================================================
// Server-side preview
//=========================================================================================

/// Render one watermarked page as a PNG.
///
/// This drives the same rendering engine the viewer embeds, so the admin
/// panel can preview exactly what visitors will see. Page numbers outside
/// the document are ignored and zoom is clamped to the viewer's limits.
#[utoipa::path(
    get,
    path = "/profile-pdf/preview",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number, defaults to 1."),
        ("zoom" = Option<f32>, Query, description = "Zoom factor, clamped to [0.5, 3.0].")
    ),
    responses(
        (status = 200, description = "The rendered page.", content_type = "image/png"),
        (status = 404, description = "No document is available to render.", body = ErrorBody),
        (status = 500, description = "Rendering failed.", body = ErrorBody),
    ),
    tag = "Company Profile PDF API"
)]
pub async fn preview_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let mut session = RenderSession::new(
        state.viewer_source.clone(),
        SuppressionRegistry::new(),
        ViewerOptions::default(),
    );

    if let Err(e) = session.open().await {
        return match e {
            ViewerError::Unavailable(message) => {
                json_error(StatusCode::NOT_FOUND, "PDF not found", &message)
            }
            other => {
                error!("preview failed to open the document: {other}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Preview failed",
                    "The document could not be loaded for rendering.",
                )
            }
        };
    }

    if let Some(page) = query.page {
        session.go_to_page(page);
    }
    if let Some(zoom) = query.zoom {
        session.set_zoom(zoom);
    }

    let render = match session.render_current().await {
        Ok(render) => render,
        Err(e) => {
            error!("preview render failed: {e}");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Preview failed",
                "The page could not be rendered.",
            );
        }
    };

    let mut png = Vec::new();
    if let Err(e) = image::DynamicImage::ImageRgba8(render.image)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
    {
        error!("failed to encode the preview image: {e}");
        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Preview failed",
            "The rendered page could not be encoded.",
        );
    }

    match Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(png))
    {
        Ok(response) => response,
        Err(e) => {
            error!("failed to build preview response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
