//! crates/profile_pdf_core/src/validate.rs
//!
//! Format validation for the two managed assets. Validation runs before any
//! write; an asset that fails here is never persisted.

/// Maximum accepted size for the profile document.
pub const MAX_DOCUMENT_BYTES: u64 = 50 * 1024 * 1024;
/// Maximum accepted size for the watermark image.
pub const MAX_WATERMARK_BYTES: u64 = 5 * 1024 * 1024;
/// Soft threshold above which the status report warns about document size.
pub const DOCUMENT_SOFT_LIMIT_BYTES: u64 = 25 * 1024 * 1024;
/// Soft threshold above which the status report warns about watermark size.
pub const WATERMARK_SOFT_LIMIT_BYTES: u64 = 2 * 1024 * 1024;
/// How far into the document the structural marker scan looks.
const STRUCTURE_SCAN_BYTES: usize = 1000;

const PDF_SIGNATURE: &[u8] = b"%PDF";
const ALLOWED_WATERMARK_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "svg", "webp"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Storage treats an empty payload as "asset absent", so accepting one
    /// would report success while effectively clearing the asset.
    #[error("empty file")]
    Empty,

    #[error("not a PDF file (missing %PDF signature)")]
    InvalidFormat,

    #[error("file too large (max {0} MiB)")]
    TooLarge(u64),

    /// The marker scan is a heuristic, not a parse; exotic but valid PDFs
    /// whose first object sits past the scan window are rejected.
    #[error("no PDF object markers found near the start of the file")]
    MalformedStructure,

    #[error("unsupported image extension: {0}")]
    UnsupportedExtension(String),

    #[error("unrecognized image format")]
    UnsupportedFormat,
}

/// Validates an uploaded profile document.
///
/// Checks, in order: the 4-byte PDF signature, the size limit, and the
/// presence of both `obj` and `endobj` markers within the first
/// [`STRUCTURE_SCAN_BYTES`] bytes.
pub fn validate_document(bytes: &[u8]) -> Result<(), ValidationError> {
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(ValidationError::InvalidFormat);
    }
    if bytes.len() as u64 > MAX_DOCUMENT_BYTES {
        return Err(ValidationError::TooLarge(MAX_DOCUMENT_BYTES / (1024 * 1024)));
    }
    let head = &bytes[..bytes.len().min(STRUCTURE_SCAN_BYTES)];
    if !(contains(head, b"obj") && contains(head, b"endobj")) {
        return Err(ValidationError::MalformedStructure);
    }
    Ok(())
}

/// Validates an uploaded watermark by declared extension and size.
///
/// This is the lenient check applied at upload time; the status endpoint
/// applies [`validate_watermark_strict`] instead.
pub fn validate_watermark_upload(bytes: &[u8], extension: &str) -> Result<(), ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::Empty);
    }
    let extension = extension.to_ascii_lowercase();
    if !ALLOWED_WATERMARK_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedExtension(extension));
    }
    if bytes.len() as u64 > MAX_WATERMARK_BYTES {
        return Err(ValidationError::TooLarge(MAX_WATERMARK_BYTES / (1024 * 1024)));
    }
    Ok(())
}

/// Validates a stored watermark by inspecting its actual bytes rather than
/// trusting a declared extension.
pub fn validate_watermark_strict(bytes: &[u8]) -> Result<(), ValidationError> {
    if bytes.len() as u64 > MAX_WATERMARK_BYTES {
        return Err(ValidationError::TooLarge(MAX_WATERMARK_BYTES / (1024 * 1024)));
    }
    match detect_image_content_type(bytes) {
        Some(_) => Ok(()),
        None => Err(ValidationError::UnsupportedFormat),
    }
}

/// Sniffs the content type of a watermark payload from its magic bytes.
///
/// Recognizes PNG, JPEG, and WebP signatures, plus a textual `<svg` marker
/// within the first kilobyte for SVG.
pub fn detect_image_content_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    let head = &bytes[..bytes.len().min(STRUCTURE_SCAN_BYTES)];
    if contains(head, b"<svg") {
        return Some("image/svg+xml");
    }
    None
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
