//! Upload validation: content sniffing, type allow-list, size cap.
//!
//! The client-supplied content type is ignored; the actual bytes decide.

/// Maximum accepted upload size (10MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for prediction uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Sniff the MIME type from upload content.
pub fn sniff_mime(content: &[u8]) -> Option<&'static str> {
    infer::get(content).map(|kind| kind.mime_type())
}

/// Sniffed MIME type if the content is an accepted image format.
pub fn accepted_image_type(content: &[u8]) -> Option<&'static str> {
    sniff_mime(content).filter(|mime| ALLOWED_IMAGE_TYPES.contains(mime))
}
