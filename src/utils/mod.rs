//! Shared utilities.

mod mime;

pub use mime::{accepted_image_type, sniff_mime, ALLOWED_IMAGE_TYPES, MAX_UPLOAD_BYTES};
