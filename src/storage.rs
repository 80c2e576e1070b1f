//! Storage helpers for uploaded images on disk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of upload content.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Construct the relative storage path for upload content.
///
/// Uses a two-level directory structure based on hash prefix for filesystem
/// efficiency: `{hash[0..2]}/{hash[0..8]}.{extension}`
pub fn upload_relative_path(content_hash: &str, extension: &str) -> PathBuf {
    PathBuf::from(&content_hash[..2]).join(format!("{}.{}", &content_hash[..8], extension))
}

/// Save an uploaded image under the uploads directory.
///
/// Returns the relative path (stored on the prediction row and served
/// under `/uploads/`). Identical content maps to the same path; the write
/// is idempotent.
pub fn save_upload(
    uploads_dir: &Path,
    content: &[u8],
    mime_type: &str,
) -> anyhow::Result<String> {
    let content_hash = compute_hash(content);
    let relative = upload_relative_path(&content_hash, mime_to_extension(mime_type));

    let full_path = uploads_dir.join(&relative);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full_path, content)?;

    Ok(relative.display().to_string())
}

/// Map an image MIME type to a file extension.
pub fn mime_to_extension(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_upload_relative_path() {
        let hash = "abcdef1234567890abcdef1234567890";
        assert_eq!(
            upload_relative_path(hash, "jpg"),
            PathBuf::from("ab/abcdef12.jpg")
        );
    }

    #[test]
    fn test_mime_to_extension() {
        assert_eq!(mime_to_extension("image/jpeg"), "jpg");
        assert_eq!(mime_to_extension("image/png"), "png");
        assert_eq!(mime_to_extension("image/gif"), "gif");
        assert_eq!(mime_to_extension("application/pdf"), "bin");
    }

    #[test]
    fn test_save_upload() {
        let dir = tempdir().unwrap();
        let content = b"fake image bytes";

        let relative = save_upload(dir.path(), content, "image/png").unwrap();
        let full = dir.path().join(&relative);

        assert!(full.exists());
        assert_eq!(std::fs::read(&full).unwrap(), content);

        // Hash-addressed: same content, same path.
        let again = save_upload(dir.path(), content, "image/png").unwrap();
        assert_eq!(relative, again);

        // Two-char hash prefix directory
        let parent = full.parent().unwrap().file_name().unwrap();
        assert_eq!(parent.to_str().unwrap().len(), 2);
    }
}
