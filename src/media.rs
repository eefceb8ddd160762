// src/media.rs
//
// Filesystem storage for template media. Files are written under the
// configured uploads directory with a generated unique name; only that name
// and a broad type tag are recorded alongside the template.

use std::path::Path;

use tokio::fs;
use uuid::Uuid;

use crate::error::ApiError;

/// Broad media category inferred from the uploaded file's extension.
pub fn infer_media_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") | Some("png") | Some("webp") => "image",
        Some("mp4") | Some("mov") | Some("avi") => "video",
        _ => "file",
    }
}

/// Path-safe version of a client-supplied file name.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Writes uploaded bytes under `dir` with a generated unique name and
/// returns the stored name.
pub async fn save_upload(dir: &str, original_name: &str, bytes: &[u8]) -> Result<String, ApiError> {
    fs::create_dir_all(dir).await?;
    let unique_name = format!(
        "{}_{}",
        Uuid::new_v4().simple(),
        sanitize_filename(original_name)
    );
    fs::write(Path::new(dir).join(&unique_name), bytes).await?;
    Ok(unique_name)
}

/// Removes a stored upload. A file that is already gone is not an error.
pub async fn delete_upload(dir: &str, name: &str) -> Result<(), ApiError> {
    match fs::remove_file(Path::new(dir).join(name)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_follows_extension() {
        assert_eq!(infer_media_type("photo.JPG"), "image");
        assert_eq!(infer_media_type("photo.webp"), "image");
        assert_eq!(infer_media_type("clip.mp4"), "video");
        assert_eq!(infer_media_type("clip.MOV"), "video");
        assert_eq!(infer_media_type("notes.pdf"), "file");
        assert_eq!(infer_media_type("no_extension"), "file");
    }

    #[test]
    fn filenames_are_made_path_safe() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("my photo.png"), "my_photo.png");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[tokio::test]
    async fn save_then_delete_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_str().unwrap();

        let stored = save_upload(dir_path, "photo.png", b"png-bytes").await.unwrap();
        assert!(stored.ends_with("photo.png"));
        let on_disk = std::fs::read(dir.path().join(&stored)).unwrap();
        assert_eq!(on_disk, b"png-bytes");

        delete_upload(dir_path, &stored).await.unwrap();
        assert!(!dir.path().join(&stored).exists());
        // Deleting again is a no-op, not an error.
        delete_upload(dir_path, &stored).await.unwrap();
    }

    #[tokio::test]
    async fn stored_names_are_unique_per_upload() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_str().unwrap();

        let a = save_upload(dir_path, "photo.png", b"a").await.unwrap();
        let b = save_upload(dir_path, "photo.png", b"b").await.unwrap();
        assert_ne!(a, b);
    }
}
