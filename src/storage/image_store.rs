use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::UploadConfig,
    error::{AppError, AppResult},
    storage::blob_store::BlobStore,
};

/// An image part read from a multipart request.
///
/// `size` counts every byte the client sent; `bytes` stops growing once it
/// passes the buffering cap, so an oversize upload is never held in full.
#[derive(Debug, Clone, Default)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            size: 0,
            bytes: Vec::new(),
        }
    }

    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: Some(content_type.into()),
            size: bytes.len(),
            bytes,
        }
    }

    pub fn append(&mut self, chunk: &[u8], cap: usize) {
        self.size += chunk.len();
        let room = cap.saturating_sub(self.bytes.len());
        self.bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Applies the upload policy on top of a [`BlobStore`].
#[derive(Clone)]
pub struct ImageStore {
    blobs: Arc<dyn BlobStore>,
    policy: UploadConfig,
}

impl ImageStore {
    pub fn new(blobs: Arc<dyn BlobStore>, policy: UploadConfig) -> Self {
        Self { blobs, policy }
    }

    /// Bytes worth buffering per upload: one past the limit is enough to
    /// know it was exceeded.
    pub fn buffer_cap(&self) -> usize {
        self.policy.max_bytes.saturating_add(1)
    }

    /// Checks extension, MIME type and size. Returns the normalized extension.
    pub fn validate(&self, image: &UploadedImage) -> AppResult<String> {
        let ext = image
            .extension()
            .filter(|ext| self.policy.allowed_extensions.iter().any(|a| a == ext))
            .ok_or_else(|| {
                AppError::Upload(format!(
                    "Invalid file type. Allowed types: {}",
                    self.policy.allowed_extensions.join(", ")
                ))
            })?;

        if image.size == 0 {
            return Err(AppError::Upload("Empty file provided".to_string()));
        }

        if image.size > self.policy.max_bytes {
            return Err(AppError::Upload(format!(
                "File too large. Maximum size: {}MB",
                self.policy.max_bytes / (1024 * 1024)
            )));
        }

        let mime = image
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase());
        match mime {
            Some(m) if self.policy.allowed_mime_types.iter().any(|a| *a == m) => Ok(ext),
            _ => Err(AppError::Upload("Invalid image format".to_string())),
        }
    }

    /// Validates and writes the image under a fresh `<uuid>.<ext>` key.
    pub fn store(&self, image: &UploadedImage) -> AppResult<String> {
        let ext = self.validate(image)?;
        let key = format!("{}.{}", Uuid::new_v4(), ext);

        self.blobs.put(&key, &image.bytes)?;

        info!(key = %key, original_name = %image.file_name, size = image.size, "Image stored");
        Ok(key)
    }

    /// Best-effort removal used for compensation and old-image cleanup.
    pub fn discard(&self, key: &str) {
        match self.blobs.delete(key) {
            Ok(()) => info!(key = %key, "Image removed"),
            Err(e) => warn!(key = %key, error = %e, "Failed to remove image"),
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.blobs.exists(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::blob_store::LocalBlobStore;

    fn store_in(dir: &Path) -> ImageStore {
        ImageStore::new(Arc::new(LocalBlobStore::new(dir)), UploadConfig::default())
    }

    #[test]
    fn stores_under_uuid_key_with_original_extension() {
        let dir = tempfile::tempdir().unwrap();
        let images = store_in(dir.path());

        let key = images
            .store(&UploadedImage::from_bytes("Me.PNG", "image/png", vec![1, 2, 3]))
            .unwrap();

        assert!(key.ends_with(".png"));
        let stem = key.trim_end_matches(".png");
        assert!(Uuid::parse_str(stem).is_ok());
        assert!(images.exists(&key));
    }

    #[test]
    fn rejects_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let images = store_in(dir.path());

        let err = images
            .store(&UploadedImage::from_bytes("cv.pdf", "application/pdf", vec![1]))
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn rejects_mismatched_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let images = store_in(dir.path());

        let err = images
            .validate(&UploadedImage::from_bytes("a.jpg", "text/plain", vec![1]))
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(msg) if msg == "Invalid image format"));
    }

    #[test]
    fn append_stops_buffering_past_cap_but_keeps_counting() {
        let mut image = UploadedImage::new("big.jpg", Some("image/jpeg".into()));
        image.append(&[0u8; 8], 10);
        image.append(&[0u8; 8], 10);
        assert_eq!(image.size, 16);
        assert_eq!(image.bytes.len(), 10);
    }

    #[test]
    fn rejects_more_than_five_megabytes() {
        let dir = tempfile::tempdir().unwrap();
        let images = store_in(dir.path());
        let mut image = UploadedImage::new("big.jpg", Some("image/jpeg".into()));
        image.append(&vec![0u8; 5 * 1024 * 1024 + 1], images.buffer_cap());

        let err = images.store(&image).unwrap_err();
        assert!(matches!(err, AppError::Upload(msg) if msg.starts_with("File too large")));
        assert!(!dir.path().join("uploads").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
