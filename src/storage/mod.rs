//! Object storage for uploaded image files.
//!
//! DESIGN
//! ======
//! Uploads never overwrite: an existing object at the same path is reported
//! as [`StorageError::AlreadyExists`] and callers treat it as a skip, not a
//! failure. Public URLs are derived from bucket and path, and the reverse
//! mapping lets a tile delete find the object behind its `image_url`.

pub mod http;
pub mod memory;


use async_trait::async_trait;

/// One year, for immutable timestamped uploads.
pub const CACHE_CONTROL_MAX_AGE_SECS: u64 = 31_536_000;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object already exists: {0}")]
    AlreadyExists(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage request failed with status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("storage transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl crate::error::ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "E_OBJECT_EXISTS",
            Self::NotFound(_) => "E_OBJECT_NOT_FOUND",
            Self::Http { .. } => "E_STORAGE_HTTP",
            Self::Transport(_) => "E_STORAGE_TRANSPORT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_)) || matches!(self, Self::Http { status, .. } if *status >= 500)
    }
}

/// Blob storage with public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `bucket/path`. Never overwrites.
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Delete the object at `bucket/path`.
    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError>;

    /// Public URL of `bucket/path`.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Object path inside `bucket` for a URL produced by `public_url`.
    fn object_path(&self, bucket: &str, url: &str) -> Option<String> {
        let prefix = self.public_url(bucket, "");
        url.strip_prefix(&prefix).filter(|p| !p.is_empty()).map(str::to_owned)
    }
}

/// MIME type for an image file name, by extension. Unknown extensions get
/// `application/octet-stream`.
#[must_use]
pub fn content_type_for(file_name: &str) -> String {
    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    let mime = match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    };
    mime.into()
}

/// Storage path for a new upload: `{category}/{millis}-{file_name}`.
#[must_use]
pub fn upload_path(category: &str, millis: i128, file_name: &str) -> String {
    format!("{category}/{millis}-{file_name}")
}
