//! Object storage over a Supabase-compatible storage REST API.
//!
//! Endpoints used:
//! - `POST   /storage/v1/object/{bucket}/{path}` with `x-upsert: false`
//! - `DELETE /storage/v1/object/{bucket}` with `{"prefixes": [path]}`
//! - public reads at `/storage/v1/object/public/{bucket}/{path}`

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::{CACHE_CONTROL_MAX_AGE_SECS, ObjectStore, StorageError};
use crate::config::RemoteStorage;

const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct HttpObjectStore {
    http: reqwest::Client,
    base_url: String,
    key: String,
}

impl HttpObjectStore {
    /// Build a client for the configured storage API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &RemoteStorage) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, base_url: config.url.clone(), key: config.key.clone() })
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.base_url)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.key).header("apikey", &self.key)
    }
}

/// Whether a rejected upload means the object is already there.
///
/// The API answers 400 or 409 with a `Duplicate` error for existing paths.
pub(crate) fn is_duplicate(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::CONFLICT {
        return true;
    }
    status == StatusCode::BAD_REQUEST && {
        let lower = body.to_ascii_lowercase();
        lower.contains("already exists") || lower.contains("duplicate")
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let req = self
            .http
            .post(self.object_url(bucket, path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, format!("max-age={CACHE_CONTROL_MAX_AGE_SECS}"))
            .header("x-upsert", "false")
            .body(bytes);
        let response = self.authorized(req).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(bucket, path, "object uploaded");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        if is_duplicate(status, &body) {
            return Err(StorageError::AlreadyExists(path.to_owned()));
        }
        Err(StorageError::Http { status: status.as_u16(), body })
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        let req = self
            .http
            .delete(format!("{}/storage/v1/object/{bucket}", self.base_url))
            .json(&serde_json::json!({ "prefixes": [path] }));
        let response = self.authorized(req).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Http { status: status.as_u16(), body });
        }
        // The API lists what it deleted; an empty list means nothing matched.
        let deleted: Value = response.json().await?;
        if deleted.as_array().is_some_and(Vec::is_empty) {
            return Err(StorageError::NotFound(path.to_owned()));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }
}
