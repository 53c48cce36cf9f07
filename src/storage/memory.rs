//! In-process object store for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ObjectStore, StorageError};

const BASE_URL: &str = "memory://storage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
}

impl MemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.objects.lock().await.get(&(bucket.to_owned(), path.to_owned())).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().await;
        let key = (bucket.to_owned(), path.to_owned());
        if objects.contains_key(&key) {
            return Err(StorageError::AlreadyExists(path.to_owned()));
        }
        objects.insert(key, StoredObject { bytes, content_type: content_type.to_owned() });
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().await;
        objects
            .remove(&(bucket.to_owned(), path.to_owned()))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_owned()))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{BASE_URL}/{bucket}/{path}")
    }
}
