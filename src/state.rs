//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the row store and object store behind trait objects, the bucket
//! names, and one async lock per gallery. Uploads take the gallery lock
//! while computing and inserting the next display slot so two uploads from
//! the same process never race for it.

use std::sync::Arc;

use editor::tile::Gallery;
use tokio::sync::Mutex;

use crate::config::Buckets;
use crate::storage::ObjectStore;
use crate::store::RowStore;

#[derive(Default)]
struct UploadLocks {
    photos: Mutex<()>,
    artworks: Mutex<()>,
}

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub rows: Arc<dyn RowStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub buckets: Buckets,
    upload_locks: Arc<UploadLocks>,
}

impl AppState {
    #[must_use]
    pub fn new(rows: Arc<dyn RowStore>, objects: Arc<dyn ObjectStore>, buckets: Buckets) -> Self {
        Self { rows, objects, buckets, upload_locks: Arc::new(UploadLocks::default()) }
    }

    /// Serializes slot placement within one gallery.
    #[must_use]
    pub fn upload_lock(&self, gallery: Gallery) -> &Mutex<()> {
        match gallery {
            Gallery::Photos => &self.upload_locks.photos,
            Gallery::Artworks => &self.upload_locks.artworks,
        }
    }

    #[must_use]
    pub fn bucket(&self, gallery: Gallery) -> &str {
        self.buckets.for_gallery(gallery)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
