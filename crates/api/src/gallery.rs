//! Session-scoped gallery of generated videos.
//!
//! Completed records are inserted newest-first, reads are immutable
//! snapshots, and the whole gallery is cleared when the session ends.
//! Nothing is persisted.

use tokio::sync::RwLock;
use vision_core::record::GeneratedVideoRecord;

/// In-memory gallery store shared via `Arc` in [`crate::state::AppState`].
pub struct GalleryStore {
    items: RwLock<Vec<GeneratedVideoRecord>>,
}

impl GalleryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Insert a completed record at the front (newest-first order).
    pub async fn insert(&self, record: GeneratedVideoRecord) {
        let mut items = self.items.write().await;
        items.insert(0, record);
    }

    /// Snapshot of all records, newest first.
    pub async fn list(&self) -> Vec<GeneratedVideoRecord> {
        self.items.read().await.clone()
    }

    /// Drop all records. Called when the session ends.
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl Default for GalleryStore {
    fn default() -> Self {
        Self::new()
    }
}
