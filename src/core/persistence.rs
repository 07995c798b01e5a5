use crate::domain::model::{ImageSet, UrlMap};
use crate::domain::ports::ImageStore;
use std::sync::Arc;
use uuid::Uuid;

/// Stores a batch of generated images under one document id.
pub struct ImagePersister {
    store: Arc<dyn ImageStore>,
}

impl ImagePersister {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// One store call for the whole batch. An empty batch skips the call and a
    /// failed call yields an empty map; neither is an error for the document.
    pub async fn persist(&self, document_id: Uuid, images: &ImageSet) -> UrlMap {
        if images.is_empty() {
            tracing::debug!("No generated images to persist for {}", document_id);
            return UrlMap::new();
        }

        tracing::info!("💾 Saving {} image(s) for {}", images.len(), document_id);

        match self.store.save_images(document_id, images).await {
            Ok(urls) => {
                tracing::info!("Stored {}/{} image(s)", urls.len(), images.len());
                urls
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to save images for {}: {}", document_id, e);
                UrlMap::new()
            }
        }
    }
}
