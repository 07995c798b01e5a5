use crate::domain::model::{ImageData, ImageSet, UrlMap};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// What a generation backend reports for a single prompt.
#[derive(Debug, Clone, Default)]
pub struct GenerationResult {
    pub success: bool,
    pub image: Option<ImageData>,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, reference_images: &[ImageData])
        -> Result<GenerationResult>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save_images(&self, document_id: Uuid, images: &ImageSet) -> Result<UrlMap>;
}

/// Supplies the baseline image that pins the output aspect ratio.
#[async_trait]
pub trait ReferenceImageLoader: Send + Sync {
    async fn load(&self) -> Result<ImageData>;
}

/// Host capabilities available to the pipeline. Any of them may be missing.
#[derive(Clone, Default)]
pub struct Backends {
    pub generator: Option<Arc<dyn ImageGenerator>>,
    pub store: Option<Arc<dyn ImageStore>>,
    pub reference: Option<Arc<dyn ReferenceImageLoader>>,
}

/// The capabilities the augmentation path needs, all guaranteed present.
#[derive(Clone)]
pub struct AugmentationBackends {
    pub generator: Arc<dyn ImageGenerator>,
    pub store: Arc<dyn ImageStore>,
    pub reference: Option<Arc<dyn ReferenceImageLoader>>,
}

impl Backends {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_generator(mut self, generator: Arc<dyn ImageGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_reference(mut self, reference: Arc<dyn ReferenceImageLoader>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Both generation and persistence must be present for images to be resolved.
    pub fn augmentation(&self) -> Option<AugmentationBackends> {
        match (&self.generator, &self.store) {
            (Some(generator), Some(store)) => Some(AugmentationBackends {
                generator: Arc::clone(generator),
                store: Arc::clone(store),
                reference: self.reference.clone(),
            }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("generator", &self.generator.is_some())
            .field("store", &self.store.is_some())
            .field("reference", &self.reference.is_some())
            .finish()
    }
}

/// Source of backend settings, implemented by the CLI and TOML configs.
pub trait BackendConfig: Send + Sync {
    fn generation_endpoint(&self) -> Option<&str>;
    fn storage_endpoint(&self) -> Option<&str>;
    fn image_dir(&self) -> Option<&str>;
    fn reference_image(&self) -> Option<&str>;
    fn request_timeout_secs(&self) -> u64;
}
