use crate::domain::model::{ImageData, ImageKey, ImageSet, PlaceholderMatch};
use crate::domain::ports::ImageGenerator;
use crate::utils::error::{DocError, Result};
use futures::future::join_all;
use std::sync::Arc;

/// Appended to every placeholder prompt; the reference image is passed last.
pub const DIMENSION_INSTRUCTION: &str = ". Use the last image as the output dimension.";

pub fn build_prompt(prompt: &str) -> String {
    format!("{}{}", prompt, DIMENSION_INSTRUCTION)
}

/// Settled result of one generation request.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub key: ImageKey,
    pub result: Result<ImageData>,
}

/// Fans out one generation request per placeholder and joins them all.
pub struct ImageDispatcher {
    generator: Arc<dyn ImageGenerator>,
}

impl ImageDispatcher {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }

    /// Runs every request concurrently and waits for all of them to settle.
    /// Outcomes come back in placeholder order regardless of completion order.
    pub async fn generate_all(
        &self,
        placeholders: &[PlaceholderMatch],
        reference: Option<&ImageData>,
    ) -> Vec<GenerationOutcome> {
        let references: Vec<ImageData> = reference
            .filter(|image| !image.is_empty())
            .cloned()
            .into_iter()
            .collect();
        let references = references.as_slice();

        let requests = placeholders.iter().map(|placeholder| async move {
            let key = placeholder.key();
            let prompt = build_prompt(&placeholder.prompt);
            let result = self.generate_one(&key, &prompt, references).await;
            GenerationOutcome { key, result }
        });

        join_all(requests).await
    }

    /// Same as [`generate_all`](Self::generate_all) but keeps only the
    /// successful images. Failures are logged and dropped.
    pub async fn dispatch(
        &self,
        placeholders: &[PlaceholderMatch],
        reference: Option<&ImageData>,
    ) -> ImageSet {
        tracing::info!(
            "🎨 Generating {} image(s) concurrently",
            placeholders.len()
        );

        let mut images = ImageSet::new();
        for outcome in self.generate_all(placeholders, reference).await {
            match outcome.result {
                Ok(image) => {
                    images.insert(outcome.key, image);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Skipping {}: {}", outcome.key, e);
                }
            }
        }

        tracing::info!(
            "Generated {}/{} image(s)",
            images.len(),
            placeholders.len()
        );
        images
    }

    async fn generate_one(
        &self,
        key: &ImageKey,
        prompt: &str,
        references: &[ImageData],
    ) -> Result<ImageData> {
        tracing::debug!("Requesting {} with prompt: {}", key, prompt);

        let response = self
            .generator
            .generate(prompt, references)
            .await
            .map_err(|e| DocError::GenerationFailure {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        match response.image {
            Some(image) if response.success && !image.is_empty() => {
                tracing::debug!("{} generated ({} bytes)", key, image.len());
                Ok(image)
            }
            _ => Err(DocError::GenerationFailure {
                key: key.to_string(),
                message: "backend reported no image".to_string(),
            }),
        }
    }
}
