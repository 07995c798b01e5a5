use crate::core::dispatcher::ImageDispatcher;
use crate::core::persistence::ImagePersister;
use crate::core::scanner::PlaceholderScanner;
use crate::core::substitution::substitute;
use crate::core::tool::{result_message, RESULT_INSTRUCTIONS};
use crate::domain::model::{
    Document, DocumentData, ImageData, PlaceholderMatch, PresentDocumentArgs,
    PresentDocumentResult,
};
use crate::domain::ports::{AugmentationBackends, Backends, ReferenceImageLoader};
use crate::utils::error::{DocError, Result};
use uuid::Uuid;

/// Which path a document takes, decided once at pipeline entry.
pub enum Route {
    NoAugmentation,
    Augmenting(AugmentationBackends),
}

/// Placeholder detection, generation, persistence and substitution for one
/// document at a time.
pub struct DocumentPipeline {
    backends: Backends,
    scanner: PlaceholderScanner,
}

impl DocumentPipeline {
    pub fn new(backends: Backends) -> Self {
        Self {
            backends,
            scanner: PlaceholderScanner::new(),
        }
    }

    /// Entry point used by the `presentDocument` tool.
    pub async fn present(&self, args: PresentDocumentArgs) -> Result<PresentDocumentResult> {
        let document = self.run(Document::new(args.title, args.markdown)).await?;

        Ok(PresentDocumentResult {
            message: result_message(&document.title),
            title: document.title,
            data: DocumentData {
                markdown: document.markdown,
            },
            uuid: document.id,
            instructions: RESULT_INSTRUCTIONS.to_string(),
        })
    }

    pub async fn run(&self, document: Document) -> Result<Document> {
        if document.markdown.trim().is_empty() {
            return Err(DocError::invalid_input(
                "Markdown content is required but was not provided",
            ));
        }

        let placeholders = self.scanner.scan(&document.markdown);

        match self.route(&placeholders) {
            Route::NoAugmentation => {
                tracing::debug!("Presenting '{}' without image augmentation", document.title);
                Ok(document)
            }
            Route::Augmenting(backends) => Ok(self.augment(document, &placeholders, backends).await),
        }
    }

    pub fn route(&self, placeholders: &[PlaceholderMatch]) -> Route {
        if placeholders.is_empty() {
            return Route::NoAugmentation;
        }

        match self.backends.augmentation() {
            Some(backends) => Route::Augmenting(backends),
            None => {
                tracing::info!(
                    "Found {} placeholder(s) but image backends are unavailable, leaving them as is",
                    placeholders.len()
                );
                Route::NoAugmentation
            }
        }
    }

    async fn augment(
        &self,
        mut document: Document,
        placeholders: &[PlaceholderMatch],
        backends: AugmentationBackends,
    ) -> Document {
        let document_id = Uuid::new_v4();
        document.id = Some(document_id);

        tracing::info!(
            "🚀 Augmenting '{}' ({}) with {} image(s)",
            document.title,
            document_id,
            placeholders.len()
        );

        let reference = match &backends.reference {
            Some(loader) => load_reference(loader.as_ref()).await,
            None => None,
        };

        let images = ImageDispatcher::new(backends.generator)
            .dispatch(placeholders, reference.as_ref())
            .await;

        let urls = ImagePersister::new(backends.store)
            .persist(document_id, &images)
            .await;

        if !urls.is_empty() {
            let substitution = substitute(&document.markdown, &self.scanner, &urls);
            tracing::info!(
                "✅ Resolved {}/{} image(s) for {}",
                substitution.replaced,
                placeholders.len(),
                document_id
            );
            document.markdown = substitution.markdown;
        } else {
            tracing::warn!("⚠️ No image URLs available for {}", document_id);
        }

        document
    }
}

/// A reference image that cannot be loaded is treated as absent.
async fn load_reference(loader: &dyn ReferenceImageLoader) -> Option<ImageData> {
    match loader.load().await {
        Ok(image) if !image.is_empty() => Some(image),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("⚠️ Failed to load reference image: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatcher::build_prompt;
    use crate::domain::model::{ImageKey, ImageSet, UrlMap};
    use crate::domain::ports::{GenerationResult, ImageGenerator, ImageStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MockGenerator {
        failing_prompts: Vec<String>,
        calls: AtomicUsize,
        references_seen: Mutex<Vec<usize>>,
    }

    impl MockGenerator {
        fn failing(prompts: &[&str]) -> Self {
            Self {
                failing_prompts: prompts.iter().map(|p| build_prompt(p)).collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait::async_trait]
    impl ImageGenerator for MockGenerator {
        async fn generate(
            &self,
            prompt: &str,
            reference_images: &[ImageData],
        ) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.references_seen.lock().await.push(reference_images.len());

            if self.failing_prompts.iter().any(|p| p == prompt) {
                return Err(DocError::GenerationFailure {
                    key: "mock".to_string(),
                    message: "timed out".to_string(),
                });
            }
            Ok(GenerationResult {
                success: true,
                image: Some(ImageData::new(prompt.as_bytes().to_vec())),
            })
        }
    }

    #[derive(Default)]
    struct MockStore {
        fail: bool,
        calls: AtomicUsize,
        saved_ids: Mutex<Vec<Uuid>>,
    }

    #[async_trait::async_trait]
    impl ImageStore for MockStore {
        async fn save_images(&self, document_id: Uuid, images: &ImageSet) -> Result<UrlMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.saved_ids.lock().await.push(document_id);
            if self.fail {
                return Err(DocError::PersistenceFailure {
                    message: "503".to_string(),
                });
            }
            Ok(images
                .keys()
                .map(|key| (key.clone(), format!("https://x/{}.png", key)))
                .collect())
        }
    }

    struct MockReference(Option<ImageData>);

    #[async_trait::async_trait]
    impl ReferenceImageLoader for MockReference {
        async fn load(&self) -> Result<ImageData> {
            self.0.clone().ok_or_else(|| {
                DocError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "blank.png missing",
                ))
            })
        }
    }

    fn pipeline(generator: &Arc<MockGenerator>, store: &Arc<MockStore>) -> DocumentPipeline {
        DocumentPipeline::new(
            Backends::none()
                .with_generator(generator.clone())
                .with_store(store.clone()),
        )
    }

    fn args(markdown: &str) -> PresentDocumentArgs {
        PresentDocumentArgs {
            title: "Guide".to_string(),
            markdown: markdown.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_markdown_is_invalid_input() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline(&generator, &store);

        for markdown in ["", "   \n\t  "] {
            let err = pipeline.present(args(markdown)).await.unwrap_err();
            assert!(matches!(err, DocError::InvalidInput { .. }));
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_markdown_without_placeholders_is_untouched() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());
        let markdown = "# Hello\n\n![logo](https://example.com/logo.png)\n";

        let result = pipeline(&generator, &store)
            .present(args(markdown))
            .await
            .unwrap();

        assert_eq!(result.data.markdown, markdown);
        assert_eq!(result.uuid, None);
        assert_eq!(result.message, "Created markdown document: Guide");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_placeholder_resolved() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());

        let result = pipeline(&generator, &store)
            .present(args("![a cat](__too_be_replaced_image_path__)"))
            .await
            .unwrap();

        assert_eq!(result.data.markdown, "![a cat](https://x/image_0.png)");
        let id = result.uuid.expect("augmented documents carry an id");
        assert_eq!(store.saved_ids.lock().await.as_slice(), &[id]);
    }

    #[tokio::test]
    async fn test_every_placeholder_resolved_when_all_calls_succeed() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());
        let markdown = "![a](__too_be_replaced_image_path__)![b](/__too_be_replaced_image_path__)\n\
                        ![](__too_be_replaced_image_path__) tail";

        let result = pipeline(&generator, &store)
            .present(args(markdown))
            .await
            .unwrap();

        assert_eq!(
            result.data.markdown,
            "![a](https://x/image_0.png)![b](https://x/image_1.png)\n\
             ![](https://x/image_2.png) tail"
        );
        assert!(!result.data.markdown.contains("__too_be_replaced_image_path__"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_one_failed_generation_leaves_its_tag() {
        let generator = Arc::new(MockGenerator::failing(&["second"]));
        let store = Arc::new(MockStore::default());
        let markdown = "![first](__too_be_replaced_image_path__)\n\
                        ![second](/__too_be_replaced_image_path__)\n\
                        ![third](__too_be_replaced_image_path__)";

        let result = pipeline(&generator, &store)
            .present(args(markdown))
            .await
            .unwrap();

        assert_eq!(
            result.data.markdown,
            "![first](https://x/image_0.png)\n\
             ![second](/__too_be_replaced_image_path__)\n\
             ![third](https://x/image_2.png)"
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_all_generations_failing_skips_persistence() {
        let generator = Arc::new(MockGenerator::failing(&["a", "b"]));
        let store = Arc::new(MockStore::default());
        let markdown = "![a](__too_be_replaced_image_path__) ![b](__too_be_replaced_image_path__)";

        let result = pipeline(&generator, &store)
            .present(args(markdown))
            .await
            .unwrap();

        assert_eq!(result.data.markdown, markdown);
        assert!(result.uuid.is_some());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_returns_input_unchanged() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore {
            fail: true,
            ..MockStore::default()
        });
        let markdown = "Intro\n![a](__too_be_replaced_image_path__)\n![b](/__too_be_replaced_image_path__)";

        let result = pipeline(&generator, &store)
            .present(args(markdown))
            .await
            .unwrap();

        assert_eq!(result.data.markdown, markdown);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_backends_skip_augmentation() {
        let markdown = "![one](__too_be_replaced_image_path__)\n![two](/__too_be_replaced_image_path__)";
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());

        for backends in [
            Backends::none(),
            Backends::none().with_generator(generator.clone()),
            Backends::none().with_store(store.clone()),
        ] {
            let result = DocumentPipeline::new(backends)
                .present(args(markdown))
                .await
                .unwrap();
            assert_eq!(result.data.markdown, markdown);
            assert_eq!(result.uuid, None);
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline(&generator, &store);

        let first = pipeline
            .present(args("# Doc\n![a](__too_be_replaced_image_path__)"))
            .await
            .unwrap();
        let second = pipeline
            .present(args(&first.data.markdown))
            .await
            .unwrap();

        assert_eq!(second.data.markdown, first.data.markdown);
        assert_eq!(second.uuid, None);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reference_image_is_shared_by_every_request() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());
        let pipeline = DocumentPipeline::new(
            Backends::none()
                .with_generator(generator.clone())
                .with_store(store.clone())
                .with_reference(Arc::new(MockReference(Some(ImageData::new(vec![0; 16]))))),
        );

        pipeline
            .present(args(
                "![a](__too_be_replaced_image_path__) ![b](__too_be_replaced_image_path__)",
            ))
            .await
            .unwrap();

        assert_eq!(generator.references_seen.lock().await.as_slice(), &[1, 1]);
    }

    #[tokio::test]
    async fn test_failed_reference_load_is_not_fatal() {
        let generator = Arc::new(MockGenerator::default());
        let store = Arc::new(MockStore::default());
        let pipeline = DocumentPipeline::new(
            Backends::none()
                .with_generator(generator.clone())
                .with_store(store.clone())
                .with_reference(Arc::new(MockReference(None))),
        );

        let result = pipeline
            .present(args("![a](__too_be_replaced_image_path__)"))
            .await
            .unwrap();

        assert_eq!(result.data.markdown, "![a](https://x/image_0.png)");
        assert_eq!(generator.references_seen.lock().await.as_slice(), &[0]);
    }

    #[test]
    fn test_route_requires_placeholders_and_both_backends() {
        let pipeline = DocumentPipeline::new(
            Backends::none()
                .with_generator(Arc::new(MockGenerator::default()))
                .with_store(Arc::new(MockStore::default())),
        );
        let found = PlaceholderScanner::new().scan("![a](__too_be_replaced_image_path__)");

        assert!(matches!(pipeline.route(&[]), Route::NoAugmentation));
        assert!(matches!(pipeline.route(&found), Route::Augmenting(_)));
        assert_eq!(found[0].key(), ImageKey::from_index(0));
    }
}
