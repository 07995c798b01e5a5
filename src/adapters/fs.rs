use crate::domain::model::{ImageData, ImageSet, UrlMap};
use crate::domain::ports::{ImageStore, ReferenceImageLoader};
use crate::utils::error::{DocError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;
use uuid::Uuid;

/// Reads the reference (blank) image from disk on every load.
#[derive(Debug, Clone)]
pub struct FileReferenceImage {
    path: PathBuf,
}

impl FileReferenceImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReferenceImageLoader for FileReferenceImage {
    async fn load(&self) -> Result<ImageData> {
        let bytes = tokio::fs::read(&self.path).await?;
        tracing::debug!(
            "Loaded reference image {} ({} bytes)",
            self.path.display(),
            bytes.len()
        );
        Ok(ImageData::new(bytes))
    }
}

/// Persists images as `<base>/<document id>/<key>.png` and hands back
/// `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    base_path: PathBuf,
}

impl LocalImageStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn document_dir(&self, document_id: Uuid) -> PathBuf {
        self.base_path.join(document_id.to_string())
    }
}

fn file_url(path: &Path) -> Result<String> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|_| DocError::PersistenceFailure {
            message: format!("cannot express {} as a file URL", path.display()),
        })
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save_images(&self, document_id: Uuid, images: &ImageSet) -> Result<UrlMap> {
        let dir = self.document_dir(document_id);
        tokio::fs::create_dir_all(&dir).await?;
        let dir = tokio::fs::canonicalize(&dir).await?;

        let mut urls = UrlMap::new();
        for (key, image) in images {
            let path = dir.join(format!("{}.png", key));
            tokio::fs::write(&path, image.as_bytes()).await?;
            tracing::debug!("Wrote {} to {}", key, path.display());
            urls.insert(key.clone(), file_url(&path)?);
        }

        Ok(urls)
    }
}
