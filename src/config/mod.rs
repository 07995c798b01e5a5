#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::{FileReferenceImage, HttpImageGenerator, HttpImageStore, LocalImageStore};
use crate::domain::ports::{BackendConfig, Backends};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

pub use toml_config::TomlConfig;

/// Turns configured settings into host capabilities. Anything not configured
/// stays absent.
pub fn build_backends(config: &dyn BackendConfig) -> Result<Backends> {
    let timeout = Duration::from_secs(config.request_timeout_secs());
    let mut backends = Backends::none();

    if let Some(endpoint) = config.generation_endpoint() {
        tracing::debug!("Image generation backend: {}", endpoint);
        backends = backends.with_generator(Arc::new(HttpImageGenerator::new(endpoint, timeout)?));
    }

    if let Some(endpoint) = config.storage_endpoint() {
        tracing::debug!("Image storage backend: {}", endpoint);
        backends = backends.with_store(Arc::new(HttpImageStore::new(endpoint, timeout)?));
    } else if let Some(dir) = config.image_dir() {
        tracing::debug!("Image storage directory: {}", dir);
        backends = backends.with_store(Arc::new(LocalImageStore::new(dir)));
    }

    if let Some(path) = config.reference_image() {
        backends = backends.with_reference(Arc::new(FileReferenceImage::new(path)));
    }

    Ok(backends)
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;
