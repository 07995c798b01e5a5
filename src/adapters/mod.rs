// Adapters layer: concrete backends for image generation, storage and the reference image.

pub mod fs;
pub mod http;

pub use fs::{FileReferenceImage, LocalImageStore};
pub use http::{HttpImageGenerator, HttpImageStore};
