pub mod dispatcher;
pub mod persistence;
pub mod pipeline;
pub mod scanner;
pub mod substitution;
pub mod tool;

pub use crate::domain::model::{Document, ImageData, ImageKey, ImageSet, PlaceholderMatch, UrlMap};
pub use crate::domain::ports::{Backends, ImageGenerator, ImageStore, ReferenceImageLoader};
pub use crate::utils::error::Result;
