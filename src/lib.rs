pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{build_backends, TomlConfig};
pub use core::pipeline::DocumentPipeline;
pub use domain::model::{PresentDocumentArgs, PresentDocumentResult};
pub use domain::ports::Backends;
pub use utils::error::{DocError, Result};
