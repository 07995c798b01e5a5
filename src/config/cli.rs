use super::toml_config::{validate_backend_config, TomlConfig, DEFAULT_TIMEOUT_SECS};
use crate::domain::model::PresentDocumentResult;
use crate::domain::ports::BackendConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "present-doc")]
#[command(about = "Resolve image placeholders in a markdown document")]
pub struct CliConfig {
    #[arg(long, help = "Markdown file to present")]
    pub input: String,

    #[arg(long, help = "Document title (defaults to the input file name)")]
    pub title: Option<String>,

    #[arg(long, help = "TOML file with backend settings")]
    pub config: Option<String>,

    #[arg(long)]
    pub generation_endpoint: Option<String>,

    #[arg(long)]
    pub storage_endpoint: Option<String>,

    #[arg(long, help = "Store generated images in this directory")]
    pub image_dir: Option<String>,

    #[arg(long, help = "Reference image that fixes output dimensions")]
    pub reference_image: Option<String>,

    #[arg(long, help = "Per-request timeout in seconds [default: 120]")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Write the result JSON here instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Fills settings not given on the command line from a config file.
    pub fn merge_file(&mut self, file: TomlConfig) {
        self.generation_endpoint = self.generation_endpoint.take().or(file.generation.endpoint);
        self.timeout = self.timeout.or(file.generation.timeout_seconds);
        self.reference_image = self.reference_image.take().or(file.reference.image_path);

        // Storage is one choice: a flag of either kind beats the file.
        if self.storage_endpoint.is_none() && self.image_dir.is_none() {
            self.storage_endpoint = file.storage.endpoint;
            self.image_dir = file.storage.image_dir;
        }
    }

    pub async fn read_markdown(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.input).await?)
    }

    /// Writes the result JSON to `--output`, or stdout when none was given.
    pub async fn write_result(&self, result: &PresentDocumentResult) -> Result<()> {
        let json = serde_json::to_string_pretty(result)?;
        match &self.output {
            Some(path) => {
                tokio::fs::write(path, json).await?;
                tracing::info!("📁 Result saved to: {}", path);
            }
            None => println!("{}", json),
        }
        Ok(())
    }

    pub fn document_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            std::path::Path::new(&self.input)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("Untitled")
                .to_string()
        })
    }
}

impl BackendConfig for CliConfig {
    fn generation_endpoint(&self) -> Option<&str> {
        self.generation_endpoint.as_deref()
    }

    fn storage_endpoint(&self) -> Option<&str> {
        self.storage_endpoint.as_deref()
    }

    fn image_dir(&self) -> Option<&str> {
        self.image_dir.as_deref()
    }

    fn reference_image(&self) -> Option<&str> {
        self.reference_image.as_deref()
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        validate_backend_config(self)
    }
}
