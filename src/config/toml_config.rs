use crate::domain::ports::BackendConfig;
use crate::utils::error::{DocError, Result};
use crate::utils::validation::{validate_endpoint, validate_exclusive, validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub image_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub image_path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DocError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl BackendConfig for TomlConfig {
    fn generation_endpoint(&self) -> Option<&str> {
        self.generation.endpoint.as_deref()
    }

    fn storage_endpoint(&self) -> Option<&str> {
        self.storage.endpoint.as_deref()
    }

    fn image_dir(&self) -> Option<&str> {
        self.storage.image_dir.as_deref()
    }

    fn reference_image(&self) -> Option<&str> {
        self.reference.image_path.as_deref()
    }

    fn request_timeout_secs(&self) -> u64 {
        self.generation.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_backend_config(self)
    }
}

/// Shared checks for any [`BackendConfig`] implementation.
pub fn validate_backend_config(config: &dyn BackendConfig) -> Result<()> {
    if let Some(endpoint) = config.generation_endpoint() {
        validate_endpoint("generation.endpoint", endpoint)?;
    }
    if let Some(endpoint) = config.storage_endpoint() {
        validate_endpoint("storage.endpoint", endpoint)?;
    }
    if let Some(dir) = config.image_dir() {
        validate_path("storage.image_dir", dir)?;
    }
    if let Some(path) = config.reference_image() {
        validate_path("reference.image_path", path)?;
    }
    validate_exclusive(
        "storage.endpoint",
        config.storage_endpoint(),
        "storage.image_dir",
        config.image_dir(),
    )?;
    validate_range(
        "generation.timeout_seconds",
        config.request_timeout_secs(),
        1,
        3600,
    )?;

    tracing::debug!("✅ Backend configuration validation passed");
    Ok(())
}
