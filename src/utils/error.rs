use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Image generation failed for {key}: {message}")]
    GenerationFailure { key: String, message: String },

    #[error("Image persistence failed: {message}")]
    PersistenceFailure { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image decoding error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Backend,
    System,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DocError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DocError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DocError::InvalidInput { .. } => ErrorCategory::Input,
            DocError::GenerationFailure { .. }
            | DocError::PersistenceFailure { .. }
            | DocError::HttpError(_)
            | DocError::SerializationError(_)
            | DocError::DecodeError(_) => ErrorCategory::Backend,
            DocError::IoError(_) => ErrorCategory::System,
            DocError::ConfigError { .. } | DocError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Backend failures are absorbed by the pipeline, so they only ever
    /// surface from direct adapter calls.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DocError::InvalidInput { .. } => "Provide non-empty markdown content",
            DocError::GenerationFailure { .. } | DocError::HttpError(_) => {
                "Check that the image generation backend is reachable"
            }
            DocError::PersistenceFailure { .. } => {
                "Check that the image storage backend is reachable"
            }
            DocError::SerializationError(_) | DocError::DecodeError(_) => {
                "Check that the backend speaks the expected JSON format"
            }
            DocError::IoError(_) => "Check file paths and permissions",
            DocError::ConfigError { .. } | DocError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DocError::InvalidInput { message } => format!("The document was rejected: {}", message),
            DocError::IoError(e) => format!("Could not read or write a file: {}", e),
            other => other.to_string(),
        }
    }
}
