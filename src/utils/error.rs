use crate::domain::model::PoolKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Index {index} is out of bounds for {pool} (length {len})")]
    InvalidIndex {
        pool: PoolKey,
        index: usize,
        len: usize,
    },

    #[error("Item id '{id}' already exists in {pool}")]
    DuplicateIdentity { id: String, pool: PoolKey },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Provider error ({provider}): {message}")]
    ProviderError { provider: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 拖放引擎的前置條件違反
    Engine,
    Configuration,
    Network,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        PlannerError::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PlannerError::InvalidIndex { .. } | PlannerError::DuplicateIdentity { .. } => {
                ErrorCategory::Engine
            }
            PlannerError::ApiError(_) | PlannerError::ProviderError { .. } => {
                ErrorCategory::Network
            }
            PlannerError::ConfigError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PlannerError::IoError(_)
            | PlannerError::SerializationError(_)
            | PlannerError::ValidationError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 重複的地點只需拒絕插入
            PlannerError::DuplicateIdentity { .. } => ErrorSeverity::Low,
            PlannerError::ApiError(_) | PlannerError::ProviderError { .. } => {
                ErrorSeverity::Medium
            }
            PlannerError::ConfigError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. }
            | PlannerError::ValidationError { .. }
            | PlannerError::SerializationError(_) => ErrorSeverity::High,
            // 索引越界代表呼叫端有程式錯誤
            PlannerError::InvalidIndex { .. } | PlannerError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network)
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlannerError::InvalidIndex { pool, .. } => {
                format!("The move could not be applied to the {} list", pool)
            }
            PlannerError::DuplicateIdentity { .. } => {
                "This place is already in your plan".to_string()
            }
            PlannerError::ApiError(_) | PlannerError::ProviderError { .. } => {
                "An error occurred. Please try again.".to_string()
            }
            PlannerError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Engine => match self {
                PlannerError::DuplicateIdentity { .. } => {
                    "Pick a different place or move the existing entry instead"
                }
                _ => "Check the gesture indices against the current pool snapshot",
            },
            ErrorCategory::Network => "Check network connectivity and API keys, then retry",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Data => "Inspect the input data for malformed values",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
