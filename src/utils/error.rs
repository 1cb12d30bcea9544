use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Authentication failed: {message}")]
    UpstreamAuthError { message: String },

    #[error("Client lookup failed: {message}")]
    UpstreamLookupError { message: String },

    #[error("Client creation failed: {message}")]
    UpstreamCreateError { message: String },

    #[error("Client profile created but no ID returned")]
    PartialSuccessUnknownId { raw: serde_json::Value },

    #[error("Cache notification failed: {message}")]
    CacheNotifyError { message: String },
}

impl RelayError {
    /// 回傳給呼叫端的錯誤訊息 (放入 envelope 的 `error` 欄位)
    pub fn client_message(&self) -> String {
        match self {
            RelayError::ValidationError { message }
            | RelayError::UpstreamAuthError { message }
            | RelayError::UpstreamLookupError { message }
            | RelayError::UpstreamCreateError { message }
            | RelayError::CacheNotifyError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RelayError::UpstreamAuthError { .. }
                | RelayError::UpstreamLookupError { .. }
                | RelayError::UpstreamCreateError { .. }
                | RelayError::HttpError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
