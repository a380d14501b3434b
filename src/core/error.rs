//! Error types for the logging pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed or absent message template
    #[error("Invalid message template: {0}")]
    InvalidTemplate(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Delivery to a remote collector failed after exhausting retries
    #[error("Delivery to '{endpoint}' failed after {attempts} attempt(s): {message}")]
    DeliveryFailure {
        endpoint: String,
        attempts: u32,
        message: String,
    },

    /// A pipeline stage failed during emit or flush
    #[error("Stage '{stage}' failed: {message}")]
    StageFailure { stage: String, message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The batching worker is gone (sink dropped or task panicked)
    #[error("Batched sink worker unavailable")]
    WorkerGone,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid template error
    pub fn template(message: impl Into<String>) -> Self {
        LoggerError::InvalidTemplate(message.into())
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a delivery failure error
    pub fn delivery(
        endpoint: impl Into<String>,
        attempts: u32,
        message: impl Into<String>,
    ) -> Self {
        LoggerError::DeliveryFailure {
            endpoint: endpoint.into(),
            attempts,
            message: message.into(),
        }
    }

    /// Create a stage failure error
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::StageFailure {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
