use thiserror::Error;

/// Top-level error type for Home-Alog configuration and request handling.
#[derive(Error, Debug)]
pub enum HomealogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid arguments for {action}: {reason}")]
    InvalidArguments { action: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HomealogError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
