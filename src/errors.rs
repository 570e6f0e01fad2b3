use thiserror::Error;

#[derive(Debug, Error)]
pub enum HitlError {
    #[error("Failed to parse task batch: {0}")]
    ParseError(String),

    #[error("Invalid date in field `{field}`: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to render channel payload: {0}")]
    RenderError(String),

    #[error("Processing fault: {0}")]
    ProcessingFault(String),
}

impl From<serde_json::Error> for HitlError {
    fn from(error: serde_json::Error) -> Self {
        HitlError::ParseError(error.to_string())
    }
}

impl From<url::ParseError> for HitlError {
    fn from(error: url::ParseError) -> Self {
        HitlError::ConfigError(format!("approval base URL: {}", error))
    }
}
