use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("provider not found for \"{0}\"")]
    ProviderNotFound(String),

    /// Carries the fully built request URL that could not be fetched.
    #[error("error fetching \"{0}\"")]
    Provider(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("pattern not registered: {0}")]
    KeyNotFound(String),

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("cache error: {0}")]
    Cache(String),
}
