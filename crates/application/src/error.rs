//! Application-level errors.

use domain::error::DomainError;

pub type Result<T> = std::result::Result<T, ApplicationError>;

/// Errors that can occur in the application layer.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("the token has been blacklisted")]
    TokenBlacklisted,
    #[error("token is malformed or its signature is invalid")]
    TokenInvalid(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("token could not be encoded")]
    Encode(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("blacklist storage failed")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    pub fn token_invalid<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::TokenInvalid(Box::new(err))
    }

    pub fn encode<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Encode(Box::new(err))
    }

    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
