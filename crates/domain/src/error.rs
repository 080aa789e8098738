//! Custom error handler for domain (core).

pub type Result<T> = std::result::Result<T, DomainError>;

/// Enum representing custom domain errors.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("claim '{name}' carries an invalid value")]
    InvalidClaim { name: String },
    #[error("payload is missing the '{name}' claim")]
    MissingClaim { name: String },

    #[error("token has expired")]
    TokenExpired,
    #[error("token cannot be accepted yet, '{name}' is in the future")]
    TokenNotYetValid { name: String },
}
