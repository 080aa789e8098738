//! Typed JWT claims.

pub mod factory;

pub use factory::ClaimFactory;

use serde_json::Value;

/// A single named, typed fact carried inside a token.
///
/// Registered claims from RFC 7519 get their own variant; anything
/// else becomes [`Claim::Custom`]. Temporal claims store their value
/// as a Unix timestamp in seconds.
#[derive(Debug, Clone, PartialEq)]
pub enum Claim {
    /// Recipients that the JWT is intended for (`aud`).
    Audience(Value),
    /// Expiration time on or after which the token must not be
    /// accepted (`exp`).
    Expiration(u64),
    /// Time at which the token was issued (`iat`).
    IssuedAt(u64),
    /// Principal that issued the token (`iss`).
    Issuer(Value),
    /// Unique identifier of the token (`jti`).
    JwtId(Value),
    /// Time before which the token must not be accepted (`nbf`).
    NotBefore(u64),
    /// Principal that is the subject of the token (`sub`).
    Subject(Value),
    /// Any claim outside the registered set.
    Custom { name: String, value: Value },
}

impl Claim {
    /// Claim name as serialized in a payload.
    pub fn name(&self) -> &str {
        match self {
            Claim::Audience(_) => "aud",
            Claim::Expiration(_) => "exp",
            Claim::IssuedAt(_) => "iat",
            Claim::Issuer(_) => "iss",
            Claim::JwtId(_) => "jti",
            Claim::NotBefore(_) => "nbf",
            Claim::Subject(_) => "sub",
            Claim::Custom { name, .. } => name,
        }
    }

    /// Raw claim value.
    pub fn value(&self) -> Value {
        match self {
            Claim::Expiration(ts) | Claim::IssuedAt(ts) | Claim::NotBefore(ts) => {
                Value::from(*ts)
            },
            Claim::Audience(value)
            | Claim::Issuer(value)
            | Claim::JwtId(value)
            | Claim::Subject(value)
            | Claim::Custom { value, .. } => value.clone(),
        }
    }

    /// Timestamp of a temporal claim (`exp`, `iat`, `nbf`).
    pub fn as_timestamp(&self) -> Option<u64> {
        match self {
            Claim::Expiration(ts) | Claim::IssuedAt(ts) | Claim::NotBefore(ts) => {
                Some(*ts)
            },
            _ => None,
        }
    }

    /// String view of the claim value, when it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Claim::Audience(value)
            | Claim::Issuer(value)
            | Claim::JwtId(value)
            | Claim::Subject(value)
            | Claim::Custom { value, .. } => value.as_str(),
            _ => None,
        }
    }
}
