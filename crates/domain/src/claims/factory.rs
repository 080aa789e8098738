//! Maps claim names to their typed variants.

use std::collections::HashMap;

use serde_json::Value;

use crate::claims::Claim;
use crate::error::{DomainError, Result};

type Constructor = fn(Value) -> Result<Claim>;

/// Builds typed [`Claim`]s from raw name/value pairs.
///
/// The registry of registered names is constructed at initialization
/// so tests can substitute their own. Unknown names never fail: they
/// resolve to [`Claim::Custom`].
pub struct ClaimFactory {
    registry: HashMap<&'static str, Constructor>,
}

impl ClaimFactory {
    /// Create a factory knowing the seven registered claims.
    pub fn new() -> Self {
        let registry: HashMap<&'static str, Constructor> = HashMap::from([
            ("aud", audience as Constructor),
            ("exp", expiration as Constructor),
            ("iat", issued_at as Constructor),
            ("iss", issuer as Constructor),
            ("jti", jwt_id as Constructor),
            ("nbf", not_before as Constructor),
            ("sub", subject as Constructor),
        ]);

        Self { registry }
    }

    /// Resolve a name/value pair into a typed claim.
    ///
    /// Fails with [`DomainError::InvalidClaim`] when a registered
    /// claim's value does not satisfy its own validation predicate.
    pub fn get(&self, name: &str, value: Value) -> Result<Claim> {
        match self.registry.get(name) {
            Some(constructor) => constructor(value),
            None => Ok(Claim::Custom {
                name: name.to_owned(),
                value,
            }),
        }
    }

    /// Whether the name belongs to the registered claim set.
    pub fn has(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }
}

impl Default for ClaimFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Positive Unix timestamp, or an invalid-claim error naming the claim.
fn timestamp(name: &str, value: &Value) -> Result<u64> {
    value
        .as_u64()
        .filter(|ts| *ts > 0)
        .ok_or_else(|| DomainError::InvalidClaim {
            name: name.to_owned(),
        })
}

/// Non-null value, or an invalid-claim error naming the claim.
fn present(name: &str, value: Value) -> Result<Value> {
    if value.is_null() {
        return Err(DomainError::InvalidClaim {
            name: name.to_owned(),
        });
    }

    Ok(value)
}

fn audience(value: Value) -> Result<Claim> {
    Ok(Claim::Audience(present("aud", value)?))
}

fn expiration(value: Value) -> Result<Claim> {
    Ok(Claim::Expiration(timestamp("exp", &value)?))
}

fn issued_at(value: Value) -> Result<Claim> {
    Ok(Claim::IssuedAt(timestamp("iat", &value)?))
}

fn issuer(value: Value) -> Result<Claim> {
    Ok(Claim::Issuer(present("iss", value)?))
}

fn jwt_id(value: Value) -> Result<Claim> {
    Ok(Claim::JwtId(present("jti", value)?))
}

fn not_before(value: Value) -> Result<Claim> {
    Ok(Claim::NotBefore(timestamp("nbf", &value)?))
}

fn subject(value: Value) -> Result<Claim> {
    Ok(Claim::Subject(present("sub", value)?))
}
