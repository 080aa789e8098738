//! Interface for signing and verifying compact token strings.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Result;

/// Raw claim map exchanged with the codec.
pub type ClaimMap = BTreeMap<String, Value>;

/// Port for the cryptographic token codec.
///
/// The codec owns signature and format concerns only. Temporal rules
/// belong to the payload validator, so `decode` must not reject an
/// expired token; the refresh flow relies on being able to read one.
pub trait TokenCodec: Send + Sync {
    /// Sign a claim set into a compact token string.
    fn encode(&self, claims: &ClaimMap) -> Result<String>;

    /// Verify a token string and return its raw claims.
    fn decode(&self, token: &str) -> Result<ClaimMap>;
}
