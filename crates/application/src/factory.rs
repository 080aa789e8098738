//! Builds payloads from default and custom claims.

use std::collections::BTreeMap;
use std::sync::Arc;

use domain::claims::ClaimFactory;
use domain::payload::Payload;
use domain::validator::PayloadValidator;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::ports::outbound::{Clock, IssuerContext};

/// Claims generated when the caller does not supply them, in
/// resolution order (`jti` reads `nbf`, so `nbf` resolves first).
const DEFAULT_CLAIMS: [&str; 5] = ["iss", "iat", "exp", "nbf", "jti"];

/// Pending custom claims accumulated before [`PayloadFactory::make`].
///
/// Claims are unique by name; the last write wins.
#[derive(Debug, Clone, Default)]
pub struct CustomClaims {
    claims: BTreeMap<String, Value>,
}

impl CustomClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim, replacing any previous value under the same name.
    pub fn add_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// Add several claims at once.
    pub fn add_claims(
        mut self,
        claims: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        for (name, value) in claims {
            self.claims.insert(name, value);
        }
        self
    }
}

impl FromIterator<(String, Value)> for CustomClaims {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::new().add_claims(iter)
    }
}

/// Assembles and validates token payloads.
///
/// Custom claims are merged over the generated defaults; every
/// resolved pair goes through the claim factory so registered names
/// get their typed validation.
pub struct PayloadFactory {
    claim_factory: ClaimFactory,
    validator: PayloadValidator,
    issuer: Box<dyn IssuerContext>,
    clock: Arc<dyn Clock>,
    ttl_minutes: u64,
}

impl PayloadFactory {
    /// Create a new [`PayloadFactory`] with a 60 minute token TTL.
    pub fn new(
        claim_factory: ClaimFactory,
        validator: PayloadValidator,
        issuer: Box<dyn IssuerContext>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            claim_factory,
            validator,
            issuer,
            clock,
            ttl_minutes: 60,
        }
    }

    /// Update the token time-to-live (TTL), in minutes.
    pub fn with_ttl(mut self, minutes: u64) -> Self {
        self.ttl_minutes = minutes;
        self
    }

    /// Get the token TTL, in minutes.
    pub fn ttl(&self) -> u64 {
        self.ttl_minutes
    }

    /// Create a validated [`Payload`] from the supplied custom claims.
    ///
    /// `refresh_flow` selects the validation rule set and is passed
    /// per call: the factory itself holds no per-request state.
    pub fn make(&self, custom: CustomClaims, refresh_flow: bool) -> Result<Payload> {
        let now = self.clock.now();
        let mut claims = custom.claims;

        for name in DEFAULT_CLAIMS {
            if claims.contains_key(name) {
                continue;
            }

            let value = match name {
                "iss" => Value::from(self.issuer.issuer()),
                "iat" | "nbf" => Value::from(now),
                "exp" => Value::from(now + self.ttl_minutes * 60),
                "jti" => Value::from(jti(&claims)),
                _ => continue,
            };
            claims.insert(name.to_owned(), value);
        }

        let resolved = claims
            .into_iter()
            .map(|(name, value)| self.claim_factory.get(&name, value))
            .collect::<domain::error::Result<Vec<_>>>()?;

        Ok(Payload::new(resolved, &self.validator, refresh_flow, now)?)
    }
}

/// Deterministic token id derived from `sub` and `nbf`.
///
/// The same subject and not-before pair always yields the same id,
/// making issuance idempotent. The id is content-addressed, not a
/// secret.
fn jti(claims: &BTreeMap<String, Value>) -> String {
    let sub = match claims.get("sub") {
        Some(Value::String(sub)) => sub.clone(),
        Some(value) => value.to_string(),
        None => String::new(),
    };
    let nbf = claims
        .get("nbf")
        .and_then(Value::as_u64)
        .map(|ts| ts.to_string())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(format!("jti.{sub}.{nbf}"));

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: u64 = 1_700_000_000;

    struct StubClock(u64);

    impl Clock for StubClock {
        fn now(&self) -> u64 {
            self.0
        }
    }

    struct StubIssuer;

    impl IssuerContext for StubIssuer {
        fn issuer(&self) -> String {
            "https://issuer.example".to_owned()
        }
    }

    fn factory() -> PayloadFactory {
        PayloadFactory::new(
            ClaimFactory::new(),
            PayloadValidator::new(20_160 * 60),
            Box::new(StubIssuer),
            Arc::new(StubClock(NOW)),
        )
    }

    fn subject() -> CustomClaims {
        CustomClaims::new().add_claim("sub", "u1")
    }

    #[test]
    fn generates_the_five_default_claims() {
        let payload = factory().make(subject(), false).unwrap();

        assert_eq!(payload.get_str("iss"), Some("https://issuer.example"));
        assert_eq!(payload.get_timestamp("iat"), Some(NOW));
        assert_eq!(payload.get_timestamp("exp"), Some(NOW + 3_600));
        assert_eq!(payload.get_timestamp("nbf"), Some(NOW));
        assert_eq!(payload.get_str("sub"), Some("u1"));
        assert_eq!(payload.get_str("jti").map(str::len), Some(64));
    }

    #[test]
    fn caller_supplied_claims_are_not_regenerated() {
        let custom = subject()
            .add_claim("exp", NOW + 60)
            .add_claim("jti", "fixed-id");
        let payload = factory().make(custom, false).unwrap();

        assert_eq!(payload.get_timestamp("exp"), Some(NOW + 60));
        assert_eq!(payload.get_str("jti"), Some("fixed-id"));
    }

    #[test]
    fn last_write_wins_on_duplicate_custom_claims() {
        let custom = subject().add_claim("sub", "u2");
        let payload = factory().make(custom, false).unwrap();
        assert_eq!(payload.get_str("sub"), Some("u2"));
    }

    #[test]
    fn jti_is_stable_for_equal_subject_and_not_before() {
        let first = factory().make(subject(), false).unwrap();
        let second = factory().make(subject(), false).unwrap();
        assert_eq!(first.get_str("jti"), second.get_str("jti"));

        let other = factory()
            .make(CustomClaims::new().add_claim("sub", "u2"), false)
            .unwrap();
        assert_ne!(first.get_str("jti"), other.get_str("jti"));
    }

    #[test]
    fn non_string_subjects_are_json_encoded_into_jti() {
        let custom = CustomClaims::new().add_claim("sub", json!({"id": 7}));
        let payload = factory().make(custom, false).unwrap();
        assert_eq!(payload.get_str("jti").map(str::len), Some(64));
    }

    #[test]
    fn custom_claims_pass_through_untouched() {
        let custom = subject().add_claim("tenant", "acme");
        let payload = factory().make(custom, false).unwrap();
        assert_eq!(payload.get_str("tenant"), Some("acme"));
    }

    #[test]
    fn validation_runs_at_construction() {
        let custom = subject().add_claim("exp", NOW - 1);
        let err = factory().make(custom, false).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ApplicationError::Domain(
                domain::error::DomainError::TokenExpired
            )
        ));
    }
}
