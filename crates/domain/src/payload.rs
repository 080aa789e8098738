//! Validated collection of claims forming a token body.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::claims::Claim;
use crate::error::Result;
use crate::validator::PayloadValidator;

/// Immutable, validated claim set constituting a token body.
///
/// A payload is validated exactly once, at construction. The rule set
/// is selected by the refresh flag: the standard rules check `exp`,
/// the refresh rules check the refresh window instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    claims: BTreeMap<String, Claim>,
}

impl Payload {
    /// Build a payload from resolved claims and validate the set.
    ///
    /// Claims are unique by name; duplicates keep the last one. `now`
    /// is the Unix timestamp used for the temporal checks.
    pub fn new(
        claims: impl IntoIterator<Item = Claim>,
        validator: &PayloadValidator,
        refresh_flow: bool,
        now: u64,
    ) -> Result<Self> {
        let mut set = BTreeMap::new();
        for claim in claims {
            set.insert(claim.name().to_owned(), claim);
        }

        validator.check(&set, refresh_flow, now)?;

        Ok(Self { claims: set })
    }

    /// Raw value of a claim, if present.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.claims.get(name).map(Claim::value)
    }

    /// String value of a claim, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Claim::as_str)
    }

    /// Timestamp of a temporal claim, if present.
    pub fn get_timestamp(&self, name: &str) -> Option<u64> {
        self.claims.get(name).and_then(Claim::as_timestamp)
    }

    /// Whether the payload carries the claim.
    pub fn has(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Iterate over name/value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.claims
            .iter()
            .map(|(name, claim)| (name.as_str(), claim.value()))
    }

    /// The payload as a raw claim map, ready for signing.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.claims
            .iter()
            .map(|(name, claim)| (name.clone(), claim.value()))
            .collect()
    }

    /// Number of claims carried.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the payload carries no claim at all.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use serde_json::json;

    fn validator() -> PayloadValidator {
        PayloadValidator::new(1_209_600).with_required_claims(vec!["sub".into()])
    }

    fn subject() -> Claim {
        Claim::Subject(json!("u1"))
    }

    #[test]
    fn duplicate_names_keep_the_last_claim() {
        let payload = Payload::new(
            [subject(), Claim::Subject(json!("u2"))],
            &validator(),
            false,
            1_000,
        )
        .unwrap();

        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get_str("sub"), Some("u2"));
    }

    #[test]
    fn construction_runs_validation() {
        let err = Payload::new([Claim::IssuedAt(5)], &validator(), false, 1_000)
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingClaim { name } if name == "sub"));
    }

    #[test]
    fn accessors_expose_raw_values() {
        let payload = Payload::new(
            [subject(), Claim::Expiration(2_000)],
            &validator(),
            false,
            1_000,
        )
        .unwrap();

        assert_eq!(payload.get("exp"), Some(json!(2_000)));
        assert_eq!(payload.get_timestamp("exp"), Some(2_000));
        assert!(payload.has("sub"));
        assert!(!payload.has("aud"));
        assert_eq!(payload.to_map().len(), 2);

        let names: Vec<&str> = payload.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["exp", "sub"]);
    }

    #[test]
    fn equality_compares_the_claim_set() {
        let left =
            Payload::new([subject()], &validator(), false, 1_000).unwrap();
        let right =
            Payload::new([subject()], &validator(), false, 1_000).unwrap();
        assert_eq!(left, right);
    }
}
