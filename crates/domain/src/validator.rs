//! Structural and temporal validation of claim sets.

use std::collections::BTreeMap;

use crate::claims::Claim;
use crate::error::{DomainError, Result};

/// Claims that every payload must carry by default.
pub const DEFAULT_REQUIRED_CLAIMS: [&str; 6] =
    ["iss", "iat", "exp", "nbf", "sub", "jti"];

/// Enforces required-claim presence and temporal invariants over a
/// resolved claim set.
///
/// Validation fails fast on the first violated rule. The refresh flow
/// deliberately skips the `exp` check: an expired access token may
/// still be exchanged as long as the refresh window is open.
#[derive(Debug, Clone)]
pub struct PayloadValidator {
    required_claims: Vec<String>,
    refresh_ttl_seconds: u64,
    leeway_seconds: u64,
}

impl PayloadValidator {
    /// Create a validator with the default required claims, no leeway
    /// and the given refresh window.
    pub fn new(refresh_ttl_seconds: u64) -> Self {
        Self {
            required_claims: DEFAULT_REQUIRED_CLAIMS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            refresh_ttl_seconds,
            leeway_seconds: 0,
        }
    }

    /// Replace the required-claim list.
    pub fn with_required_claims(mut self, claims: Vec<String>) -> Self {
        self.required_claims = claims;
        self
    }

    /// Tolerance applied to every temporal comparison, in seconds.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Validate a resolved claim set at instant `now`.
    pub fn check(
        &self,
        claims: &BTreeMap<String, Claim>,
        refresh_flow: bool,
        now: u64,
    ) -> Result<()> {
        for name in &self.required_claims {
            if !claims.contains_key(name) {
                return Err(DomainError::MissingClaim { name: name.clone() });
            }
        }

        if refresh_flow {
            return self.check_refresh_window(claims, now);
        }

        self.check_timestamps(claims, now)
    }

    /// Standard flow: `exp` strictly in the future, `nbf` and `iat`
    /// not in the future.
    fn check_timestamps(
        &self,
        claims: &BTreeMap<String, Claim>,
        now: u64,
    ) -> Result<()> {
        if let Some(exp) = timestamp(claims, "exp")
            && exp + self.leeway_seconds <= now
        {
            return Err(DomainError::TokenExpired);
        }

        for name in ["nbf", "iat"] {
            if let Some(ts) = timestamp(claims, name)
                && ts > now + self.leeway_seconds
            {
                return Err(DomainError::TokenNotYetValid {
                    name: name.to_owned(),
                });
            }
        }

        Ok(())
    }

    /// Refresh flow: the window anchored at `iat` must not have passed.
    fn check_refresh_window(
        &self,
        claims: &BTreeMap<String, Claim>,
        now: u64,
    ) -> Result<()> {
        if let Some(iat) = timestamp(claims, "iat")
            && iat + self.refresh_ttl_seconds + self.leeway_seconds <= now
        {
            return Err(DomainError::TokenExpired);
        }

        Ok(())
    }
}

fn timestamp(claims: &BTreeMap<String, Claim>, name: &str) -> Option<u64> {
    claims.get(name).and_then(Claim::as_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: u64 = 1_700_000_000;
    const REFRESH_TTL: u64 = 20_160 * 60; // 2 weeks.

    fn validator() -> PayloadValidator {
        PayloadValidator::new(REFRESH_TTL)
    }

    fn claim_set(claims: Vec<Claim>) -> BTreeMap<String, Claim> {
        claims
            .into_iter()
            .map(|claim| (claim.name().to_owned(), claim))
            .collect()
    }

    fn full_set(iat: u64, exp: u64, nbf: u64) -> BTreeMap<String, Claim> {
        claim_set(vec![
            Claim::Issuer(json!("https://issuer.example")),
            Claim::IssuedAt(iat),
            Claim::Expiration(exp),
            Claim::NotBefore(nbf),
            Claim::Subject(json!("u1")),
            Claim::JwtId(json!("id-1")),
        ])
    }

    #[test]
    fn accepts_a_live_token() {
        let claims = full_set(NOW, NOW + 3_600, NOW);
        assert!(validator().check(&claims, false, NOW).is_ok());
    }

    #[test]
    fn missing_required_claim_names_the_claim() {
        let mut claims = full_set(NOW, NOW + 3_600, NOW);
        claims.remove("jti");

        let err = validator().check(&claims, false, NOW).unwrap_err();
        assert!(matches!(err, DomainError::MissingClaim { name } if name == "jti"));
    }

    #[test]
    fn expiration_must_be_strictly_in_the_future() {
        let claims = full_set(NOW - 3_600, NOW, NOW - 3_600);
        let err = validator().check(&claims, false, NOW).unwrap_err();
        assert!(matches!(err, DomainError::TokenExpired));

        let claims = full_set(NOW - 3_600, NOW + 1, NOW - 3_600);
        assert!(validator().check(&claims, false, NOW).is_ok());
    }

    #[test]
    fn not_before_in_the_future_is_rejected() {
        let claims = full_set(NOW, NOW + 3_600, NOW + 100);
        let err = validator().check(&claims, false, NOW).unwrap_err();
        assert!(
            matches!(err, DomainError::TokenNotYetValid { name } if name == "nbf")
        );
    }

    #[test]
    fn issued_at_in_the_future_is_rejected() {
        let claims = full_set(NOW + 100, NOW + 3_600, NOW);
        let err = validator().check(&claims, false, NOW).unwrap_err();
        assert!(
            matches!(err, DomainError::TokenNotYetValid { name } if name == "iat")
        );
    }

    #[test]
    fn leeway_tolerates_small_clock_skew() {
        let claims = full_set(NOW, NOW + 3_600, NOW + 5);
        assert!(
            validator()
                .with_leeway(10)
                .check(&claims, false, NOW)
                .is_ok()
        );
    }

    #[test]
    fn refresh_flow_ignores_expiration_inside_the_window() {
        // The access token expired an hour ago.
        let claims = full_set(NOW - 7_200, NOW - 3_600, NOW - 7_200);
        assert!(validator().check(&claims, true, NOW).is_ok());
    }

    #[test]
    fn refresh_flow_rejects_an_elapsed_window() {
        let iat = NOW - REFRESH_TTL;
        let claims = full_set(iat, iat + 3_600, iat);
        let err = validator().check(&claims, true, NOW).unwrap_err();
        assert!(matches!(err, DomainError::TokenExpired));
    }
}
