//! Issuer adapters.

use application::ports::outbound::IssuerContext;

/// Fixed issuer string for non-HTTP contexts.
pub struct StaticIssuer {
    issuer: String,
}

impl StaticIssuer {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }
}

impl IssuerContext for StaticIssuer {
    fn issuer(&self) -> String {
        self.issuer.clone()
    }
}
