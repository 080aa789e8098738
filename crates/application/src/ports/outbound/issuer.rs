//! Interface for resolving the token issuer.

/// Port supplying the `iss` default claim.
///
/// An HTTP front-end typically answers with the canonical request URL;
/// anything else provides a static issuer string.
pub trait IssuerContext: Send + Sync {
    /// Canonical issuer of newly minted tokens.
    fn issuer(&self) -> String;
}
