//! Token lifecycle state machine: encode, decode, refresh, invalidate.

use domain::payload::Payload;

use crate::blacklist::Blacklist;
use crate::error::{ApplicationError, Result};
use crate::factory::{CustomClaims, PayloadFactory};
use crate::ports::outbound::TokenCodec;

/// An opaque signed token string.
///
/// Only the codec ever looks inside; every other component treats it
/// as a black box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Orchestrates the token lifecycle across the codec, the payload
/// factory and the blacklist.
///
/// The manager holds no per-call state: the refresh flow is an
/// explicit parameter threaded through the decode path, so a single
/// instance is safe to share across concurrent requests.
pub struct TokenManager {
    codec: Box<dyn TokenCodec>,
    blacklist: Blacklist,
    payload_factory: PayloadFactory,
    blacklist_enabled: bool,
}

impl TokenManager {
    /// Create a new [`TokenManager`] with blacklist enforcement on.
    pub fn new(
        codec: Box<dyn TokenCodec>,
        blacklist: Blacklist,
        payload_factory: PayloadFactory,
    ) -> Self {
        Self {
            codec,
            blacklist,
            payload_factory,
            blacklist_enabled: true,
        }
    }

    /// Set whether decoded tokens are checked against the blacklist.
    pub fn with_blacklist_enabled(mut self, enabled: bool) -> Self {
        self.blacklist_enabled = enabled;
        self
    }

    /// Get the payload factory.
    pub fn payload_factory(&self) -> &PayloadFactory {
        &self.payload_factory
    }

    /// Sign a payload into a token.
    pub fn encode(&self, payload: &Payload) -> Result<Token> {
        Ok(Token::new(self.codec.encode(&payload.to_map())?))
    }

    /// Verify a token and return its validated payload.
    pub async fn decode(&self, token: &Token) -> Result<Payload> {
        self.decode_in(token, false).await
    }

    /// Exchange a token inside its refresh window for a fresh one.
    ///
    /// The predecessor is revoked before the successor is minted.
    /// `sub` and `iat` carry over; everything else, `jti`, `exp` and
    /// `nbf` included, is regenerated. Keeping the original `iat`
    /// anchors the refresh window to first issuance, so a chain of
    /// refreshes cannot extend it.
    pub async fn refresh(&self, token: &Token) -> Result<Token> {
        let payload = self.decode_in(token, true).await?;

        if self.blacklist_enabled {
            // Atomic first-writer-wins: a concurrent refresh of the
            // same token finds the entry and fails instead of minting
            // a second successor.
            if !self.blacklist.add_if_absent(&payload).await? {
                tracing::debug!(jti = ?payload.get("jti"), "refresh lost to an existing blacklist entry");
                return Err(ApplicationError::TokenBlacklisted);
            }
        }

        let mut carried = CustomClaims::new();
        if let Some(sub) = payload.get("sub") {
            carried = carried.add_claim("sub", sub);
        }
        if let Some(iat) = payload.get("iat") {
            carried = carried.add_claim("iat", iat);
        }

        self.encode(&self.payload_factory.make(carried, false)?)
    }

    /// Revoke a token by adding it to the blacklist.
    pub async fn invalidate(&self, token: &Token) -> Result<bool> {
        if !self.blacklist_enabled {
            return Err(ApplicationError::configuration(
                "the blacklist must be enabled to invalidate a token",
            ));
        }

        let payload = self.decode(token).await?;
        self.blacklist.add(&payload).await
    }

    async fn decode_in(&self, token: &Token, refresh_flow: bool) -> Result<Payload> {
        let raw = self.codec.decode(token.as_str())?;
        let payload = self
            .payload_factory
            .make(raw.into_iter().collect(), refresh_flow)?;

        if self.blacklist_enabled && self.blacklist.has(&payload).await? {
            tracing::debug!(jti = ?payload.get("jti"), "rejected blacklisted token");
            return Err(ApplicationError::TokenBlacklisted);
        }

        Ok(payload)
    }
}
