//! Revoked token bookkeeping over an expiring key-value store.

use std::sync::Arc;

use domain::payload::Payload;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::ports::outbound::{Clock, Storage};

/// Default refresh window: two weeks, in minutes.
pub const DEFAULT_REFRESH_TTL: u64 = 20_160;

/// Records invalidated or superseded token identities.
///
/// Every entry stores a grace expiry, the latest instant at which the
/// identity may still matter. A backend that does not honor TTLs can
/// therefore never resurrect a revoked token: lookups re-check the
/// stored expiry against the clock.
pub struct Blacklist {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    refresh_ttl_minutes: u64,
}

impl Blacklist {
    /// Create a new [`Blacklist`] with the default refresh window.
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            refresh_ttl_minutes: DEFAULT_REFRESH_TTL,
        }
    }

    /// Update the refresh window, in minutes.
    pub fn with_refresh_ttl(mut self, minutes: u64) -> Self {
        self.refresh_ttl_minutes = minutes;
        self
    }

    /// Whether the payload's token identity is currently revoked.
    ///
    /// Storage failures propagate: enforcement is fail-closed, the
    /// caller never treats an unreachable backend as "not revoked".
    pub async fn has(&self, payload: &Payload) -> Result<bool> {
        let Some(entry) = self.storage.get(&identity(payload)).await? else {
            return Ok(false);
        };

        let grace = entry.as_u64().unwrap_or(0);
        Ok(grace > self.clock.now())
    }

    /// Revoke the payload's token identity, overwriting any previous
    /// entry. Returns whether the write succeeded.
    pub async fn add(&self, payload: &Payload) -> Result<bool> {
        let (key, grace, ttl_minutes) = self.entry(payload);
        self.storage.put(&key, Value::from(grace), ttl_minutes).await
    }

    /// Revoke the payload's token identity only when it is not
    /// already revoked.
    ///
    /// Returns `false` when an entry already exists, which is how a
    /// losing concurrent refresh learns the token was already spent.
    pub async fn add_if_absent(&self, payload: &Payload) -> Result<bool> {
        let (key, grace, ttl_minutes) = self.entry(payload);
        self.storage
            .put_if_absent(&key, Value::from(grace), ttl_minutes)
            .await
    }

    /// Get the refresh window, in minutes.
    pub fn refresh_ttl(&self) -> u64 {
        self.refresh_ttl_minutes
    }

    fn entry(&self, payload: &Payload) -> (String, u64, u64) {
        let now = self.clock.now();
        let issued_at = payload.get_timestamp("iat").unwrap_or(now);
        let expires_at = payload.get_timestamp("exp").unwrap_or(0);

        // Latest instant at which this identity may still be refreshed
        // or accepted.
        let grace = expires_at.max(issued_at + self.refresh_ttl_minutes * 60);
        let ttl_minutes = grace.saturating_sub(now).div_ceil(60);

        (identity(payload), grace, ttl_minutes)
    }
}

/// Stable identity of a token for revocation purposes.
///
/// The `jti` claim when present, otherwise a digest of `sub` and
/// `iat`.
fn identity(payload: &Payload) -> String {
    if let Some(jti) = payload.get_str("jti") {
        return jti.to_owned();
    }

    let sub = payload
        .get("sub")
        .map(|value| value.to_string())
        .unwrap_or_default();
    let iat = payload.get_timestamp("iat").unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(format!("revoked.{sub}.{iat}"));

    hex::encode(hasher.finalize())
}
