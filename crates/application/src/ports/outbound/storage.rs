//! Interface for the expiring key-value store backing the blacklist.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Port for the blacklist storage backend.
///
/// Entries expire on their own after the given TTL; the blacklist
/// additionally stores a grace expiry inside the value in case the
/// backend does not honor expiry.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key` for `ttl_minutes`, overwriting any
    /// previous entry. Returns whether the write was applied.
    async fn put(&self, key: &str, value: Value, ttl_minutes: u64) -> Result<bool>;

    /// Store `value` under `key` only when no live entry exists.
    ///
    /// The write must be atomic on the backend. This is what
    /// serializes concurrent refreshes of the same token.
    async fn put_if_absent(
        &self,
        key: &str,
        value: Value,
        ttl_minutes: u64,
    ) -> Result<bool>;
}
