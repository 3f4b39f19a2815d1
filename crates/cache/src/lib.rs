//! Response caching for read paths.
//!
//! [`Cache`] is the interface a backend implements; [`MemoryCache`] is the
//! bundled process-local backend. [`CacheAside`] layers get-or-compute on top.

pub mod aside;
pub mod error;
pub mod key;
pub mod memory;

pub use aside::CacheAside;
pub use error::{CacheError, CacheResult};
pub use key::cache_key;
pub use memory::MemoryCache;

use std::time::Duration;

use async_trait::async_trait;

/// A string key/value cache with per-entry expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a live entry, `None` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Remove `key`; removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;
}
