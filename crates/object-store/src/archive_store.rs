use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Capability interface the gateway uses to persist and read archives.
///
/// Every call is an independent request against the backing store; nothing is
/// cached between calls and nothing is retried.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Create or overwrite the object at `key`, tagged with `content_type`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// Fetch the whole object at `key` into memory.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) when
    /// the key is absent.
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Check whether an object exists at `key`.
    ///
    /// Only absence yields `Ok(false)`. Any other failure is returned as an
    /// error so callers can tell "missing" apart from "unreachable".
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Short label naming the storage backend, e.g. `cloudflare-r2`.
    fn backend(&self) -> &str;
}
