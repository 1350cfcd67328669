//! HistoryBackend trait definition.
//!
//! The minimal contract the session store needs from a key-value engine:
//! push-to-ordered-collection plus expiry refresh (as one atomic batch),
//! range-read, and delete-by-key. Any Redis-protocol server satisfies
//! it. Implementations live in palaver-infra (e.g. `ValkeyBackend`).

use palaver_types::error::StoreError;

use std::time::Duration;

/// Backend port for the session store.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition), the same
/// pattern as [`LlmProvider`](crate::llm::provider::LlmProvider).
pub trait HistoryBackend: Send + Sync {
    /// Push one record onto the head of the list at `key` and refresh the
    /// key's expiry to `ttl`, submitted as a single atomic batch.
    ///
    /// On a transport failure neither half is guaranteed to have taken
    /// effect, but a later reader must never observe the record present
    /// alongside a stale expiry as a stable end state.
    fn push_and_expire(
        &self,
        key: &str,
        record: Vec<u8>,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read the full list at `key`, newest record first (native push
    /// order). A missing key yields an empty vec, not an error.
    fn range_all(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Vec<u8>>, StoreError>> + Send;

    /// Delete `key` outright. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
