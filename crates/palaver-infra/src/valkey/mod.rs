//! Valkey/Redis-protocol connectivity.
//!
//! Any server speaking the Redis protocol works here (Valkey, Redis,
//! KeyDB); the list-plus-expiry commands the backend uses are ancient
//! and universally supported.

pub mod backend;

pub use backend::ValkeyBackend;

use redis::aio::ConnectionManager;

use palaver_types::error::StoreError;

/// Open a managed connection to the server at `url` and verify it with
/// a PING before handing it out.
///
/// The [`ConnectionManager`] reconnects on its own after transient
/// drops, so callers clone it freely instead of pooling.
pub async fn connect(url: &str) -> Result<ConnectionManager, StoreError> {
    let client =
        redis::Client::open(url).map_err(|e| StoreError::Backend(format!("invalid url: {e}")))?;

    let mut conn = client
        .get_connection_manager()
        .await
        .map_err(|e| StoreError::Backend(format!("connect failed: {e}")))?;

    redis::cmd("PING")
        .query_async::<String>(&mut conn)
        .await
        .map_err(|e| StoreError::Backend(format!("ping failed: {e}")))?;

    tracing::debug!(url = %url, "connected to history backend");
    Ok(conn)
}

#[cfg(test)]
pub(crate) async fn connect_for_tests() -> Option<ConnectionManager> {
    connect("redis://127.0.0.1:6379").await.ok()
}
