//! ValkeyBackend -- concrete [`HistoryBackend`] over a Redis-protocol list.

use std::time::Duration;

use redis::aio::ConnectionManager;

use palaver_core::history::HistoryBackend;
use palaver_types::error::StoreError;

/// History backend storing each session as a server-side list under its
/// session key.
///
/// LPUSH keeps the newest record at the head, which is the order
/// [`range_all`](HistoryBackend::range_all) promises. Cloning is cheap;
/// the underlying [`ConnectionManager`] multiplexes one connection.
#[derive(Clone)]
pub struct ValkeyBackend {
    conn: ConnectionManager,
}

impl ValkeyBackend {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

impl HistoryBackend for ValkeyBackend {
    async fn push_and_expire(
        &self,
        key: &str,
        record: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        // MULTI/EXEC so the push and the expiry refresh land together or
        // not at all.
        redis::pipe()
            .atomic()
            .lpush(key, record)
            .ignore()
            .expire(key, ttl.as_secs() as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError::Backend(format!("append failed: {e}")))
    }

    async fn range_all(&self, key: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();

        // LRANGE walks head to tail, so an expired or missing key comes
        // back as an empty list rather than an error.
        redis::cmd("LRANGE")
            .arg(key)
            .arg(0)
            .arg(-1)
            .query_async::<Vec<Vec<u8>>>(&mut conn)
            .await
            .map_err(|e| StoreError::Backend(format!("read failed: {e}")))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        // DEL reports how many keys existed; deleting nothing is fine.
        redis::cmd("DEL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend(format!("delete failed: {e}")))
    }
}
