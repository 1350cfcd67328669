//! Session store: a durable, ordered, time-bounded log of chat turns.

use tokio_util::sync::CancellationToken;

use palaver_types::error::StoreError;
use palaver_types::turn::ChatTurn;

use std::time::Duration;

use super::backend::HistoryBackend;

/// Append-only log of chat turns for one session, with a sliding TTL on
/// the whole session key.
///
/// Turns are pushed newest-first into the backing list and reversed on
/// read: chronological order (oldest first) is the contract downstream
/// prompt assembly relies on. Every successful append refreshes the
/// session key's expiry to the full TTL, so an idle session disappears
/// after the window elapses while an active one never expires
/// mid-conversation.
///
/// The store performs no retries of its own; retry policy, if any,
/// belongs to the caller.
pub struct SessionStore<B> {
    backend: B,
    session_id: String,
    ttl: Duration,
}

impl<B: HistoryBackend> SessionStore<B> {
    /// Create a store for one session. The session is implicitly created
    /// by its first append; there is no explicit create operation.
    pub fn new(backend: B, session_id: impl Into<String>, ttl: Duration) -> Self {
        Self {
            backend,
            session_id: session_id.into(),
            ttl,
        }
    }

    /// The opaque identifier of the session this store writes to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Encode `turn` and insert it as the newest entry, refreshing the
    /// session expiry to the full TTL. The insert and the expiry refresh
    /// go to the backend as one atomic batch.
    pub async fn append(
        &self,
        turn: &ChatTurn,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        let record = turn.to_wire();
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(StoreError::Cancelled),
            res = self.backend.push_and_expire(&self.session_id, record, self.ttl) => {
                if res.is_ok() {
                    tracing::trace!(session = %self.session_id, role = %turn.role, "turn appended");
                }
                res
            }
        }
    }

    /// Read every stored turn for this session in chronological order
    /// (oldest first). An empty or expired session yields an empty vec.
    ///
    /// A decode failure on any one record fails the whole read; no
    /// partial or lossy results.
    pub async fn read_all(&self, cancel: &CancellationToken) -> Result<Vec<ChatTurn>, StoreError> {
        let records = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(StoreError::Cancelled),
            res = self.backend.range_all(&self.session_id) => res?,
        };

        let mut turns = records
            .iter()
            .map(|record| ChatTurn::from_wire(record).map_err(StoreError::from))
            .collect::<Result<Vec<_>, _>>()?;

        // The backend hands records back newest-first (native push order).
        turns.reverse();
        Ok(turns)
    }

    /// Delete the session key immediately, regardless of remaining TTL.
    /// Clearing a nonexistent session is not an error.
    pub async fn clear(&self, cancel: &CancellationToken) -> Result<(), StoreError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(StoreError::Cancelled),
            res = self.backend.delete(&self.session_id) => res,
        }
    }
}
