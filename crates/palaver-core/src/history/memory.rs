//! Conversation-memory adapter over the session store.

use tokio_util::sync::CancellationToken;

use palaver_types::error::StoreError;
use palaver_types::turn::ChatTurn;

use super::backend::HistoryBackend;
use super::store::SessionStore;

/// The capability set the chat loop consumes: append a turn for either
/// participant, read the full transcript, or wipe the session.
///
/// A thin layer over [`SessionStore`]; it owns no state beyond the store
/// and adds no caching, so every call reflects what the backend holds at
/// that moment.
pub struct ConversationMemory<B> {
    store: SessionStore<B>,
}

impl<B: HistoryBackend> ConversationMemory<B> {
    pub fn new(store: SessionStore<B>) -> Self {
        Self { store }
    }

    /// The identifier of the session this memory reads and writes.
    pub fn session_id(&self) -> &str {
        self.store.session_id()
    }

    /// Record a human-authored turn at the end of the conversation.
    pub async fn append_human_turn(
        &self,
        text: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        self.store.append(&ChatTurn::human(text), cancel).await
    }

    /// Record a model-authored turn at the end of the conversation.
    pub async fn append_ai_turn(
        &self,
        text: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        self.store.append(&ChatTurn::ai(text), cancel).await
    }

    /// Record an already-constructed turn at the end of the conversation.
    pub async fn append_turn(
        &self,
        turn: &ChatTurn,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        self.store.append(turn, cancel).await
    }

    /// Replace the whole transcript with `turns`, in order.
    ///
    /// Not atomic: the clear and each append are separate operations, so
    /// a failure partway leaves the session holding a prefix of `turns`.
    /// Callers that need all-or-nothing semantics should treat any error
    /// here as grounds to [`reset`](Self::reset) and rebuild.
    pub async fn replace_all(
        &self,
        turns: &[ChatTurn],
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        self.store.clear(cancel).await?;
        for turn in turns {
            self.store.append(turn, cancel).await?;
        }
        Ok(())
    }

    /// The full transcript in chronological order, oldest turn first.
    /// A fresh or expired session yields an empty vec.
    pub async fn all_turns(&self, cancel: &CancellationToken) -> Result<Vec<ChatTurn>, StoreError> {
        self.store.read_all(cancel).await
    }

    /// Forget the conversation entirely. Safe to call on an already
    /// empty session.
    pub async fn reset(&self, cancel: &CancellationToken) -> Result<(), StoreError> {
        self.store.clear(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::testing::FakeBackend;

    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(300);

    fn memory(backend: FakeBackend) -> ConversationMemory<FakeBackend> {
        ConversationMemory::new(SessionStore::new(backend, "session-1", TTL))
    }

    #[tokio::test]
    async fn test_exchange_then_reset() {
        let memory = memory(FakeBackend::new());
        let cancel = CancellationToken::new();

        memory.append_human_turn("Hello", &cancel).await.unwrap();
        memory.append_ai_turn("Hi there", &cancel).await.unwrap();

        assert_eq!(
            memory.all_turns(&cancel).await.unwrap(),
            vec![ChatTurn::human("Hello"), ChatTurn::ai("Hi there")]
        );

        memory.reset(&cancel).await.unwrap();
        assert!(memory.all_turns(&cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_turn_accepts_prebuilt_turns() {
        let memory = memory(FakeBackend::new());
        let cancel = CancellationToken::new();

        let turn = ChatTurn::ai("canned reply");
        memory.append_turn(&turn, &cancel).await.unwrap();

        assert_eq!(memory.all_turns(&cancel).await.unwrap(), vec![turn]);
    }

    #[tokio::test]
    async fn test_replace_all_swaps_transcript() {
        let memory = memory(FakeBackend::new());
        let cancel = CancellationToken::new();

        memory.append_human_turn("stale", &cancel).await.unwrap();

        let replacement = vec![
            ChatTurn::human("fresh question"),
            ChatTurn::ai("fresh answer"),
        ];
        memory.replace_all(&replacement, &cancel).await.unwrap();

        assert_eq!(memory.all_turns(&cancel).await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn test_replace_all_failure_leaves_prefix() {
        let backend = FakeBackend::new();
        let memory = memory(backend.clone());
        let cancel = CancellationToken::new();

        // First append succeeds, second fails: the prefix persists.
        backend.fail_push_after(1);
        let turns = vec![ChatTurn::human("kept"), ChatTurn::ai("dropped")];
        let err = memory.replace_all(&turns, &cancel).await;
        assert!(matches!(err, Err(StoreError::Backend(_))));

        assert_eq!(
            memory.all_turns(&cancel).await.unwrap(),
            vec![ChatTurn::human("kept")]
        );
    }

    #[tokio::test]
    async fn test_append_failure_surfaces_to_caller() {
        let backend = FakeBackend::new();
        let memory = memory(backend.clone());
        let cancel = CancellationToken::new();

        backend.fail_push(true);
        assert!(matches!(
            memory.append_human_turn("hi", &cancel).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_to_caller() {
        let backend = FakeBackend::new();
        let memory = memory(backend.clone());
        let cancel = CancellationToken::new();

        backend.fail_range(true);
        assert!(matches!(
            memory.all_turns(&cancel).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let memory = memory(FakeBackend::new());
        let cancel = CancellationToken::new();

        memory.reset(&cancel).await.unwrap();
        memory.reset(&cancel).await.unwrap();
        assert!(memory.all_turns(&cancel).await.unwrap().is_empty());
    }
}
