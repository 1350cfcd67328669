//! Conversational-memory store.
//!
//! Layered bottom-up: [`HistoryBackend`] (the minimal key-value engine
//! contract) -> [`SessionStore`] (codec, ordering, sliding TTL) ->
//! [`ConversationMemory`] (the capability set the chat loop consumes).

pub mod backend;
pub mod memory;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::HistoryBackend;
pub use memory::ConversationMemory;
pub use store::SessionStore;
