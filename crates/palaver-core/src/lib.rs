//! Business logic and port definitions for Palaver.
//!
//! This crate defines the "ports" (backend and provider traits) that the
//! infrastructure layer implements, plus the session store and
//! conversation-memory adapter built on them. It depends only on
//! `palaver-types` -- never on the Valkey client, reqwest, or any other
//! IO crate.

pub mod history;
pub mod llm;
pub mod prompt;
