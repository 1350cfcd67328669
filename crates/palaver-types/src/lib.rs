//! Shared domain types for Palaver.
//!
//! This crate contains the domain types used across the Palaver workspace:
//! chat turns and their wire codec, configuration, LLM request/response
//! shapes, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod turn;
