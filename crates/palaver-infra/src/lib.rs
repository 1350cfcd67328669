//! Infrastructure implementations for Palaver.
//!
//! Concrete adapters behind the ports defined in `palaver-core`: the
//! Valkey/Redis history backend, the AWS Bedrock LLM provider, and the
//! TOML configuration loader.

pub mod config;
pub mod llm;
pub mod valkey;
