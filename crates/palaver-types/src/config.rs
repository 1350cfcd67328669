//! Configuration types for Palaver.
//!
//! [`AppConfig`] represents the top-level `config.toml`. Every field has a
//! default, so an empty or missing file yields a working local setup
//! (Valkey on localhost, a five-minute session window).

use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Floor for the sliding session window. A zero TTL would make every
/// session vanish the moment it is written.
const MIN_SESSION_TTL_SECONDS: u64 = 1;

/// Top-level configuration for the Palaver CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Conversational-memory store settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Model provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Settings for the Valkey-backed session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Valkey URL (redis://host:port).
    #[serde(default = "default_valkey_url")]
    pub url: String,

    /// Sliding session expiry in seconds. Every append refreshes the
    /// session key's expiry to this full duration.
    #[serde(default = "default_session_ttl_seconds")]
    pub session_ttl_seconds: u64,
}

impl MemoryConfig {
    /// The sliding session window as a [`Duration`], with a one-second
    /// floor enforced regardless of what the file says.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds.max(MIN_SESSION_TTL_SECONDS))
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            url: default_valkey_url(),
            session_ttl_seconds: default_session_ttl_seconds(),
        }
    }
}

fn default_valkey_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_session_ttl_seconds() -> u64 {
    300
}

/// Settings for the AWS Bedrock model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier, either a bare Claude model name or a fully
    /// qualified Bedrock model ID.
    #[serde(default = "default_model")]
    pub model: String,

    /// AWS region for the Bedrock Runtime endpoint.
    #[serde(default = "default_region")]
    pub region: String,

    /// Maximum output tokens per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature. Omitted from requests when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            region: default_region(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "anthropic.claude-3-sonnet-20240229-v1:0".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}
