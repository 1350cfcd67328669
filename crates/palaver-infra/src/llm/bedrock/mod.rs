//! AWS Bedrock Claude provider.

pub mod client;
pub mod streaming;
pub mod types;

pub use client::BedrockProvider;
