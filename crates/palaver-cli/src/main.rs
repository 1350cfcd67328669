//! Palaver CLI entry point.
//!
//! Binary name: `palaver`
//!
//! Connects to the Valkey-backed conversation memory and AWS Bedrock,
//! then runs the interactive chat loop.

mod chat;

use std::path::PathBuf;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use palaver_core::history::{ConversationMemory, SessionStore};
use palaver_infra::llm::bedrock::BedrockProvider;
use palaver_infra::valkey::ValkeyBackend;

#[derive(Parser)]
#[command(name = "palaver", about = "Chat with Claude, with Valkey-backed memory")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Resume an existing session instead of starting a new one.
    #[arg(long)]
    session: Option<String>,

    /// Wait for the full response instead of streaming it.
    #[arg(long)]
    no_stream: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,palaver=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = palaver_infra::config::load_config(&cli.config).await;

    let api_key = std::env::var("BEDROCK_API_KEY")
        .map(SecretString::from)
        .map_err(|_| {
            anyhow::anyhow!("BEDROCK_API_KEY not set. Export your Bedrock bearer token first.")
        })?;

    let conn = palaver_infra::valkey::connect(&config.memory.url)
        .await
        .map_err(|e| anyhow::anyhow!("cannot reach {}: {e}", config.memory.url))?;
    let backend = ValkeyBackend::new(conn);

    let session_id = cli
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let store = SessionStore::new(backend, session_id, config.memory.session_ttl());
    let memory = ConversationMemory::new(store);

    let provider = BedrockProvider::new(
        api_key,
        config.llm.model.clone(),
        config.llm.region.clone(),
    );

    chat::run_chat_loop(&memory, &provider, &config.llm, cli.no_stream).await
}
