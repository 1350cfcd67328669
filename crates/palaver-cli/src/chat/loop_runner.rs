//! Main chat loop orchestration.
//!
//! Coordinates the conversation lifecycle: session banner, input loop
//! with streaming responses, slash commands, and turn persistence.
//!
//! Persistence order per exchange: the stored history is read before the
//! model is called (a failed read aborts the exchange so the model never
//! sees a truncated transcript), and both turns are written only after
//! the model produced a complete response. A write failure is logged and
//! the loop continues; the next exchange simply sees a shorter history.

use std::io::Write;
use std::time::Instant;

use console::style;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use palaver_core::history::{ConversationMemory, HistoryBackend};
use palaver_core::llm::LlmProvider;
use palaver_core::prompt::PromptTemplate;
use palaver_types::config::LlmConfig;
use palaver_types::llm::{CompletionRequest, Message, MessageRole, StreamEvent};
use palaver_types::turn::TurnRole;

use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

fn print_banner(session_id: &str, model: &str) {
    println!();
    println!(
        "  {} {}",
        style("Palaver").cyan().bold(),
        style(format!("({model})")).dim()
    );
    println!("  {} {}", style("Session:").dim(), style(session_id).dim());
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit.").dim()
    );
    println!();
}

fn thinking_spinner() -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Run one model exchange and return the full response text, or `None`
/// if the provider failed (already reported to the user).
async fn run_exchange<P: LlmProvider>(
    provider: &P,
    request: CompletionRequest,
    no_stream: bool,
) -> Option<String> {
    let spinner = thinking_spinner();
    let start_time = Instant::now();

    if no_stream {
        match provider.complete(&request).await {
            Ok(response) => {
                spinner.finish_and_clear();
                println!("\n  {} {}", style("AI >").cyan().bold(), response.content);
                tracing::debug!(
                    ms = start_time.elapsed().as_millis() as u64,
                    output_tokens = response.usage.output_tokens,
                    "exchange complete"
                );
                return Some(response.content);
            }
            Err(e) => {
                spinner.finish_and_clear();
                eprintln!("\n  {} Model error: {e}", style("!").red().bold());
                return None;
            }
        }
    }

    let mut stream = provider.stream(request);
    let mut full_response = String::new();
    let mut first_token_received = false;

    while let Some(event_result) = stream.next().await {
        match event_result {
            Ok(StreamEvent::TextDelta { text: delta, .. }) => {
                if !first_token_received {
                    spinner.finish_and_clear();
                    first_token_received = true;
                    print!("\n  {} ", style("AI >").cyan().bold());
                }
                print!("{delta}");
                let _ = std::io::stdout().flush();
                full_response.push_str(&delta);
            }
            Ok(StreamEvent::Done) => break,
            Ok(_) => {}
            Err(e) => {
                spinner.finish_and_clear();
                eprintln!("\n  {} Model error: {e}", style("!").red().bold());
                eprintln!("  {}", style("Type a message to retry, /exit to quit.").dim());
                return None;
            }
        }
    }

    if !first_token_received {
        spinner.finish_and_clear();
    }
    println!();
    Some(full_response)
}

/// Run the interactive chat loop until the user exits.
pub async fn run_chat_loop<B: HistoryBackend, P: LlmProvider>(
    memory: &ConversationMemory<B>,
    provider: &P,
    llm: &LlmConfig,
    no_stream: bool,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let template = PromptTemplate::default();

    print_banner(memory.session_id(), &llm.model);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => {
                            commands::print_help();
                        }
                        ChatCommand::History => match memory.all_turns(&cancel).await {
                            Ok(turns) if turns.is_empty() => {
                                println!("\n  {}\n", style("No stored conversation.").dim());
                            }
                            Ok(turns) => {
                                println!();
                                for turn in &turns {
                                    let label = match turn.role {
                                        TurnRole::Human => style("You").green().bold(),
                                        TurnRole::Ai => style("AI").cyan().bold(),
                                    };
                                    println!("  {} {}", label, turn.content);
                                }
                                println!();
                            }
                            Err(e) => {
                                eprintln!(
                                    "\n  {} Failed to read history: {e}\n",
                                    style("!").red().bold()
                                );
                            }
                        },
                        ChatCommand::Reset => match memory.reset(&cancel).await {
                            Ok(()) => {
                                println!("\n  {}\n", style("Conversation forgotten.").dim());
                            }
                            Err(e) => {
                                eprintln!(
                                    "\n  {} Failed to reset: {e}\n",
                                    style("!").red().bold()
                                );
                            }
                        },
                        ChatCommand::Clear => {
                            chat_input.clear();
                        }
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::Unknown(cmd_name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(cmd_name).dim()
                            );
                        }
                    }
                    continue;
                }

                // Read history up front; a failed read aborts the exchange
                // before the model is ever called.
                let history = match memory.all_turns(&cancel).await {
                    Ok(turns) => turns,
                    Err(e) => {
                        eprintln!(
                            "\n  {} Failed to read history: {e}\n",
                            style("!").red().bold()
                        );
                        continue;
                    }
                };

                let request = CompletionRequest {
                    model: llm.model.clone(),
                    messages: vec![Message {
                        role: MessageRole::User,
                        content: template.render(&history, &text),
                    }],
                    system: None,
                    max_tokens: llm.max_tokens,
                    temperature: llm.temperature,
                    stream: !no_stream,
                };

                let Some(response) = run_exchange(provider, request, no_stream).await else {
                    continue;
                };

                // Persist the exchange; a failed write only shortens what
                // the next prompt sees.
                if let Err(e) = memory.append_human_turn(text.as_str(), &cancel).await {
                    warn!(error = %e, "failed to store human turn");
                }
                if let Err(e) = memory.append_ai_turn(response.as_str(), &cancel).await {
                    warn!(error = %e, "failed to store ai turn");
                }
            }
        }
    }

    Ok(())
}
