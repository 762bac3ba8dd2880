//! Interactive mentor for Oracle SCM business flows.
//!
//! This binary provides a streaming REPL interface that teaches one Oracle
//! supply-chain flow per session, backed by the Gemini API.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings (Procure-to-Pay)
//! geminius-mentor
//!
//! # Pick a different flow
//! geminius-mentor --flow O2C
//!
//! # Specify a model
//! geminius-mentor --model gemini-2.5-pro
//!
//! # Disable colors (useful for piping output)
//! geminius-mentor --no-color
//! ```
//!
//! The API key is read from `GEMINI_API_KEY`; if the variable is unset the
//! tool prompts for it before anything else happens. It never appears on
//! the command line.
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/flow <name>` - Switch business flow
//! - `/steps` - Show the ordered steps of the current flow
//! - `/model <name>` - Change the model
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use geminius::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use geminius::{Flow, Gemini, Model};

/// Main entry point for the geminius-mentor application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("geminius-mentor [OPTIONS]");
    let config = match ChatConfig::try_from(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let use_color = config.use_color;

    let mut rl = DefaultEditor::new()?;
    let api_key = resolve_api_key(&mut rl)?;

    let client = Gemini::new(Some(api_key))?;

    // Validate the credential and model before entering the loop. The
    // message is deliberately generic; the key itself is never echoed.
    if client.get_model(&config.model).await.is_err() {
        eprintln!("Failed to initialize the Gemini client. Check your API key and model name.");
        std::process::exit(1);
    }

    let mut session = ChatSession::new(client, config);

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));
    let mut renderer = PlainTextRenderer::with_color(use_color).with_interrupt(interrupted.clone());

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!(
        "Oracle SCM Mentor (model: {}, flow: {})",
        session.model(),
        session.flow().label()
    );
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Flow(name) => match name.parse::<Flow>() {
                            Ok(flow) => {
                                session.set_flow(flow);
                                renderer
                                    .print_info(&format!("Flow changed to: {}", flow.label()));
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Steps => {
                            print_steps(session.flow());
                        }
                        ChatCommand::Model(model_name) => {
                            let model = model_name
                                .parse()
                                .unwrap_or_else(|_| Model::Custom(model_name.clone()));
                            session.set_model(model);
                            renderer.print_info(&format!("Model changed to: {}", model_name));
                        }
                        ChatCommand::MaxTokens(value) => {
                            session.set_max_tokens(value);
                            renderer.print_info(&format!("max_tokens set to {value}"));
                        }
                        ChatCommand::Temperature(value) => {
                            session.set_temperature(Some(value));
                            renderer.print_info(&format!("temperature set to {:.2}", value));
                        }
                        ChatCommand::ClearTemperature => {
                            session.set_temperature(None);
                            renderer.print_info("temperature reset to model default");
                        }
                        ChatCommand::TopP(value) => {
                            session.set_top_p(Some(value));
                            renderer.print_info(&format!("top_p set to {:.2}", value));
                        }
                        ChatCommand::ClearTopP => {
                            session.set_top_p(None);
                            renderer.print_info("top_p reset to model default");
                        }
                        ChatCommand::TopK(value) => {
                            session.set_top_k(Some(value));
                            renderer.print_info(&format!("top_k set to {value}"));
                        }
                        ChatCommand::ClearTopK => {
                            session.set_top_k(None);
                            renderer.print_info("top_k reset to model default");
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API
                println!("Mentor:");
                if let Err(e) = session.send_streaming(line, &mut renderer).await {
                    renderer.print_error(&e.to_string());
                    if e.is_transient() {
                        renderer.print_info("This looks temporary; try again in a moment.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Resolves the API key from the environment or an interactive prompt.
///
/// An empty key is a hard error: no request is ever attempted without one.
fn resolve_api_key(rl: &mut DefaultEditor) -> Result<String, Box<dyn std::error::Error>> {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        let key = key.trim().to_string();
        if !key.is_empty() {
            return Ok(key);
        }
    }

    println!("GEMINI_API_KEY is not set.");
    let key = rl.readline("Enter your Gemini API key: ")?;
    let key = key.trim().to_string();
    if key.is_empty() {
        eprintln!("An API key is required to start a session.");
        std::process::exit(1);
    }
    Ok(key)
}

fn print_steps(flow: Flow) {
    println!("    {} steps:", flow.label());
    for (i, step) in flow.steps().iter().enumerate() {
        println!("      {}. {}", i + 1, step);
    }
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Flow: {}", stats.flow.label());
    println!("      Turns: {}", stats.turn_count);
    println!("      Max tokens: {}", stats.max_tokens);
    println!("      Temperature: {}", describe_float(stats.temperature));
    println!("      Top-p: {}", describe_float(stats.top_p));
    println!("      Top-k: {}", describe_top_k(stats.top_k));
    println!(
        "      Total tokens: {} in / {} out ({} requests)",
        stats.total_prompt_tokens, stats.total_reply_tokens, stats.total_requests
    );
    if let Some(input) = stats.last_turn_prompt_tokens {
        let output = stats.last_turn_reply_tokens.unwrap_or(0);
        println!("      Last turn tokens: {input} in / {output} out");
    }
}

fn print_config(session: &ChatSession) {
    let stats = session.stats();
    println!("    Current Configuration:");
    println!("      Model: {}", stats.model);
    println!("      Flow: {}", stats.flow.label());
    println!("      Max tokens: {}", stats.max_tokens);
    println!("      Temperature: {}", describe_float(stats.temperature));
    println!("      Top-p: {}", describe_float(stats.top_p));
    println!("      Top-k: {}", describe_top_k(stats.top_k));
}

fn describe_float(value: Option<f32>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "default".to_string())
}

fn describe_top_k(value: Option<u32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "default".to_string())
}
