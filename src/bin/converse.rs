//! Interactive chat client for OpenAI-style chat completion APIs.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with the default config file
//! converse
//!
//! # Override the model and supply context files
//! converse --model gpt-4 notes.md todo.txt
//!
//! # Override the API key
//! converse --key sk-...
//! ```
//!
//! While chatting:
//! - `/stats` - Show tokens used and estimated cost
//! - `/clear` - Clear conversation history
//! - `/help`  - Show available commands
//! - `/quit`  - Exit (Ctrl-D also exits)
//!
//! In multiline mode a trailing backslash continues the entry on the
//! next line.

use std::path::PathBuf;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use converse::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, InputAction, PlainTextRenderer, Renderer, Turn,
    help_text, triage_input,
};
use converse::config::{FileConfig, default_config_path, default_history_path};
use converse::{API_KEY_ENV, Error, OpenAi};

/// Main entry point for the converse application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = ChatArgs::from_command_line_relaxed("converse [OPTIONS] [CONTEXT-FILE ...]");
    let mut renderer = PlainTextRenderer::new();

    let config_path = match &args.config {
        Some(path) => PathBuf::from(path),
        None => default_config_path()?,
    };
    let (file_config, created) = FileConfig::load_or_init(&config_path)?;
    if created {
        renderer.print_info(&format!(
            "New config file initialized: {}",
            config_path.display()
        ));
    }

    let env_key = std::env::var(API_KEY_ENV).ok();
    let config = ChatConfig::resolve(file_config, &args, env_key);
    let Some(api_key) = config.api_key.clone() else {
        return Err(Box::new(Error::config(
            "no API key configured; set api-key in the config file, \
             OPENAI_API_KEY in the environment, or pass --key",
        )) as Box<dyn std::error::Error>);
    };

    let client = OpenAi::new(Some(api_key))?;
    let multiline = config.multiline;
    let model = config.model.clone();
    let mut session = ChatSession::new(client, config);

    // --context first, then free arguments, in the order supplied.
    for path in args.context.iter().chain(free.iter()) {
        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::io(format!("failed to read context file {path}"), err))?;
        session.add_context(text.trim());
        renderer.print_info(&format!("Context file: {path}"));
    }

    let mut rl = DefaultEditor::new()?;
    let history_path = default_history_path();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    println!("converse (model: {model})");
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let prompt = format!("[{}] >>> ", session.total_tokens());

        match read_input(&mut rl, &prompt, multiline) {
            Ok(line) => match triage_input(&line) {
                InputAction::Nothing => continue,
                InputAction::Command(cmd) => {
                    let _ = rl.add_history_entry(line.trim());
                    match cmd {
                        ChatCommand::Quit => {
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Stats => {
                            print_stats(&session, &mut renderer);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                }
                InputAction::Send(text) => {
                    let _ = rl.add_history_entry(text.as_str());
                    match session.send(&text).await {
                        Turn::Reply(reply) => {
                            renderer.print_reply(&reply);
                        }
                        Turn::Retry(err) => {
                            renderer.print_error(&format!("{err}, try again..."));
                        }
                        Turn::Fatal(err) => {
                            renderer.print_error(&err.to_string());
                            break;
                        }
                    }
                }
            },
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at the prompt - re-prompt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }

    // The usage/cost summary is emitted exactly once, on every exit path.
    match session.summary() {
        Ok(summary) => println!("\n{summary}"),
        Err(err) => renderer.print_error(&err.to_string()),
    }

    Ok(())
}

/// Reads one entry. In multiline mode a trailing backslash continues the
/// entry on the next line.
fn read_input(rl: &mut DefaultEditor, prompt: &str, multiline: bool) -> rustyline::Result<String> {
    let mut line = rl.readline(prompt)?;
    if multiline {
        while line.ends_with('\\') {
            line.pop();
            line.push('\n');
            line.push_str(&rl.readline("... ")?);
        }
    }
    Ok(line)
}

fn print_stats(session: &ChatSession, renderer: &mut dyn Renderer) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Tokens: {} prompt / {} completion",
        stats.prompt_tokens, stats.completion_tokens
    );
    match session.cost() {
        Ok(cost) => println!("      Estimated cost: ${cost}"),
        Err(err) => renderer.print_error(&err.to_string()),
    }
}
