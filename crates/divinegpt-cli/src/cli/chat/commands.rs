//! Slash command parsing for the chat loop.

use console::style;
use divinegpt_types::advisory::Tone;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Exit,
    /// Leave this conversation and start a fresh one.
    New,
    /// Reprint the turns of the active conversation.
    History,
    Tone(Tone),
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" => Some(ChatCommand::New),
        "/history" => Some(ChatCommand::History),
        "/tone" => match arg.parse::<Tone>() {
            Ok(tone) => Some(ChatCommand::Tone(tone)),
            Err(e) => Some(ChatCommand::Unknown(e)),
        },
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}            Show this help message", style("/help").cyan());
    println!("  {}             Start a new conversation", style("/new").cyan());
    println!("  {}         Show this conversation so far", style("/history").cyan());
    println!("  {}  Switch tone (mature, neutral, genz)", style("/tone <tone>").cyan());
    println!("  {}            End the chat", style("/exit").cyan());
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
