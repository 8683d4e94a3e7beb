//! CLI command definitions for the `dgpt` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod journal;
pub mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Guidance from the Bhagavad Gita, in your terminal.
#[derive(Parser)]
#[command(name = "dgpt", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation.
    Chat {
        /// Resume a stored conversation by ID.
        #[arg(long)]
        resume: Option<String>,

        /// Voice of the answers: mature, neutral or genz.
        #[arg(long)]
        tone: Option<String>,
    },

    /// Browse and manage stored conversations.
    #[command(alias = "session")]
    Sessions {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Show your emotional journey across conversations.
    Journal,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List stored conversations, newest first.
    #[command(alias = "ls")]
    List,

    /// Print a stored conversation.
    Show {
        /// Conversation ID.
        id: String,
    },

    /// Delete one conversation.
    #[command(alias = "rm")]
    Delete {
        /// Conversation ID.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Delete every stored conversation.
    Clear {
        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Parse a conversation ID argument.
pub(crate) fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).with_context(|| format!("'{id}' is not a valid conversation ID"))
}

/// Clip `text` to `max` characters, appending "..." when shortened.
pub(crate) fn clip(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() > max {
        let head: String = single_line.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        single_line
    }
}
