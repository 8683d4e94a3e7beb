//! DivineGPT terminal client entry point.
//!
//! Binary name: `dgpt`
//!
//! Parses CLI arguments, initializes logging, the database and the chat
//! service, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use divinegpt_observe::tracing_setup::{init_tracing, level_for_verbosity, shutdown_tracing};

use cli::{Cli, Commands, SessionCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(level_for_verbosity(cli.verbose, cli.quiet), cli.otel) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    match cli.command {
        Commands::Chat { resume, tone } => {
            cli::chat::run_chat(&state, resume.as_deref(), tone.as_deref(), cli.json).await?;
        }

        Commands::Sessions { action } => match action {
            SessionCommand::List => {
                cli::session::list_sessions(&state, cli.json).await?;
            }
            SessionCommand::Show { id } => {
                cli::session::show_session(&state, &id, cli.json).await?;
            }
            SessionCommand::Delete { id, force } => {
                cli::session::delete_session(&state, &id, force, cli.json).await?;
            }
            SessionCommand::Clear { force } => {
                cli::session::clear_sessions(&state, force, cli.json).await?;
            }
        },

        Commands::Journal => {
            cli::journal::show_journal(&state, cli.json).await?;
        }
    }

    Ok(())
}
