//! Interactive chat loop.
//!
//! Reads one line at a time, sends it through `ChatService`, and renders the
//! assistant turn plus any notices. Input is not read while a turn is in
//! flight; a spinner tracks the turn phase instead.

pub mod commands;
pub mod renderer;

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use divinegpt_core::chat::gate::TurnPhase;
use divinegpt_core::chat::processor::TurnOutcome;
use divinegpt_core::chat::service::{Notice, TurnReport};
use divinegpt_types::advisory::Tone;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::state::AppState;

use super::parse_id;
use commands::ChatCommand;
use renderer::ChatRenderer;

/// Tone from the `--tone` flag; unknown values fall back to neutral.
pub fn resolve_tone(arg: Option<&str>, default: Tone) -> Tone {
    match arg {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|e: String| {
            warn!("{e}, using neutral");
            Tone::Neutral
        }),
    }
}

pub fn phase_label(phase: TurnPhase) -> &'static str {
    match phase {
        TurnPhase::Sending => "sending...",
        TurnPhase::AwaitingAdvisor => "seeking guidance...",
        TurnPhase::Idle | TurnPhase::Resolved | TurnPhase::Degraded => "saving...",
    }
}

fn spinner(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        bar.set_style(template);
    }
    bar.set_message(phase_label(TurnPhase::Sending));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Run the interactive chat loop.
pub async fn run_chat(
    state: &AppState,
    resume: Option<&str>,
    tone: Option<&str>,
    json: bool,
) -> Result<()> {
    let service = &state.chat_service;
    let renderer = ChatRenderer::new();
    let mut tone = resolve_tone(tone, state.config.default_tone);

    if let Some(raw) = resume {
        let id = parse_id(raw)?;
        service
            .open_session(&id)
            .await?
            .with_context(|| format!("Conversation '{id}' not found"))?;
    }

    if !json {
        print_banner(state, &renderer, tone).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if !json {
            print!("  {} ", style("you>").green().bold());
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if let Some(command) = commands::parse(&line) {
            match command {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Exit => break,
                ChatCommand::New => {
                    service.start_new_session().await;
                    println!("  {}", style("Started a new conversation.").dim());
                }
                ChatCommand::History => {
                    let session = service.active_session().await.snapshot().await;
                    for turn in &session.turns {
                        renderer.print_turn(turn);
                    }
                }
                ChatCommand::Tone(next) => {
                    tone = next;
                    println!("  {} {}", style("Tone:").bold(), tone);
                }
                ChatCommand::Unknown(what) => {
                    println!(
                        "  {} Unknown command: {what}. Type /help for commands.",
                        style("?").yellow().bold()
                    );
                }
            }
            continue;
        }

        let bar = spinner(json);
        let send = service.send(&line, tone);
        tokio::pin!(send);
        let result = loop {
            tokio::select! {
                result = &mut send => break result,
                _ = tokio::time::sleep(Duration::from_millis(150)) => {
                    bar.set_message(phase_label(service.phase().await));
                }
            }
        };
        bar.finish_and_clear();

        match result {
            Ok(report) if json => print_json_report(&report)?,
            Ok(report) => render_report(&renderer, &report),
            Err(e) => eprintln!("  {} {e}", style("!").yellow().bold()),
        }
    }

    if !json {
        println!();
        println!("  {}", style("May you find peace. Goodbye.").dim());
    }
    Ok(())
}

async fn print_banner(state: &AppState, renderer: &ChatRenderer, tone: Tone) {
    let session = state.chat_service.active_session().await.snapshot().await;

    println!();
    println!("  {}", style("DivineGPT").cyan().bold());
    println!("  {} {}", style("Tone:").bold(), style(tone).dim());
    if session.id.is_some() {
        println!("  {} {}", style("Resuming:").bold(), style(&session.title).dim());
    }
    tracing::debug!(data_dir = %state.data_dir.display(), "Chat started");
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());

    if !session.turns.is_empty() {
        for turn in &session.turns {
            renderer.print_turn(turn);
        }
        println!();
    }
}

fn render_report(renderer: &ChatRenderer, report: &TurnReport) {
    match &report.outcome {
        TurnOutcome::Ignored => {}
        TurnOutcome::Superseded { .. } => {
            println!("  {}", style("That answer arrived after you left the conversation.").dim());
        }
        TurnOutcome::Resolved(turn) | TurnOutcome::Degraded { turn, .. } => {
            renderer.print_turn(&turn.assistant_turn);
        }
    }
    for notice in &report.notices {
        renderer.print_notice(notice);
    }
}

fn print_json_report(report: &TurnReport) -> Result<()> {
    let Some(turn) = report.outcome.completed() else {
        return Ok(());
    };
    let warnings: Vec<String> = report
        .notices
        .iter()
        .map(|notice| match notice {
            Notice::AdvisorDegraded { reason } => reason.to_string(),
            Notice::PersistenceFailed(err) => err.to_string(),
        })
        .collect();

    let value = serde_json::json!({
        "reply": turn.assistant_turn.content,
        "scripture": turn.assistant_turn.scripture_ref,
        "emotion": turn.emotion,
        "is_reframing": turn.assistant_turn.is_reframing,
        "degraded": report.outcome.is_degraded(),
        "session_id": report.persistence.session_id(),
        "warnings": warnings,
    });
    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}
