//! Conversation management CLI commands: list, show, delete, clear.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use crate::state::AppState;

use super::chat::renderer::ChatRenderer;
use super::{clip, parse_id};

/// List stored conversations with title, date, length and preview.
///
/// # Examples
///
/// ```bash
/// dgpt sessions list
/// dgpt sessions list --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.chat_service.list_conversations().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style("dgpt chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Started").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Preview").fg(Color::White),
    ]);

    for conversation in &conversations {
        table.add_row(vec![
            Cell::new(conversation.id.to_string()).fg(Color::DarkGrey),
            Cell::new(&conversation.title).fg(Color::Cyan),
            Cell::new(conversation.timestamp.format("%Y-%m-%d %H:%M").to_string())
                .fg(Color::White),
            Cell::new(conversation.messages.len().to_string()).fg(Color::White),
            Cell::new(clip(&conversation.preview, 40)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(conversations.len()).bold(),
        if conversations.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print one stored conversation.
pub async fn show_session(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let session = state
        .chat_service
        .persistence()
        .load(&id)
        .await?
        .with_context(|| format!("Conversation '{id}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&session.title).cyan().bold());
    println!(
        "  {}",
        style(session.created_at.format("%Y-%m-%d %H:%M UTC")).dim()
    );
    if !session.summary.is_empty() {
        println!("  {} {}", style("Summary:").bold(), style(&session.summary).dim());
    }
    println!("  {}", style("---").dim());

    let renderer = ChatRenderer::new();
    for turn in &session.turns {
        renderer.print_turn(turn);
    }
    println!();

    Ok(())
}

/// Delete a conversation with confirmation.
///
/// # Examples
///
/// ```bash
/// dgpt sessions delete <id>
/// dgpt sessions delete <id> --force
/// ```
pub async fn delete_session(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let session = state
        .chat_service
        .persistence()
        .load(&id)
        .await?
        .with_context(|| format!("Conversation '{id}' not found"))?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete conversation '{}' ({} messages)? Its mood history goes with it.",
                style(&session.title).red().bold(),
                session.turns.len()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.chat_service.delete_conversation(&id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "id": id.to_string()})
        );
    } else {
        println!(
            "  {} Conversation '{}' deleted.",
            style("x").red().bold(),
            session.title
        );
    }

    Ok(())
}

/// Delete every stored conversation with confirmation.
pub async fn clear_sessions(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "{} This cannot be undone.",
                style("Delete ALL conversations and mood history?").red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.chat_service.delete_all().await?;

    if json {
        println!("{}", serde_json::json!({"deleted": removed}));
    } else {
        println!(
            "  {} Deleted {} conversation{}.",
            style("x").red().bold(),
            removed,
            if removed == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
