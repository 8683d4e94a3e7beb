//! Emotional journey view: the mood recorded for each resolved turn.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use divinegpt_types::journal::mood_score;

use crate::state::AppState;

use super::clip;

const MOOD_BAR_WIDTH: usize = 10;

/// Bar of `#` proportional to a 0.0..=1.0 mood score.
pub fn mood_bar(score: f32) -> String {
    let filled = (score.clamp(0.0, 1.0) * MOOD_BAR_WIDTH as f32).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(MOOD_BAR_WIDTH - filled))
}

fn mood_color(score: f32) -> Color {
    if score >= 0.6 {
        Color::Green
    } else if score >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Show the journal, oldest first.
///
/// # Examples
///
/// ```bash
/// dgpt journal
/// dgpt journal --json
/// ```
pub async fn show_journal(state: &AppState, json: bool) -> Result<()> {
    let entries = state.chat_service.journal_history().await?;

    if json {
        let values: Vec<_> = entries
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "timestamp": entry.timestamp,
                    "emotion": entry.emotion,
                    "mood_score": mood_score(&entry.emotion),
                    "message": entry.source_text,
                    "conversation_id": entry.session_id,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No mood history yet. It fills in as you chat.",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("When").fg(Color::White),
        Cell::new("Emotion").fg(Color::White),
        Cell::new("Mood").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for entry in &entries {
        let score = mood_score(&entry.emotion);
        table.add_row(vec![
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M").to_string()).fg(Color::White),
            Cell::new(&entry.emotion).fg(Color::Cyan),
            Cell::new(mood_bar(score)).fg(mood_color(score)),
            Cell::new(clip(&entry.source_text, 50)).fg(Color::DarkGrey),
        ]);
    }

    let average = entries.iter().map(|e| mood_score(&e.emotion)).sum::<f32>() / entries.len() as f32;

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} entries, average mood {}",
        style(entries.len()).bold(),
        style(format!("{average:.2}")).bold()
    );
    println!();

    Ok(())
}
