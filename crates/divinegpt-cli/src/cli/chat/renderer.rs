//! Terminal rendering for turns and turn notices.
//!
//! Assistant replies are rendered as markdown through `termimad`.

use console::style;
use divinegpt_core::chat::service::Notice;
use divinegpt_types::chat::{ScriptureRef, Turn, TurnRole};
use divinegpt_types::error::PersistError;
use termimad::MadSkin;

pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Yellow);
        Self { skin }
    }

    pub fn print_turn(&self, turn: &Turn) {
        match turn.role {
            TurnRole::User => {
                println!("  {} {}", style("you>").green().bold(), turn.content);
            }
            TurnRole::Assistant => self.print_assistant(turn),
        }
    }

    fn print_assistant(&self, turn: &Turn) {
        println!();
        if let Some(scripture) = &turn.scripture_ref {
            for line in scripture_lines(scripture) {
                println!("  {}", style(line).magenta());
            }
            println!();
        }
        print!("{}", self.skin.term_text(&turn.content));
        println!();
    }

    /// Transient warnings and recoverable errors shown after a turn.
    pub fn print_notice(&self, notice: &Notice) {
        match notice {
            Notice::AdvisorDegraded { reason } => {
                eprintln!(
                    "  {} {}",
                    style("!").yellow().bold(),
                    style(format!("The advisor is unavailable ({reason}); showing a fallback reply.")).yellow()
                );
            }
            Notice::PersistenceFailed(err) => {
                eprintln!(
                    "  {} {}",
                    style("x").red().bold(),
                    style(persistence_message(err)).red()
                );
            }
        }
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote, transliteration and source, one per line.
pub fn scripture_lines(scripture: &ScriptureRef) -> Vec<String> {
    let mut lines: Vec<String> = scripture
        .quote
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(transliteration) = &scripture.transliteration {
        lines.push(transliteration.trim().to_string());
    }
    lines.push(format!("-- {}", scripture.source.trim()));
    lines
}

pub fn persistence_message(err: &PersistError) -> String {
    match err {
        PersistError::Create(_) => {
            format!("Could not save this conversation ({err}). It is kept in memory until you exit.")
        }
        PersistError::Update { .. } => {
            format!("Could not save the latest turn ({err}). The stored copy is one turn behind.")
        }
    }
}
