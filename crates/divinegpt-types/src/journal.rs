//! Emotional journal entries.
//!
//! The journal is an analytics side channel: one entry per resolved turn,
//! tagged with the emotion the advisor inferred and the session it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    /// The user text the emotion was inferred from.
    pub source_text: String,
    pub emotion: String,
    pub session_id: Uuid,
}

/// Map an emotion tag onto a 0.0..=1.0 mood score for charting.
///
/// Unknown tags sit in the middle.
pub fn mood_score(emotion: &str) -> f32 {
    match emotion.trim().to_lowercase().as_str() {
        "joy" => 1.0,
        "happy" => 0.8,
        "calm" => 0.6,
        "neutral" => 0.5,
        "anxious" => 0.3,
        "sad" => 0.2,
        "angry" => 0.0,
        _ => 0.5,
    }
}
