//! Conversation session, turn, and stored record types for DivineGPT.
//!
//! A `Session` is the in-memory conversation: an append-only list of turns,
//! the rolling summary handed to the advisor, and an identity that only the
//! conversation repository assigns. `ConversationRecord` is the durable shape
//! of the same conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// A scripture passage attached to an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureRef {
    /// The verse itself (usually Sanskrit).
    #[serde(alias = "text")]
    pub quote: String,
    /// Where the verse comes from, or its rendered meaning.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
}

/// A single message within a session.
///
/// Stored as JSON inside the conversation record, with `created_at`
/// serialized as an ISO-8601 `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub id: Uuid,
    pub role: TurnRole,
    pub content: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(
        rename = "scriptureReference",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scripture_ref: Option<ScriptureRef>,
    #[serde(default)]
    pub is_reframing: bool,
}

impl Turn {
    /// Build a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: TurnRole::User,
            content: content.into(),
            created_at: Utc::now(),
            scripture_ref: None,
            is_reframing: false,
        }
    }

    /// Build an assistant turn stamped with the current time.
    pub fn assistant(
        content: impl Into<String>,
        scripture_ref: Option<ScriptureRef>,
        is_reframing: bool,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: TurnRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
            scripture_ref,
            is_reframing,
        }
    }
}

/// An in-memory conversation.
///
/// `id` stays `None` until the conversation repository first persists the
/// session; once set it never changes. `summary` is the most recent
/// `updated_summary` returned by the advisor, or empty before any resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Option<Uuid>,
    pub title: String,
    pub turns: Vec<Turn>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A fresh, unpersisted session with no turns.
    pub fn new() -> Self {
        Self {
            id: None,
            title: String::new(),
            turns: Vec::new(),
            summary: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A conversation as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub messages: Vec<Turn>,
    pub preview: String,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
}

impl ConversationRecord {
    /// Rehydrate the stored record into an in-memory session.
    pub fn into_session(self) -> Session {
        Session {
            id: Some(self.id),
            title: self.title,
            turns: self.messages,
            summary: self.summary,
            created_at: self.timestamp,
        }
    }
}

/// Insert payload for a conversation that has no identity yet.
///
/// The repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: String,
    pub title: String,
    pub messages: Vec<Turn>,
    pub preview: String,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_roundtrip() {
        for role in [TurnRole::User, TurnRole::Assistant] {
            let parsed: TurnRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("system".parse::<TurnRole>().is_err());
    }

    #[test]
    fn test_turn_json_shape() {
        let turn = Turn::assistant(
            "Act without attachment.",
            Some(ScriptureRef {
                quote: "karmaṇy evādhikāras te".to_string(),
                source: "Bhagavad Gita 2.47".to_string(),
                transliteration: None,
            }),
            true,
        );
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["isReframing"], true);
        assert_eq!(json["scriptureReference"]["source"], "Bhagavad Gita 2.47");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
        assert!(json["scriptureReference"].get("transliteration").is_none());
    }

    #[test]
    fn test_turn_reads_legacy_shape() {
        let json = r#"{
            "id": "0190b1a0-0000-7000-8000-000000000001",
            "role": "assistant",
            "content": "Peace comes from within.",
            "timestamp": "2025-04-01T10:00:00.000Z",
            "scriptureReference": { "text": "verse", "source": "meaning" }
        }"#;
        let turn: Turn = serde_json::from_str(json).unwrap();
        assert!(!turn.is_reframing);
        assert_eq!(turn.scripture_ref.unwrap().quote, "verse");
    }

    #[test]
    fn test_new_session_is_unpersisted() {
        let session = Session::new();
        assert!(session.id.is_none());
        assert!(!session.is_persisted());
        assert!(session.summary.is_empty());
        assert!(session.turns.is_empty());
    }

    #[test]
    fn test_record_into_session_keeps_identity() {
        let id = Uuid::now_v7();
        let record = ConversationRecord {
            id,
            user_id: "local".to_string(),
            title: "Inner peace".to_string(),
            messages: vec![Turn::user("How can I find inner peace?")],
            preview: "How can I find inner peace?".to_string(),
            timestamp: Utc::now(),
            summary: "S1".to_string(),
        };
        let session = record.into_session();
        assert_eq!(session.id, Some(id));
        assert_eq!(session.summary, "S1");
        assert_eq!(session.turns.len(), 1);
    }
}
