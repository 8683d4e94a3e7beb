//! Outbound request and inbound result types for the remote advisor.
//!
//! These are the pipeline-facing contracts. The wire shapes of the HTTP
//! gateway live next to the transport in `divinegpt-infra`.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::chat::{ScriptureRef, TurnRole};

/// Voice the advisor should answer in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Mature,
    #[default]
    Neutral,
    Genz,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Mature => write!(f, "mature"),
            Tone::Neutral => write!(f, "neutral"),
            Tone::Genz => write!(f, "genz"),
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mature" => Ok(Tone::Mature),
            "neutral" => Ok(Tone::Neutral),
            "genz" | "gen-z" | "gen_z" => Ok(Tone::Genz),
            other => Err(format!("invalid tone: '{other}'")),
        }
    }
}

/// One prior turn as seen by the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: TurnRole,
    pub content: String,
}

/// What the pipeline asks the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub query: String,
    pub tone: Tone,
    /// Oldest-first slice of prior turns.
    pub history_window: Vec<HistoryEntry>,
    pub prior_summary: String,
}

/// A validated advisor answer.
///
/// Real and fallback answers share this shape so downstream code stays uniform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub reply_text: String,
    pub scripture_ref: Option<ScriptureRef>,
    pub emotion: String,
    pub updated_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_roundtrip() {
        for tone in [Tone::Mature, Tone::Neutral, Tone::Genz] {
            let parsed: Tone = tone.to_string().parse().unwrap();
            assert_eq!(tone, parsed);
        }
    }

    #[test]
    fn test_tone_parse_is_case_insensitive() {
        assert_eq!("GenZ".parse::<Tone>().unwrap(), Tone::Genz);
        assert_eq!(" Mature ".parse::<Tone>().unwrap(), Tone::Mature);
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_tone_default_and_serde() {
        assert_eq!(Tone::default(), Tone::Neutral);
        assert_eq!(serde_json::to_string(&Tone::Genz).unwrap(), "\"genz\"");
    }
}
