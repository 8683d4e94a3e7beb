//! Gateway wire types for `POST /ask`.
//!
//! Request and response shapes are internal to the transport. Responses are
//! decoded strictly: `llm_response.response`, `emotion` and `new_summary`
//! are required, and anything that does not decode is a malformed payload.

use divinegpt_types::advisory::{AdvisoryRequest, AdvisoryResult};
use divinegpt_types::chat::ScriptureRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub query: String,
    pub user_type: String,
    pub history: Vec<AskHistoryItem>,
    pub previous_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskHistoryItem {
    pub role: String,
    pub content: String,
}

impl From<&AdvisoryRequest> for AskRequest {
    fn from(request: &AdvisoryRequest) -> Self {
        Self {
            query: request.query.clone(),
            user_type: request.tone.to_string(),
            history: request
                .history_window
                .iter()
                .map(|entry| AskHistoryItem {
                    role: entry.role.to_string(),
                    content: entry.content.clone(),
                })
                .collect(),
            previous_summary: request.prior_summary.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub user_query: String,
    #[serde(default)]
    pub retrieved_shlokas: Vec<RetrievedShloka>,
    pub llm_response: LlmResponse,
}

/// A verse the retriever matched. The gateway passes retriever metadata
/// through untouched, so every field may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrievedShloka {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub chapter: Option<u32>,
    #[serde(default)]
    pub verse: Option<u32>,
    #[serde(default)]
    pub shloka: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub eng_meaning: Option<String>,
    #[serde(default)]
    pub hin_meaning: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub shloka: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub shloka_summary: Option<String>,
    pub response: String,
    #[serde(default)]
    pub reflection: Option<String>,
    pub emotion: String,
    pub new_summary: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl AskResponse {
    /// Scripture attached to the answer, if the gateway supplied a verse.
    pub fn scripture_ref(&self) -> Option<ScriptureRef> {
        let first = self.retrieved_shlokas.first();

        let quote = non_empty(self.llm_response.shloka.as_deref())
            .or_else(|| first.and_then(|s| non_empty(s.shloka.as_deref())))?;

        let source = match non_empty(self.llm_response.meaning.as_deref()) {
            Some(meaning) => meaning.to_string(),
            None => match first.and_then(|s| s.chapter.zip(s.verse)) {
                Some((chapter, verse)) => format!("Bhagavad Gita {chapter}.{verse}"),
                None => "Bhagavad Gita".to_string(),
            },
        };

        Some(ScriptureRef {
            quote: quote.to_string(),
            source,
            transliteration: first
                .and_then(|s| non_empty(s.transliteration.as_deref()))
                .map(str::to_string),
        })
    }

    pub fn into_result(self) -> AdvisoryResult {
        let scripture_ref = self.scripture_ref();
        AdvisoryResult {
            reply_text: self.llm_response.response,
            scripture_ref,
            emotion: self.llm_response.emotion,
            updated_summary: self.llm_response.new_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divinegpt_types::advisory::{HistoryEntry, Tone};
    use divinegpt_types::chat::TurnRole;
    use serde_json::json;

    #[test]
    fn test_ask_request_wire_shape() {
        let request = AdvisoryRequest {
            query: "what do you mean?".to_string(),
            tone: Tone::Genz,
            history_window: vec![HistoryEntry {
                role: TurnRole::Assistant,
                content: "Act without attachment.".to_string(),
            }],
            prior_summary: "S1".to_string(),
        };

        let value = serde_json::to_value(AskRequest::from(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "query": "what do you mean?",
                "user_type": "genz",
                "history": [{"role": "assistant", "content": "Act without attachment."}],
                "previous_summary": "S1"
            })
        );
    }

    #[test]
    fn test_full_response_maps_to_result() {
        let response: AskResponse = serde_json::from_value(json!({
            "user_query": "How can I find inner peace?",
            "retrieved_shlokas": [{
                "id": "BG2.47",
                "chapter": 2,
                "verse": 47,
                "shloka": "कर्मण्येवाधिकारस्ते",
                "transliteration": "karmaṇy-evādhikāras te",
                "eng_meaning": "You have a right to your actions alone.",
                "hin_meaning": null
            }],
            "llm_response": {
                "shloka": "कर्मण्येवाधिकारस्ते",
                "meaning": "You have a right to your actions alone.",
                "shloka_summary": "Focus on action.",
                "response": "Peace comes from letting go of outcomes.",
                "reflection": "What outcome are you holding on to?",
                "emotion": "anxious",
                "new_summary": "User seeks peace."
            }
        }))
        .unwrap();

        let result = response.into_result();
        assert_eq!(result.reply_text, "Peace comes from letting go of outcomes.");
        assert_eq!(result.emotion, "anxious");
        assert_eq!(result.updated_summary, "User seeks peace.");

        let scripture = result.scripture_ref.unwrap();
        assert_eq!(scripture.quote, "कर्मण्येवाधिकारस्ते");
        assert_eq!(scripture.source, "You have a right to your actions alone.");
        assert_eq!(
            scripture.transliteration.as_deref(),
            Some("karmaṇy-evādhikāras te")
        );
    }

    #[test]
    fn test_missing_new_summary_is_rejected() {
        let decoded = serde_json::from_value::<AskResponse>(json!({
            "user_query": "q",
            "retrieved_shlokas": [],
            "llm_response": {"response": "r", "emotion": "calm"}
        }));
        assert!(decoded.is_err());
    }

    #[test]
    fn test_source_falls_back_to_chapter_and_verse() {
        let response: AskResponse = serde_json::from_value(json!({
            "retrieved_shlokas": [{"chapter": 6, "verse": 5, "shloka": "उद्धरेदात्मनात्मानं"}],
            "llm_response": {"response": "r", "emotion": "calm", "new_summary": "S"}
        }))
        .unwrap();

        let scripture = response.scripture_ref().unwrap();
        assert_eq!(scripture.quote, "उद्धरेदात्मनात्मानं");
        assert_eq!(scripture.source, "Bhagavad Gita 6.5");
        assert!(scripture.transliteration.is_none());
    }

    #[test]
    fn test_no_verse_means_no_scripture() {
        let response: AskResponse = serde_json::from_value(json!({
            "llm_response": {"response": "r", "emotion": "calm", "new_summary": "S", "shloka": "  "}
        }))
        .unwrap();
        assert!(response.scripture_ref().is_none());
    }
}
