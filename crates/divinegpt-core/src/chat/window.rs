//! Bounded context window for advisor requests.
//!
//! The advisor sees the last `window_size` prior turns plus the rolling
//! summary. A meta-request whose window would carry fewer than
//! `MIN_META_CONTEXT` turns gets the entire history instead.

use divinegpt_types::advisory::{AdvisoryRequest, HistoryEntry, Tone};
use divinegpt_types::chat::Turn;
use divinegpt_types::config::DEFAULT_HISTORY_WINDOW;

/// Below this many windowed turns a meta-request is widened to full history.
pub const MIN_META_CONTEXT: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct ContextWindower {
    window_size: usize,
}

impl ContextWindower {
    /// Create a windower; a zero window is raised to one.
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Oldest-first history slice for the given prior turns.
    pub fn history_window(&self, prior_turns: &[Turn], is_meta_request: bool) -> Vec<HistoryEntry> {
        let take = self.window_size.min(prior_turns.len());
        let windowed = &prior_turns[prior_turns.len() - take..];

        let selected = if is_meta_request && windowed.len() < MIN_META_CONTEXT {
            prior_turns
        } else {
            windowed
        };

        selected
            .iter()
            .map(|turn| HistoryEntry {
                role: turn.role,
                content: turn.content.clone(),
            })
            .collect()
    }

    /// Assemble the outbound request. The summary is passed through untouched.
    pub fn build(
        &self,
        query: &str,
        tone: Tone,
        prior_turns: &[Turn],
        prior_summary: &str,
        is_meta_request: bool,
    ) -> AdvisoryRequest {
        AdvisoryRequest {
            query: query.to_string(),
            tone,
            history_window: self.history_window(prior_turns, is_meta_request),
            prior_summary: prior_summary.to_string(),
        }
    }
}

impl Default for ContextWindower {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divinegpt_types::chat::TurnRole;

    fn turns(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("q{i}"))
                } else {
                    Turn::assistant(format!("a{i}"), None, false)
                }
            })
            .collect()
    }

    #[test]
    fn test_short_history_is_sent_whole() {
        let history = ContextWindower::default().history_window(&turns(4), false);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "q0");
        assert_eq!(history[0].role, TurnRole::User);
    }

    #[test]
    fn test_long_history_keeps_last_ten_oldest_first() {
        let history = ContextWindower::default().history_window(&turns(25), false);
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].content, "a15");
        assert_eq!(history[9].content, "q24");
    }

    #[test]
    fn test_meta_request_with_full_window_is_not_widened() {
        let history = ContextWindower::default().history_window(&turns(12), true);
        assert_eq!(history.len(), 10);
    }

    #[test]
    fn test_meta_request_on_empty_session_is_empty() {
        let history = ContextWindower::default().history_window(&[], true);
        assert!(history.is_empty());
    }

    #[test]
    fn test_meta_request_widens_thin_window() {
        let windower = ContextWindower::new(1);
        let prior = turns(6);

        assert_eq!(windower.history_window(&prior, false).len(), 1);
        assert_eq!(windower.history_window(&prior, true).len(), 6);
    }

    #[test]
    fn test_window_bound_holds_for_all_lengths() {
        let windower = ContextWindower::default();
        for n in 0..30 {
            let prior = turns(n);
            assert!(windower.history_window(&prior, false).len() <= 10);
            let meta = windower.history_window(&prior, true).len();
            assert!(meta <= 10 || meta == n);
        }
    }

    #[test]
    fn test_build_passes_summary_through() {
        let request = ContextWindower::default().build(
            "clarify please",
            Tone::Genz,
            &turns(3),
            "S0",
            true,
        );
        assert_eq!(request.prior_summary, "S0");
        assert_eq!(request.query, "clarify please");
        assert_eq!(request.tone, Tone::Genz);
        assert_eq!(request.history_window.len(), 3);
    }

    #[test]
    fn test_zero_window_is_raised_to_one() {
        assert_eq!(ContextWindower::new(0).window_size(), 1);
    }
}
