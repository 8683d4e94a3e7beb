//! The fixed advisory used when the real advisor is unreachable or untrusted.

use divinegpt_types::advisory::AdvisoryResult;
use divinegpt_types::chat::ScriptureRef;

pub const FALLBACK_REPLY: &str = "Our services are currently in meditation. Please try again soon.";

pub const FALLBACK_EMOTION: &str = "calm";

const FALLBACK_SHLOKA: &str = "कार्पण्यदोषोपहतस्वभावः\nपृच्छामि त्वां धर्मसम्मूढचेताः";

const FALLBACK_TRANSLITERATION: &str =
    "kārpaṇya-doṣopahata-svabhāvaḥ\npṛcchāmi tvāṁ dharma-sammūḍha-cetāḥ";

const FALLBACK_SOURCE: &str = "Bhagavad Gita 2.7";

/// Scripture shown alongside the fallback reply.
pub fn fallback_scripture() -> ScriptureRef {
    ScriptureRef {
        quote: FALLBACK_SHLOKA.to_string(),
        source: FALLBACK_SOURCE.to_string(),
        transliteration: Some(FALLBACK_TRANSLITERATION.to_string()),
    }
}

/// Build the fallback advisory for a request.
///
/// The summary is carried over unchanged so a failed call never resets context.
pub fn fallback_result(prior_summary: &str) -> AdvisoryResult {
    AdvisoryResult {
        reply_text: FALLBACK_REPLY.to_string(),
        scripture_ref: Some(fallback_scripture()),
        emotion: FALLBACK_EMOTION.to_string(),
        updated_summary: prior_summary.to_string(),
    }
}
