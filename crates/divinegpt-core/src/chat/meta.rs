//! Meta-request detection.
//!
//! A meta-request asks the advisor to clarify or rephrase an earlier answer.

/// Phrases that mark a message as a meta-request (matched case-insensitively).
pub const META_REQUEST_PHRASES: [&str; 7] = [
    "reframe",
    "explain differently",
    "clarify",
    "simplify",
    "elaborate",
    "what do you mean",
    "can you rephrase",
];

pub fn is_meta_request(content: &str) -> bool {
    let lowered = content.to_lowercase();
    META_REQUEST_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
