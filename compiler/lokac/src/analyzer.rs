//! Semantic analyzer collaborator.
//!
//! The analyzer gives a confidence-scored reading of a fragment. The front
//! door trusts it only at or above the caller's confidence threshold, and
//! then reports the result as `hybrid`.

/// A confidence-scored interpretation of a fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    /// The command the fragment starts with, if it starts with one.
    pub command: Option<String>,
    /// In `[0, 1]`.
    pub confidence: f64,
}

pub trait SemanticAnalyzer: Send + Sync {
    /// Analyze `source` written in `language`. `None` means no opinion.
    fn analyze(&self, source: &str, language: &str) -> Option<Analysis>;
}

/// Words that open a command or feature in canonical LokaScript.
const COMMAND_WORDS: &[&str] = &[
    "add", "break", "call", "continue", "decrement", "def", "exit", "for", "get", "halt", "if",
    "increment", "log", "on", "put", "remove", "repeat", "return", "set", "throw", "toggle",
    "wait",
];

/// Recognizes fragments by their leading command word.
///
/// A known command word is a confident reading; a fragment that opens with
/// anything else (a bare expression) gets no opinion.
#[derive(Copy, Clone, Debug, Default)]
pub struct CommandAnalyzer;

impl CommandAnalyzer {
    const CONFIDENCE: f64 = 0.9;
}

impl SemanticAnalyzer for CommandAnalyzer {
    fn analyze(&self, source: &str, _language: &str) -> Option<Analysis> {
        let first = source
            .split_whitespace()
            .next()?
            .trim_end_matches(|c: char| !c.is_alphanumeric());
        COMMAND_WORDS.contains(&first).then(|| Analysis {
            command: Some(first.to_string()),
            confidence: Self::CONFIDENCE,
        })
    }
}
