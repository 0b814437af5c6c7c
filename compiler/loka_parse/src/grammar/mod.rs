//! Grammar productions, split by level.
//!
//! - `command`: command sequences, blocks and features
//! - `expr`: expressions by precedence

mod command;
mod expr;

/// Words that end or separate a block and so never start an expression.
pub(crate) const BLOCK_WORDS: &[&str] = &["then", "end", "else"];

/// Words that introduce a built-in command or feature.
pub(crate) const COMMAND_WORDS: &[&str] = &[
    "set", "put", "increment", "decrement", "if", "repeat", "for", "return", "exit", "halt",
    "break", "continue", "throw", "call", "get", "def", "on",
];

/// Commands resolved through the command registry at evaluation time.
pub(crate) const REGISTRY_COMMANDS: &[&str] = &["log", "add", "remove", "toggle", "wait"];

/// Prepositions that introduce a registry command modifier.
pub(crate) const PREPOSITIONS: &[&str] =
    &["to", "from", "into", "on", "with", "by", "at", "for"];

/// Words that may not follow a possessive (`my x`), because they continue
/// the surrounding expression or command instead.
pub(crate) const NON_PROPERTY_WORDS: &[&str] = &[
    "then", "end", "else", "and", "or", "is", "in", "to", "into", "from", "match", "matches",
    "contains", "mod", "by", "with", "on", "at", "for", "times",
];

pub(crate) fn is_command_word(word: &str) -> bool {
    COMMAND_WORDS.contains(&word) || REGISTRY_COMMANDS.contains(&word)
}
