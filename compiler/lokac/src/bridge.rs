//! Grammar bridge collaborator: non-English source to canonical LokaScript.
//!
//! A bridge either compiles straight to an AST (the direct path) or hands
//! back canonical-language text for the regular parser. `KeywordBridge` is
//! the built-in bridge: a per-language keyword dictionary that only ever
//! produces fallback text.

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use loka_ir::Node;
use rustc_hash::FxHashMap;

/// What a bridge made of one fragment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BridgeOutput {
    pub ast: Option<Node>,
    pub used_direct_path: bool,
    pub confidence: f64,
    /// Canonical-language text to parse when there is no direct AST.
    pub fallback_text: Option<String>,
}

/// Why a bridge declined.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("no grammar for language `{0}`")]
    UnsupportedLanguage(String),
    #[error("{0}")]
    Failed(String),
}

pub trait GrammarBridge: Send + Sync {
    fn translate<'a>(
        &'a self,
        source: &'a str,
        language: &'a str,
    ) -> BoxFuture<'a, Result<BridgeOutput, BridgeError>>;
}

const SPANISH: &[(&str, &str)] = &[
    ("establecer", "set"),
    ("poner", "put"),
    ("a", "to"),
    ("en", "in"),
    ("si", "if"),
    ("entonces", "then"),
    ("sino", "else"),
    ("fin", "end"),
    ("repetir", "repeat"),
    ("veces", "times"),
    ("mientras", "while"),
    ("para", "for"),
    ("registrar", "log"),
    ("agregar", "add"),
    ("añadir", "add"),
    ("quitar", "remove"),
    ("alternar", "toggle"),
    ("esperar", "wait"),
    ("devolver", "return"),
    ("incrementar", "increment"),
    ("decrementar", "decrement"),
    ("por", "by"),
    ("de", "from"),
    ("verdadero", "true"),
    ("falso", "false"),
    ("nulo", "null"),
    ("y", "and"),
    ("o", "or"),
    ("no", "not"),
];

const FRENCH: &[(&str, &str)] = &[
    ("définir", "set"),
    ("mettre", "put"),
    ("à", "to"),
    ("dans", "in"),
    ("si", "if"),
    ("alors", "then"),
    ("sinon", "else"),
    ("fin", "end"),
    ("répéter", "repeat"),
    ("fois", "times"),
    ("pour", "for"),
    ("journaliser", "log"),
    ("ajouter", "add"),
    ("retirer", "remove"),
    ("basculer", "toggle"),
    ("attendre", "wait"),
    ("retourner", "return"),
    ("incrémenter", "increment"),
    ("décrémenter", "decrement"),
    ("par", "by"),
    ("de", "from"),
    ("vrai", "true"),
    ("faux", "false"),
    ("nul", "null"),
    ("et", "and"),
    ("ou", "or"),
    ("non", "not"),
];

const GERMAN: &[(&str, &str)] = &[
    ("setze", "set"),
    ("lege", "put"),
    ("auf", "to"),
    ("wenn", "if"),
    ("dann", "then"),
    ("sonst", "else"),
    ("ende", "end"),
    ("wiederhole", "repeat"),
    ("mal", "times"),
    ("solange", "while"),
    ("für", "for"),
    ("protokolliere", "log"),
    ("füge", "add"),
    ("entferne", "remove"),
    ("schalte", "toggle"),
    ("warte", "wait"),
    ("gib", "return"),
    ("erhöhe", "increment"),
    ("verringere", "decrement"),
    ("um", "by"),
    ("von", "from"),
    ("wahr", "true"),
    ("falsch", "false"),
    ("und", "and"),
    ("oder", "or"),
    ("nicht", "not"),
];

/// Dictionary-driven keyword translation.
#[derive(Clone, Debug)]
pub struct KeywordBridge {
    tables: FxHashMap<String, FxHashMap<&'static str, &'static str>>,
}

impl KeywordBridge {
    /// A bridge with the built-in `es`, `fr` and `de` tables.
    pub fn new() -> Self {
        let mut bridge = KeywordBridge {
            tables: FxHashMap::default(),
        };
        bridge.add_language("es", SPANISH);
        bridge.add_language("fr", FRENCH);
        bridge.add_language("de", GERMAN);
        bridge
    }

    /// Register (or extend) a keyword table.
    pub fn add_language(&mut self, language: &str, words: &[(&'static str, &'static str)]) {
        self.tables
            .entry(language.to_ascii_lowercase())
            .or_default()
            .extend(words.iter().copied());
    }

    pub fn supports(&self, language: &str) -> bool {
        self.tables.contains_key(language)
    }

    /// Translate keywords outside string literals and outside `.class`,
    /// `#id`, `@attr`, `$name` and `a.b` positions. Returns the text and
    /// the share of words that were keywords.
    pub fn translate_text(&self, source: &str, language: &str) -> Option<(String, f64)> {
        let table = self.tables.get(language)?;
        let mut out = String::with_capacity(source.len());
        let mut words = 0u32;
        let mut translated = 0u32;
        let mut quote: Option<char> = None;
        let mut prev: Option<char> = None;
        let mut chars = source.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if let Some(q) = quote {
                out.push(c);
                if c == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
                prev = Some(c);
                continue;
            }
            if matches!(c, '\'' | '"' | '`') {
                quote = Some(c);
                out.push(c);
                prev = Some(c);
                continue;
            }
            if !c.is_alphabetic() {
                out.push(c);
                prev = Some(c);
                continue;
            }

            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !(next.is_alphanumeric() || next == '_') {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            let word = &source[start..end];
            let referenced = matches!(prev, Some('.' | '#' | '@' | '$' | '-'));
            words += 1;
            match table.get(word.to_lowercase().as_str()) {
                Some(keyword) if !referenced => {
                    translated += 1;
                    out.push_str(keyword);
                }
                _ => out.push_str(word),
            }
            prev = word.chars().last();
        }

        let confidence = if words == 0 {
            0.0
        } else {
            f64::from(translated) / f64::from(words)
        };
        Some((out, confidence))
    }
}

impl Default for KeywordBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBridge for KeywordBridge {
    fn translate<'a>(
        &'a self,
        source: &'a str,
        language: &'a str,
    ) -> BoxFuture<'a, Result<BridgeOutput, BridgeError>> {
        let result = match self.translate_text(source, language) {
            Some((text, confidence)) => Ok(BridgeOutput {
                ast: None,
                used_direct_path: false,
                confidence,
                fallback_text: Some(text),
            }),
            None => Err(BridgeError::UnsupportedLanguage(language.to_string())),
        };
        future::ready(result).boxed()
    }
}
