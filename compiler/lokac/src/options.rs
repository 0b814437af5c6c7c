//! Compile options and their normalized, hashable form.
//!
//! The cache is keyed on `(source, NormalizedOptions)`, so every spelling of
//! the same configuration must normalize to the same key: an absent language
//! is `"en"`, language codes are case-insensitive, and the confidence
//! threshold is clamped into `[0, 1]`.

use serde::{Deserialize, Serialize};

/// The canonical language every other language falls back to.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Minimum analyzer confidence trusted when the caller does not say.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Default compile cache capacity, in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 500;

/// Options accepted by the compile entry points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub language: Option<String>,
    pub confidence_threshold: Option<f64>,
    /// Skip the semantic analyzer and the grammar bridge.
    pub traditional: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    #[must_use]
    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn traditional(mut self, traditional: bool) -> Self {
        self.traditional = traditional;
        self
    }

    pub fn normalize(&self) -> NormalizedOptions {
        let language = self
            .language
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map_or_else(|| DEFAULT_LANGUAGE.to_string(), str::to_ascii_lowercase);
        let threshold = match self.confidence_threshold {
            Some(t) if t.is_nan() => DEFAULT_CONFIDENCE_THRESHOLD,
            Some(t) => t.clamp(0.0, 1.0),
            None => DEFAULT_CONFIDENCE_THRESHOLD,
        };
        NormalizedOptions {
            language,
            // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
            threshold_bits: (threshold + 0.0).to_bits(),
            traditional: self.traditional,
        }
    }
}

/// `CompileOptions` after defaulting and clamping. Usable as a map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NormalizedOptions {
    language: String,
    threshold_bits: u64,
    traditional: bool,
}

impl NormalizedOptions {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn confidence_threshold(&self) -> f64 {
        f64::from_bits(self.threshold_bits)
    }

    pub fn traditional(&self) -> bool {
        self.traditional
    }

    /// Whether input in this configuration goes straight to the parser.
    pub fn is_canonical(&self) -> bool {
        self.traditional || self.language == DEFAULT_LANGUAGE
    }
}

impl Default for NormalizedOptions {
    fn default() -> Self {
        CompileOptions::default().normalize()
    }
}

/// Front door configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    pub cache_capacity: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_language_is_english() {
        let a = CompileOptions::new().normalize();
        let b = CompileOptions::new().language("en").normalize();
        let c = CompileOptions::new().language(" EN ").normalize();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.language(), "en");
        assert!(a.is_canonical());
    }

    #[test]
    fn test_threshold_is_clamped() {
        assert_eq!(
            CompileOptions::new().confidence_threshold(7.0).normalize(),
            CompileOptions::new().confidence_threshold(1.0).normalize()
        );
        assert_eq!(
            CompileOptions::new().confidence_threshold(-0.0).normalize(),
            CompileOptions::new().confidence_threshold(0.0).normalize()
        );
        assert_eq!(
            CompileOptions::new()
                .confidence_threshold(f64::NAN)
                .normalize(),
            CompileOptions::new().normalize()
        );
    }

    #[test]
    fn test_distinct_options_are_distinct_keys() {
        let base = CompileOptions::new().normalize();
        assert_ne!(base, CompileOptions::new().traditional(true).normalize());
        assert_ne!(base, CompileOptions::new().language("es").normalize());
        assert_ne!(base, CompileOptions::new().confidence_threshold(0.9).normalize());
        assert!(!CompileOptions::new().language("es").normalize().is_canonical());
        assert!(CompileOptions::new()
            .language("es")
            .traditional(true)
            .normalize()
            .is_canonical());
    }

    #[test]
    fn test_deserializes_camel_case() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"language":"fr","confidenceThreshold":0.8}"#).unwrap();
        assert_eq!(options, CompileOptions::new().language("fr").confidence_threshold(0.8));
    }
}
