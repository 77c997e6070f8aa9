//! Result type of morphological normalization

use serde::{Deserialize, Serialize};

/// Lowest confidence a normalizer may report for a change.
pub const CONFIDENCE_FLOOR: f32 = 0.5;

/// Outcome of stripping affixes from a single word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NormalizationResult {
    Unchanged {
        word: String,
    },
    Normalized {
        stem: String,
        confidence: f32,
        removed_prefixes: Vec<String>,
        removed_suffixes: Vec<String>,
    },
}

impl NormalizationResult {
    pub fn unchanged(word: impl Into<String>) -> Self {
        NormalizationResult::Unchanged { word: word.into() }
    }

    /// Build a change result; confidence is clamped into `[0.5, 1.0]`.
    pub fn normalized(
        stem: impl Into<String>,
        confidence: f32,
        removed_prefixes: Vec<String>,
        removed_suffixes: Vec<String>,
    ) -> Self {
        NormalizationResult::Normalized {
            stem: stem.into(),
            confidence: confidence.clamp(CONFIDENCE_FLOOR, 1.0),
            removed_prefixes,
            removed_suffixes,
        }
    }

    /// The stem, or the untouched word.
    pub fn stem(&self) -> &str {
        match self {
            NormalizationResult::Unchanged { word } => word,
            NormalizationResult::Normalized { stem, .. } => stem,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            NormalizationResult::Unchanged { .. } => 1.0,
            NormalizationResult::Normalized { confidence, .. } => *confidence,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, NormalizationResult::Normalized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_floored() {
        let result = NormalizationResult::normalized("stem", 0.1, vec![], vec!["x".into()]);
        assert_eq!(result.confidence(), CONFIDENCE_FLOOR);
        assert!(result.is_changed());
    }

    #[test]
    fn test_unchanged_has_full_confidence() {
        let result = NormalizationResult::unchanged("word");
        assert_eq!(result.stem(), "word");
        assert_eq!(result.confidence(), 1.0);
        assert!(!result.is_changed());
    }
}
