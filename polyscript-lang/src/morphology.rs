//! Morphological normalizers
//!
//! Normalizers reduce inflected words to stems so that `mostrarlo`,
//! `表示してください` and `토글하세요` hit the same keyword tables as their
//! dictionary forms. They never fail: an unrecognized word comes back
//! [`NormalizationResult::Unchanged`].

use polyscript_core::{NormalizationResult, CONFIDENCE_FLOOR};

/// Lowercase, drop combining marks and Arabic harakat, fold accented Latin
/// vowels and unify Arabic alef forms.
pub fn fold(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars().flat_map(char::to_lowercase) {
        if is_combining_mark(c) || c == '\u{0640}' {
            continue;
        }
        let folded = match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'û' => 'u',
            'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
            'ى' => 'ي',
            other => other,
        };
        out.push(folded);
    }
    out
}

/// Combining diacritics: Latin, Hebrew, Arabic harakat, kana voicing marks.
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32,
        0x0300..=0x036F
        | 0x0483..=0x0489
        | 0x0591..=0x05BD
        | 0x0610..=0x061A
        | 0x064B..=0x065F
        | 0x0670
        | 0x06D6..=0x06ED
        | 0x3099..=0x309A
        | 0x1AB0..=0x1AFF
        | 0x20D0..=0x20FF)
}

/// Language-specific morphological normalizer.
pub trait Normalizer: Send + Sync {
    /// Language code this normalizer is registered for.
    fn language(&self) -> &str;

    /// Orthographic folding applied before any lookup, to input words and
    /// keyword tables alike.
    fn prepare(&self, word: &str) -> String {
        fold(word)
    }

    /// Cheap pre-check; `normalize` is only worth calling when this is true.
    fn is_normalizable(&self, word: &str) -> bool;

    fn normalize(&self, word: &str) -> NormalizationResult;

    /// Prefixes that may precede a keyword inside an unsegmented run.
    fn prefixes(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Suffixes that may follow a keyword inside an unsegmented run.
    fn suffixes(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// One strippable affix.
#[derive(Debug, Clone, PartialEq)]
pub struct AffixRule {
    pub affix: String,
    /// Characters that must remain after stripping.
    pub min_stem: usize,
    pub penalty: f32,
}

impl AffixRule {
    pub fn new(affix: &str, min_stem: usize, penalty: f32) -> Self {
        Self {
            affix: affix.to_string(),
            min_stem,
            penalty,
        }
    }
}

/// Table-driven normalizer: one prefix pass, then up to `suffix_passes`
/// suffix passes. Rules are tried in order; the first that fits wins.
#[derive(Debug, Clone)]
pub struct AffixNormalizer {
    code: String,
    prefixes: Vec<AffixRule>,
    suffixes: Vec<AffixRule>,
    suffix_passes: usize,
    weight_scale: f32,
}

impl AffixNormalizer {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            suffix_passes: 1,
            weight_scale: 1.0,
        }
    }

    /// Add prefix rules sharing one minimum stem length and penalty.
    pub fn with_prefixes(mut self, affixes: &[&str], min_stem: usize, penalty: f32) -> Self {
        self.prefixes.extend(
            affixes
                .iter()
                .map(|a| AffixRule::new(&fold(a), min_stem, penalty)),
        );
        self
    }

    /// Add suffix rules sharing one minimum stem length and penalty.
    pub fn with_suffixes(mut self, affixes: &[&str], min_stem: usize, penalty: f32) -> Self {
        self.suffixes.extend(
            affixes
                .iter()
                .map(|a| AffixRule::new(&fold(a), min_stem, penalty)),
        );
        self
    }

    pub fn suffix_passes(mut self, passes: usize) -> Self {
        self.suffix_passes = passes.max(1);
        self
    }

    /// Scale every penalty (`MorphologyWeights::weight_scale`).
    pub fn with_weight_scale(mut self, scale: f32) -> Self {
        self.weight_scale = scale.max(0.0);
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    fn strip_prefix<'w>(&self, word: &'w str) -> Option<(&'w str, &AffixRule)> {
        self.prefixes.iter().find_map(|rule| {
            let rest = word.strip_prefix(rule.affix.as_str())?;
            (rest.chars().count() >= rule.min_stem).then_some((rest, rule))
        })
    }

    fn strip_suffix<'w>(&self, word: &'w str) -> Option<(&'w str, &AffixRule)> {
        self.suffixes.iter().find_map(|rule| {
            let rest = word.strip_suffix(rule.affix.as_str())?;
            (rest.chars().count() >= rule.min_stem).then_some((rest, rule))
        })
    }
}

impl Normalizer for AffixNormalizer {
    fn language(&self) -> &str {
        &self.code
    }

    fn is_normalizable(&self, word: &str) -> bool {
        let word = self.prepare(word);
        self.strip_prefix(&word).is_some() || self.strip_suffix(&word).is_some()
    }

    fn normalize(&self, word: &str) -> NormalizationResult {
        let prepared = self.prepare(word);
        let mut stem = prepared.as_str();
        let mut penalty = 0.0f32;
        let mut removed_prefixes = Vec::new();
        let mut removed_suffixes = Vec::new();

        if let Some((rest, rule)) = self.strip_prefix(stem) {
            stem = rest;
            penalty += rule.penalty;
            removed_prefixes.push(rule.affix.clone());
        }

        for _ in 0..self.suffix_passes {
            match self.strip_suffix(stem) {
                Some((rest, rule)) => {
                    stem = rest;
                    penalty += rule.penalty;
                    removed_suffixes.push(rule.affix.clone());
                }
                None => break,
            }
        }

        if removed_prefixes.is_empty() && removed_suffixes.is_empty() {
            return NormalizationResult::unchanged(word);
        }

        let confidence = (1.0 - penalty * self.weight_scale).max(CONFIDENCE_FLOOR);
        NormalizationResult::normalized(stem, confidence, removed_prefixes, removed_suffixes)
    }

    fn prefixes(&self) -> Vec<&str> {
        self.prefixes.iter().map(|r| r.affix.as_str()).collect()
    }

    fn suffixes(&self) -> Vec<&str> {
        self.suffixes.iter().map(|r| r.affix.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> AffixNormalizer {
        AffixNormalizer::new("xx")
            .with_prefixes(&["un"], 3, 0.1)
            .with_suffixes(&["ing", "s"], 3, 0.1)
            .suffix_passes(2)
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Définir"), "definir");
        assert_eq!(fold("أضف"), "اضف");
        assert_eq!(fold("بَدِّل"), "بدل");
        assert_eq!(fold("表示"), "表示");
    }

    #[test]
    fn test_prefix_and_stacked_suffixes() {
        let result = sample().normalize("untoggings");
        assert_eq!(result.stem(), "togg");
        assert!((result.confidence() - 0.7).abs() < 1e-6);
        match result {
            NormalizationResult::Normalized {
                removed_prefixes,
                removed_suffixes,
                ..
            } => {
                assert_eq!(removed_prefixes, vec!["un"]);
                assert_eq!(removed_suffixes, vec!["s", "ing"]);
            }
            other => panic!("expected a change, got {:?}", other),
        }
    }

    #[test]
    fn test_min_stem_prevents_over_stripping() {
        let result = sample().normalize("bus");
        assert!(!result.is_changed());
        assert_eq!(result.stem(), "bus");
    }

    #[test]
    fn test_unchanged_keeps_the_input_spelling() {
        let result = sample().normalize("Bús");
        assert!(!result.is_changed());
        assert_eq!(result.stem(), "Bús");
    }

    #[test]
    fn test_confidence_floor_with_heavy_weights() {
        let normalizer = sample().with_weight_scale(10.0);
        let result = normalizer.normalize("toggings");
        assert!(result.is_changed());
        assert_eq!(result.confidence(), CONFIDENCE_FLOOR);
    }

    #[test]
    fn test_is_normalizable() {
        assert!(sample().is_normalizable("walking"));
        assert!(!sample().is_normalizable("walk"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_builtin_confidence_stays_in_range(
            word in "\\PC{0,12}",
            scale in 0.0f32..20.0,
        ) {
            for normalizer in crate::languages::builtin_normalizers() {
                let result = normalizer.with_weight_scale(scale).normalize(&word);
                let confidence = result.confidence();
                prop_assert!((CONFIDENCE_FLOOR..=1.0).contains(&confidence));
                if !result.is_changed() {
                    prop_assert_eq!(result.stem(), word.as_str());
                } else {
                    prop_assert!(!result.stem().is_empty());
                }
            }
        }
    }
}
