//! Configuration types

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weights feeding the matcher's confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    /// Bonus for a pattern binding none of its declared roles. A pattern
    /// binding every declared role earns 1.0; values in between are linear.
    pub specificity_base: f32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            specificity_base: 0.8,
        }
    }
}

impl MatchWeights {
    /// Specificity bonus for a pattern binding `bound` of `declared` roles.
    pub fn specificity(&self, bound: usize, declared: usize) -> f32 {
        if declared == 0 {
            return 1.0;
        }
        let ratio = bound.min(declared) as f32 / declared as f32;
        self.specificity_base + (1.0 - self.specificity_base) * ratio
    }
}

/// Scaling applied to per-affix penalties of the morphological normalizers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyWeights {
    pub weight_scale: f32,
}

impl Default for MorphologyWeights {
    fn default() -> Self {
        Self { weight_scale: 1.0 }
    }
}

/// Translator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Minimum confidence for SVO, VSO and V2 languages.
    pub default_threshold: f32,
    /// Minimum confidence for SOV languages.
    pub sov_threshold: f32,
    /// Per-language overrides keyed by language code.
    pub thresholds: BTreeMap<String, f32>,
    /// Return the untranslated input when translation fails.
    pub fallback_to_original: bool,
    /// Re-parse every rendered step in the target language.
    pub verify_round_trip: bool,
    pub match_weights: MatchWeights,
    pub morphology: MorphologyWeights,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.5,
            sov_threshold: 0.4,
            thresholds: BTreeMap::new(),
            fallback_to_original: true,
            verify_round_trip: false,
            match_weights: MatchWeights::default(),
            morphology: MorphologyWeights::default(),
        }
    }
}

impl TranslatorConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `POLYSCRIPT_DEFAULT_THRESHOLD`: minimum confidence (default: 0.5)
    /// - `POLYSCRIPT_SOV_THRESHOLD`: minimum confidence for SOV languages (default: 0.4)
    /// - `POLYSCRIPT_FALLBACK_TO_ORIGINAL`: `true`/`false` (default: true)
    /// - `POLYSCRIPT_VERIFY_ROUND_TRIP`: `true`/`false` (default: false)
    /// - `POLYSCRIPT_SPECIFICITY_BASE`: specificity bonus floor (default: 0.8)
    ///
    /// A result that fails [`validate`](Self::validate) is replaced by the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn read<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
            default: T,
        ) -> T {
            lookup(key).and_then(|s| s.parse().ok()).unwrap_or(default)
        }

        let defaults = Self::default();
        let config = Self {
            default_threshold: read(&lookup, "POLYSCRIPT_DEFAULT_THRESHOLD", defaults.default_threshold),
            sov_threshold: read(&lookup, "POLYSCRIPT_SOV_THRESHOLD", defaults.sov_threshold),
            fallback_to_original: read(
                &lookup,
                "POLYSCRIPT_FALLBACK_TO_ORIGINAL",
                defaults.fallback_to_original,
            ),
            verify_round_trip: read(&lookup, "POLYSCRIPT_VERIFY_ROUND_TRIP", defaults.verify_round_trip),
            match_weights: MatchWeights {
                specificity_base: read(
                    &lookup,
                    "POLYSCRIPT_SPECIFICITY_BASE",
                    defaults.match_weights.specificity_base,
                ),
            },
            ..Self::default()
        };

        match config.validate() {
            Ok(()) => config,
            Err(_) => defaults,
        }
    }

    /// Explicit threshold for `code`, if configured. Variant codes fall back
    /// to their base code.
    pub fn threshold_override(&self, code: &str) -> Option<f32> {
        self.thresholds.get(code).copied().or_else(|| {
            let base = base_code(code);
            self.thresholds.get(&base).copied()
        })
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - every threshold in [0.0, 1.0]
    /// - specificity_base in [0.0, 1.0]
    /// - weight_scale >= 0.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("default_threshold", self.default_threshold)?;
        check_unit("sov_threshold", self.sov_threshold)?;
        for (code, value) in &self.thresholds {
            check_unit(&format!("thresholds.{}", code), *value)?;
        }
        check_unit(
            "match_weights.specificity_base",
            self.match_weights.specificity_base,
        )?;

        if !(self.morphology.weight_scale >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "morphology.weight_scale".to_string(),
                value: self.morphology.weight_scale.to_string(),
                reason: "weight_scale must be non-negative".to_string(),
            });
        }

        Ok(())
    }
}

fn check_unit(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("{} must be between 0.0 and 1.0", field),
        })
    }
}

/// Primary subtag of a BCP-47 code, lowercased (`es-MX` → `es`).
pub fn base_code(code: &str) -> String {
    code.split(['-', '_'])
        .next()
        .unwrap_or(code)
        .to_ascii_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() -> Result<(), ConfigError> {
        TranslatorConfig::default().validate()
    }

    #[test]
    fn test_from_toml_partial_document() -> Result<(), ConfigError> {
        let config = TranslatorConfig::from_toml_str(
            r#"
            sov_threshold = 0.3
            verify_round_trip = true

            [thresholds]
            ar = 0.6
            "#,
        )?;
        assert_eq!(config.sov_threshold, 0.3);
        assert_eq!(config.default_threshold, 0.5);
        assert!(config.verify_round_trip);
        assert_eq!(config.threshold_override("ar"), Some(0.6));
        assert_eq!(config.threshold_override("ar-EG"), Some(0.6));
        assert_eq!(config.threshold_override("en"), None);
        Ok(())
    }

    #[test]
    fn test_from_toml_rejects_out_of_range() {
        let result = TranslatorConfig::from_toml_str("default_threshold = 1.5");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_from_toml_reports_syntax_errors() {
        let result = TranslatorConfig::from_toml_str("default_threshold = ");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_reads_variables() -> Result<(), ConfigError> {
        let config = TranslatorConfig::from_lookup(lookup_from(&[
            ("POLYSCRIPT_SOV_THRESHOLD", "0.3"),
            ("POLYSCRIPT_VERIFY_ROUND_TRIP", "true"),
            ("POLYSCRIPT_FALLBACK_TO_ORIGINAL", "maybe"),
        ]));
        config.validate()?;
        assert_eq!(config.sov_threshold, 0.3);
        assert!(config.verify_round_trip);
        assert!(config.fallback_to_original);
        Ok(())
    }

    #[test]
    fn test_from_lookup_discards_out_of_range_values() -> Result<(), ConfigError> {
        for (key, value) in [
            ("POLYSCRIPT_DEFAULT_THRESHOLD", "5"),
            ("POLYSCRIPT_SOV_THRESHOLD", "-0.2"),
            ("POLYSCRIPT_SPECIFICITY_BASE", "NaN"),
        ] {
            let config = TranslatorConfig::from_lookup(|k| (k == key).then(|| value.to_string()));
            config.validate()?;
            assert_eq!(config, TranslatorConfig::default(), "{}={}", key, value);
        }
        Ok(())
    }

    #[test]
    fn test_validate_negative_weight_scale() {
        let mut config = TranslatorConfig::default();
        config.morphology.weight_scale = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_specificity_bonus() {
        let weights = MatchWeights::default();
        assert_eq!(weights.specificity(2, 2), 1.0);
        assert!((weights.specificity(1, 2) - 0.9).abs() < 1e-6);
        assert!((weights.specificity(0, 1) - 0.8).abs() < 1e-6);
        assert_eq!(weights.specificity(0, 0), 1.0);
    }

    #[test]
    fn test_base_code() {
        assert_eq!(base_code("es-MX"), "es");
        assert_eq!(base_code("pt_BR"), "pt");
        assert_eq!(base_code("JA"), "ja");
    }
}
