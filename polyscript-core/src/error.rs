//! Error types for polyscript operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Language lookup errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LanguageError {
    #[error("Unsupported language: {code}")]
    Unsupported { code: String },

    #[error("Variant {code} extends unregistered base {base}")]
    MissingBase { code: String, base: String },

    #[error("Invalid profile document for {code}: {reason}")]
    InvalidProfile { code: String, reason: String },
}

/// Pattern matching errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    #[error("No pattern matched {input:?} in {language}")]
    NoMatch { language: String, input: String },

    #[error("Match confidence {confidence:.2} below threshold {threshold:.2} in {language}")]
    LowConfidence {
        language: String,
        confidence: f32,
        threshold: f32,
    },
}

/// Translation orchestration errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslateError {
    #[error("Step {step} failed: {reason}")]
    StepFailed { step: usize, reason: String },

    #[error("Round-trip verification failed in {language}: rendered {rendered:?}")]
    RoundTripMismatch { language: String, rendered: String },

    #[error("Nothing to translate")]
    EmptyInput,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Config parse error: {reason}")]
    Parse { reason: String },
}

/// Diagnostic severity for explicit-notation validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One problem found in explicit notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Byte offset into the source text.
    pub offset: usize,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, offset: usize) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            offset,
        }
    }

    pub fn warning(message: impl Into<String>, offset: usize) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            offset,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} at {}: {}", label, self.offset, self.message)
    }
}

/// Malformed explicit notation, with every diagnostic collected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Malformed explicit notation ({} diagnostics)", .diagnostics.len())]
pub struct ExplicitError {
    pub diagnostics: Vec<Diagnostic>,
}

/// Master error type for all polyscript errors.
#[derive(Debug, Clone, Error)]
pub enum PolyscriptError {
    #[error("Language error: {0}")]
    Language(#[from] LanguageError),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("Translate error: {0}")]
    Translate(#[from] TranslateError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Explicit notation error: {0}")]
    Explicit(#[from] ExplicitError),
}

/// Result type alias for polyscript operations.
pub type PolyscriptResult<T> = Result<T, PolyscriptError>;

// =============================================================================
// TESTS
// =============================================================================
