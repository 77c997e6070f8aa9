//! Polyscript Semantic - Multilingual Command Translation
//!
//! Parses short natural-language commands written in one of the supported
//! languages into language-neutral semantic nodes, and renders nodes back
//! into any supported language.
//!
//! Architecture:
//! ```text
//! Source text (+ language code)
//!     ↓
//! Tokenizer (profile keywords + morphological normalizer)
//!     ↓
//! Matcher (generated patterns, confidence scoring)
//!     ↓
//! SemanticNode (or explicit notation)
//!     ↓
//! Renderer (target profile word order + markers)
//!     ↓
//! Target text
//! ```

pub mod matcher;
pub mod renderer;
pub mod translator;

pub use matcher::{match_tokens, unquote, MatchResult, Matcher};
pub use renderer::{join_steps, render_command, render_value, ActionTables};
pub use translator::{Analysis, StepAnalysis, Translator};

pub use polyscript_core::{
    is_explicit, parse_explicit, to_explicit, Action, PolyscriptError, PolyscriptResult, Role,
    SemanticNode, SemanticValue, TokenStream, TranslatorConfig,
};
pub use polyscript_lang::{LanguageProfile, Registry};

use once_cell::sync::Lazy;

static DEFAULT: Lazy<Translator> = Lazy::new(|| Translator::with_config(TranslatorConfig::from_env()));

/// Process-wide translator over the built-in languages, configured from
/// `POLYSCRIPT_*` environment variables on first use.
pub fn default_translator() -> &'static Translator {
    &DEFAULT
}

pub fn tokenize(text: &str, language: &str) -> PolyscriptResult<TokenStream> {
    Ok(DEFAULT.tokenize(text, language)?)
}

pub fn parse(text: &str, language: &str) -> PolyscriptResult<SemanticNode> {
    DEFAULT.parse(text, language)
}

pub fn can_parse(text: &str, language: &str) -> bool {
    DEFAULT.can_parse(text, language)
}

pub fn translate(text: &str, from: &str, to: &str) -> PolyscriptResult<String> {
    DEFAULT.translate(text, from, to)
}

pub fn render(node: &SemanticNode, language: &str) -> PolyscriptResult<String> {
    Ok(DEFAULT.render(node, language)?)
}

pub fn supported_languages() -> Vec<String> {
    DEFAULT.supported_languages()
}

pub fn is_language_supported(code: &str) -> bool {
    DEFAULT.is_language_supported(code)
}
