//! Polyscript Core - Semantic Types
//!
//! Language-neutral data model shared by every other crate: actions, roles,
//! tokens, semantic values and nodes, explicit notation, errors and
//! configuration. No language data lives here.

pub mod action;
pub mod config;
pub mod error;
pub mod explicit;
pub mod morphology;
pub mod node;
pub mod token;
pub mod value;

pub use action::{Action, NodeKind, Role, UnknownName};
pub use config::{base_code, MatchWeights, MorphologyWeights, TranslatorConfig};
pub use error::{
    ConfigError, Diagnostic, ExplicitError, LanguageError, MatchError, PolyscriptError,
    PolyscriptResult, Severity, TranslateError,
};
pub use explicit::{is_explicit, parse_explicit, to_explicit, validate_explicit};
pub use morphology::{NormalizationResult, CONFIDENCE_FLOOR};
pub use node::SemanticNode;
pub use token::{Token, TokenKind, TokenStream};
pub use value::{accepts, is_reference, LiteralType, SelectorKind, SemanticValue, ValueType, REFERENCES};
