//! Polyscript Lang - Language Data and Surface Syntax
//!
//! Language profiles, morphological normalizers, tokenizers, command
//! schemas and the pattern generator that joins schemas and profiles into
//! match/render tables. The [`Registry`] owns all of it.

pub mod languages;
pub mod morphology;
pub mod pattern;
pub mod profile;
pub mod registry;
pub mod schema;
pub mod tokenizer;

pub use morphology::{fold, AffixNormalizer, AffixRule, Normalizer};
pub use pattern::{
    patterns_for, resolve_marker, Pattern, PatternCache, PatternElement, PatternTemplate,
    ResolvedMarker, BASE_PRIORITY, ROLE_PRIORITY,
};
pub use profile::{
    Attachment, Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation,
    VariantHeader, VerbInfo, VerbPosition, WordOrder, CANONICAL_THEN,
};
pub use registry::Registry;
pub use schema::{builtin_schemas, CommandSchema, RoleSpec, ANY_LANGUAGE};
pub use tokenizer::{LanguageTokenizer, Tokenizer};
