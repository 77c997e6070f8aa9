//! Semantic values and the type-compatibility rule

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical built-in pronouns.
pub const REFERENCES: [&str; 7] = ["me", "it", "you", "result", "event", "target", "body"];

/// Returns true when `word` is a canonical reference name.
pub fn is_reference(word: &str) -> bool {
    REFERENCES.contains(&word)
}

/// Selector syntax category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    Id,
    Class,
    Attribute,
    Element,
    Complex,
}

impl SelectorKind {
    /// Classify selector text by its leading sigil.
    pub fn classify(text: &str) -> SelectorKind {
        let mut chars = text.chars();
        let first = chars.next();
        let compound = chars.any(|c| matches!(c, '.' | '#' | '[' | ' ' | '>'));
        match first {
            Some('#') if !compound => SelectorKind::Id,
            Some('.') if !compound => SelectorKind::Class,
            Some('[') | Some('@') => SelectorKind::Attribute,
            Some('<') => SelectorKind::Element,
            _ => SelectorKind::Complex,
        }
    }
}

/// Literal payload type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralType {
    #[default]
    String,
    Number,
    Boolean,
}

/// Language-neutral value filling a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SemanticValue {
    Literal {
        value: String,
        #[serde(rename = "dataType", default)]
        data_type: LiteralType,
    },
    Selector {
        value: String,
        #[serde(rename = "selectorKind")]
        selector_kind: SelectorKind,
    },
    Reference {
        value: String,
    },
    Expression {
        raw: String,
    },
    PropertyPath {
        object: Box<SemanticValue>,
        property: String,
    },
}

impl SemanticValue {
    pub fn string(value: impl Into<String>) -> Self {
        SemanticValue::Literal {
            value: value.into(),
            data_type: LiteralType::String,
        }
    }

    pub fn number(value: impl Into<String>) -> Self {
        SemanticValue::Literal {
            value: value.into(),
            data_type: LiteralType::Number,
        }
    }

    pub fn boolean(value: bool) -> Self {
        SemanticValue::Literal {
            value: value.to_string(),
            data_type: LiteralType::Boolean,
        }
    }

    pub fn selector(value: impl Into<String>) -> Self {
        let value = value.into();
        let selector_kind = SelectorKind::classify(&value);
        SemanticValue::Selector {
            value,
            selector_kind,
        }
    }

    pub fn reference(value: impl Into<String>) -> Self {
        SemanticValue::Reference {
            value: value.into(),
        }
    }

    pub fn expression(raw: impl Into<String>) -> Self {
        SemanticValue::Expression { raw: raw.into() }
    }

    pub fn property_path(object: SemanticValue, property: impl Into<String>) -> Self {
        SemanticValue::PropertyPath {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            SemanticValue::Literal { .. } => ValueType::Literal,
            SemanticValue::Selector { .. } => ValueType::Selector,
            SemanticValue::Reference { .. } => ValueType::Reference,
            SemanticValue::Expression { .. } => ValueType::Expression,
            SemanticValue::PropertyPath { .. } => ValueType::PropertyPath,
        }
    }

    /// Check this value against an expected-type list.
    pub fn satisfies(&self, expected: &[ValueType]) -> bool {
        accepts(expected, self.value_type())
    }
}

impl fmt::Display for SemanticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticValue::Literal { value, data_type } => match data_type {
                LiteralType::String => write!(f, "\"{}\"", escape_quoted(value)),
                _ => f.write_str(value),
            },
            SemanticValue::Selector { value, .. } => f.write_str(value),
            SemanticValue::Reference { value } => f.write_str(value),
            SemanticValue::Expression { raw } => f.write_str(raw),
            SemanticValue::PropertyPath { object, property } => {
                write!(f, "{}'s {}", object, property)
            }
        }
    }
}

/// Escape backslashes and double quotes for a double-quoted literal.
pub fn escape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Value type tags used in role expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Literal,
    Selector,
    Reference,
    Expression,
    PropertyPath,
}

/// Type-compatibility rule.
///
/// Satisfied when `expected` is empty, contains `actual`, contains
/// `Expression` (wildcard), when `actual` is an opaque expression, or for
/// property paths when `expected` holds a selector, reference or expression.
pub fn accepts(expected: &[ValueType], actual: ValueType) -> bool {
    if expected.is_empty() || expected.contains(&actual) {
        return true;
    }
    if expected.contains(&ValueType::Expression) || actual == ValueType::Expression {
        return true;
    }
    actual == ValueType::PropertyPath
        && expected
            .iter()
            .any(|t| matches!(t, ValueType::Selector | ValueType::Reference))
}
