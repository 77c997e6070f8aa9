//! Language profiles
//!
//! A profile is pure data: word order, marker tables, keyword tables and
//! localized pronouns. Variant profiles (`es-MX`) are partial YAML documents
//! merged over their base.

use crate::morphology::fold;
use polyscript_core::{base_code, Action, LanguageError, Role, REFERENCES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical connective that always splits compound commands.
pub const CANONICAL_THEN: &str = "then";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WordOrder {
    Svo,
    Sov,
    Vso,
    V2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkingStrategy {
    Preposition,
    Postposition,
    Agglutinative,
}

/// How input text is split into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segmentation {
    #[default]
    Whitespace,
    /// Longest-match over the profile vocabulary, for scripts without spaces.
    Dictionary,
}

/// How a marker joins the value it marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attachment {
    /// Its own word.
    #[default]
    Separate,
    /// Glued to the value (`버튼을`).
    Attached,
    /// Joined with an apostrophe (`#btn'e`).
    Apostrophe,
}

/// A grammatical marker (preposition, postposition, particle, case suffix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub attachment: Attachment,
}

impl Marker {
    pub fn separate(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            alternatives: Vec::new(),
            attachment: Attachment::Separate,
        }
    }

    pub fn attached(primary: impl Into<String>) -> Self {
        Self {
            attachment: Attachment::Attached,
            ..Self::separate(primary)
        }
    }

    pub fn apostrophe(primary: impl Into<String>) -> Self {
        Self {
            attachment: Attachment::Apostrophe,
            ..Self::separate(primary)
        }
    }

    pub fn or(mut self, alternatives: &[&str]) -> Self {
        self.alternatives
            .extend(alternatives.iter().map(|s| s.to_string()));
        self
    }

    /// Primary form first, then alternatives.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

/// A keyword with its accepted spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl KeywordEntry {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            alternatives: Vec::new(),
        }
    }

    pub fn or(mut self, alternatives: &[&str]) -> Self {
        self.alternatives
            .extend(alternatives.iter().map(|s| s.to_string()));
        self
    }

    pub fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbPosition {
    Start,
    End,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerbInfo {
    pub position: VerbPosition,
    /// Implied roles (the default patient) are omitted when rendering.
    #[serde(default)]
    pub subject_drop: bool,
}

/// Everything the tokenizer, pattern generator and renderer know about a
/// language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProfile {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub direction: Direction,
    pub word_order: WordOrder,
    pub marking_strategy: MarkingStrategy,
    #[serde(default)]
    pub segmentation: Segmentation,
    #[serde(default)]
    pub role_markers: BTreeMap<Role, Marker>,
    #[serde(default)]
    pub keywords: BTreeMap<Action, KeywordEntry>,
    pub connective: KeywordEntry,
    /// Canonical pronoun → localized form.
    #[serde(default)]
    pub references: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possessive: Option<Marker>,
    pub verb: VerbInfo,
}

impl LanguageProfile {
    /// Parse a complete profile from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, LanguageError> {
        serde_yaml::from_str(source).map_err(|e| LanguageError::InvalidProfile {
            code: "<yaml>".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn base_code(&self) -> String {
        base_code(&self.code)
    }

    pub fn is_sov(&self) -> bool {
        self.word_order == WordOrder::Sov
    }

    /// Markers precede their values.
    pub fn is_prepositional(&self) -> bool {
        self.marking_strategy == MarkingStrategy::Preposition
    }

    pub fn keyword(&self, action: Action) -> Option<&KeywordEntry> {
        self.keywords.get(&action)
    }

    /// Primary surface form of `action`, falling back to its canonical name.
    pub fn keyword_primary(&self, action: Action) -> &str {
        self.keywords
            .get(&action)
            .map(|k| k.primary.as_str())
            .unwrap_or_else(|| action.as_str())
    }

    pub fn marker(&self, role: Role) -> Option<&Marker> {
        self.role_markers.get(&role)
    }

    /// Localized form of a canonical pronoun; unknown names pass through.
    pub fn reference<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.references
            .get(canonical)
            .map(String::as_str)
            .unwrap_or(canonical)
    }

    /// Canonical pronoun named by `word`, in localized or canonical spelling.
    pub fn canonical_reference(&self, word: &str) -> Option<&'static str> {
        let folded = fold(word);
        REFERENCES.iter().copied().find(|canonical| {
            *canonical == folded
                || self
                    .references
                    .get(*canonical)
                    .map(|local| fold(local) == folded)
                    .unwrap_or(false)
        })
    }

    /// The possessive marker, defaulting to an attached `'s`.
    pub fn possessive_marker(&self) -> Marker {
        self.possessive
            .clone()
            .unwrap_or_else(|| Marker::attached("'s"))
    }

    /// Connective forms, canonical `then` included.
    pub fn connective_forms(&self) -> Vec<&str> {
        let mut forms: Vec<&str> = self.connective.forms().collect();
        if !forms.contains(&CANONICAL_THEN) {
            forms.push(CANONICAL_THEN);
        }
        forms
    }

    /// Apply a partial YAML document over this profile.
    ///
    /// Maps merge key by key, arrays and scalars are replaced. The document
    /// must name its own `code`; `extends` is ignored here.
    pub fn merge_yaml(&self, overlay: &str) -> Result<LanguageProfile, LanguageError> {
        let overlay: serde_json::Value =
            serde_yaml::from_str(overlay).map_err(|e| LanguageError::InvalidProfile {
                code: self.code.clone(),
                reason: e.to_string(),
            })?;
        self.merge_value(overlay)
    }

    pub fn merge_value(&self, mut overlay: serde_json::Value) -> Result<LanguageProfile, LanguageError> {
        let invalid = |reason: String| LanguageError::InvalidProfile {
            code: self.code.clone(),
            reason,
        };
        if let Some(map) = overlay.as_object_mut() {
            map.remove("extends");
        } else {
            return Err(invalid("variant document must be a mapping".to_string()));
        }

        let mut base = serde_json::to_value(self).map_err(|e| invalid(e.to_string()))?;
        deep_merge(&mut base, overlay);
        serde_json::from_value(base).map_err(|e| invalid(e.to_string()))
    }
}

/// Header fields of a variant document.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantHeader {
    pub code: String,
    pub extends: String,
}

impl VariantHeader {
    pub fn from_yaml(source: &str) -> Result<Self, LanguageError> {
        serde_yaml::from_str(source).map_err(|e| LanguageError::InvalidProfile {
            code: "<variant>".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Recursive merge: objects merge, everything else is replaced.
pub fn deep_merge(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tiny() -> LanguageProfile {
        let mut keywords = BTreeMap::new();
        keywords.insert(Action::Toggle, KeywordEntry::new("alternar"));
        keywords.insert(Action::Take, KeywordEntry::new("tomar"));
        let mut references = BTreeMap::new();
        references.insert("me".to_string(), "yo".to_string());
        LanguageProfile {
            code: "es".to_string(),
            name: "Español".to_string(),
            direction: Direction::Ltr,
            word_order: WordOrder::Svo,
            marking_strategy: MarkingStrategy::Preposition,
            segmentation: Segmentation::Whitespace,
            role_markers: BTreeMap::from([(Role::Destination, Marker::separate("a").or(&["en"]))]),
            keywords,
            connective: KeywordEntry::new("entonces"),
            references,
            possessive: None,
            verb: VerbInfo {
                position: VerbPosition::Start,
                subject_drop: true,
            },
        }
    }

    #[test]
    fn test_deep_merge_semantics() {
        let mut base = json!({"a": {"x": 1, "y": [1, 2]}, "b": "keep"});
        deep_merge(&mut base, json!({"a": {"y": [3], "z": true}}));
        assert_eq!(base, json!({"a": {"x": 1, "y": [3], "z": true}, "b": "keep"}));
    }

    #[test]
    fn test_merge_yaml_overrides_keyword() -> Result<(), LanguageError> {
        let merged = tiny().merge_yaml(
            "code: es-MX\nextends: es\nkeywords:\n  take:\n    primary: agarrar\n    alternatives: [tomar]\n",
        )?;
        assert_eq!(merged.code, "es-MX");
        assert_eq!(merged.keyword_primary(Action::Take), "agarrar");
        assert_eq!(merged.keyword_primary(Action::Toggle), "alternar");
        assert_eq!(merged.reference("me"), "yo");
        Ok(())
    }

    #[test]
    fn test_merge_rejects_non_mapping() {
        assert!(tiny().merge_yaml("- just\n- a list\n").is_err());
    }

    #[test]
    fn test_canonical_reference_lookup() {
        let profile = tiny();
        assert_eq!(profile.canonical_reference("yo"), Some("me"));
        assert_eq!(profile.canonical_reference("Me"), Some("me"));
        assert_eq!(profile.canonical_reference("result"), Some("result"));
        assert_eq!(profile.canonical_reference("contador"), None);
    }

    #[test]
    fn test_connectives_include_canonical() {
        assert_eq!(tiny().connective_forms(), vec!["entonces", "then"]);
    }

    #[test]
    fn test_profile_yaml_round_trip() -> Result<(), LanguageError> {
        let profile = tiny();
        let yaml = serde_yaml::to_string(&profile).map_err(|e| LanguageError::InvalidProfile {
            code: "es".to_string(),
            reason: e.to_string(),
        })?;
        assert!(yaml.contains("wordOrder: SVO"));
        assert_eq!(LanguageProfile::from_yaml(&yaml)?, profile);
        Ok(())
    }
}
