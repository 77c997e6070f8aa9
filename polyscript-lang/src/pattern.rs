//! Pattern generation
//!
//! A pattern is a linear sequence of keyword, literal and role elements for
//! one `(action, language)` pair. Patterns are derived from the command
//! schema and the language profile, or taken from a manual template when
//! one is registered for the pair.

use crate::profile::{Attachment, LanguageProfile, VerbPosition};
use crate::schema::{CommandSchema, RoleSpec};
use once_cell::sync::Lazy;
use polyscript_core::{base_code, Action, LanguageError, Role, SemanticValue, ValueType};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Base priority of every pattern; each bound role adds [`ROLE_PRIORITY`].
pub const BASE_PRIORITY: u32 = 100;
pub const ROLE_PRIORITY: u32 = 10;

static SLOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([a-z]+)\}$").expect("slot pattern is valid"));

/// One element of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    /// The action's keyword.
    Keyword(Action),
    /// A fixed word: marker, particle or template literal.
    Literal {
        primary: String,
        alternatives: Vec<String>,
        attachment: Attachment,
    },
    /// A role slot and the value types it accepts.
    Role { role: Role, expected: Vec<ValueType> },
}

impl PatternElement {
    pub fn literal(primary: impl Into<String>) -> Self {
        PatternElement::Literal {
            primary: primary.into(),
            alternatives: Vec::new(),
            attachment: Attachment::Separate,
        }
    }

    /// Every accepted spelling of a literal; empty for other elements.
    pub fn literal_forms(&self) -> Vec<&str> {
        match self {
            PatternElement::Literal {
                primary,
                alternatives,
                ..
            } => std::iter::once(primary.as_str())
                .chain(alternatives.iter().map(String::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A generated or templated pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub id: String,
    pub action: Action,
    pub language: String,
    pub elements: Vec<PatternElement>,
    pub priority: u32,
    /// Roles this pattern binds, in element order.
    pub roles: Vec<Role>,
    /// Role count declared by the schema.
    pub declared: usize,
    /// Defaults for schema roles this pattern leaves unbound.
    pub defaults: Vec<(Role, SemanticValue)>,
}

impl Pattern {
    pub fn binds(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True when the pattern binds exactly `roles` (order ignored).
    pub fn binds_exactly(&self, roles: &[Role]) -> bool {
        self.roles.len() == roles.len() && roles.iter().all(|r| self.binds(*r))
    }
}

/// Manual replacement for derived patterns of one `(action, language)` pair.
///
/// Each template is a whitespace-separated sequence of `{verb}`, `{role}`
/// slots and literal words: `把 {patient} {verb} {destination}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTemplate {
    pub action: Action,
    pub language: String,
    pub templates: Vec<String>,
}

impl PatternTemplate {
    pub fn new(action: Action, language: impl Into<String>, templates: &[&str]) -> Self {
        Self {
            action,
            language: language.into(),
            templates: templates.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Compile against the action's schema. Unknown slots are rejected.
    pub fn compile(&self, schema: &CommandSchema) -> Result<Vec<Pattern>, LanguageError> {
        let invalid = |reason: String| LanguageError::InvalidProfile {
            code: self.language.clone(),
            reason,
        };

        let mut patterns = Vec::with_capacity(self.templates.len());
        for (index, template) in self.templates.iter().enumerate() {
            let mut elements = Vec::new();
            let mut roles = Vec::new();
            for word in template.split_whitespace() {
                let Some(captures) = SLOT.captures(word) else {
                    elements.push(PatternElement::literal(word));
                    continue;
                };
                let name = &captures[1];
                if name == "verb" {
                    elements.push(PatternElement::Keyword(self.action));
                    continue;
                }
                let role: Role = name
                    .parse()
                    .map_err(|_| invalid(format!("unknown slot {{{}}} in {:?}", name, template)))?;
                let spec = schema.role(role).ok_or_else(|| {
                    invalid(format!("{} has no {} role", self.action, role))
                })?;
                elements.push(PatternElement::Role {
                    role,
                    expected: spec.expected.clone(),
                });
                roles.push(role);
            }
            if !elements.contains(&PatternElement::Keyword(self.action)) {
                return Err(invalid(format!("template {:?} has no {{verb}}", template)));
            }
            patterns.push(finish(
                schema,
                &self.language,
                format!("{}-{}-t{}", self.action, self.language, index),
                elements,
                roles,
            ));
        }
        sort_by_priority(&mut patterns);
        Ok(patterns)
    }
}

/// Built-in templates.
pub fn builtin_templates() -> Vec<PatternTemplate> {
    vec![PatternTemplate::new(
        Action::Put,
        "zh",
        &["把 {patient} {verb} {destination}", "{verb} {patient} 到 {destination}"],
    )]
}

/// Marker a role takes in a language: the rendered form plus every other
/// accepted form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMarker {
    pub primary: String,
    pub alternatives: Vec<String>,
    pub attachment: Attachment,
}

/// Resolve a role's marker: render override, schema override, profile
/// default, empty.
pub fn resolve_marker(spec: &RoleSpec, profile: &LanguageProfile) -> ResolvedMarker {
    let code = profile.code.as_str();
    let rendered = spec.render_override_for(code);
    let overridden = spec.marker_override_for(code);
    let default = profile.marker(spec.role);

    let primary = rendered
        .or(overridden)
        .or(default.map(|m| m.primary.as_str()))
        .unwrap_or("")
        .to_string();

    let mut alternatives: Vec<String> = Vec::new();
    let candidates = overridden
        .into_iter()
        .chain(default.into_iter().flat_map(|m| m.forms()));
    for form in candidates {
        if !form.is_empty() && form != primary && !alternatives.iter().any(|a| a == form) {
            alternatives.push(form.to_string());
        }
    }
    // An empty override means "no marker"; the profile forms stay unused.
    if primary.is_empty() {
        alternatives.clear();
    }

    ResolvedMarker {
        primary,
        alternatives,
        attachment: default.map(|m| m.attachment).unwrap_or_default(),
    }
}

/// Derive every pattern of `schema` in `profile`, highest priority first.
pub fn patterns_for(schema: &CommandSchema, profile: &LanguageProfile) -> Vec<Pattern> {
    let required: Vec<&RoleSpec> = schema.required_roles().collect();
    let optional: Vec<&RoleSpec> = schema.optional_roles().collect();
    let sov = profile.is_sov();
    let count = 1usize << optional.len();

    let mut patterns = Vec::with_capacity(count);
    // Larger subsets first so that equal-priority ties favor declaration order.
    for mask in (0..count).rev() {
        let mut chosen = required.clone();
        for (bit, spec) in optional.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                chosen.push(spec);
            }
        }
        let ordered = schema.ordered(&chosen, sov);

        let mut parts: Vec<Vec<PatternElement>> = Vec::with_capacity(ordered.len());
        for spec in &ordered {
            parts.push(role_part(spec, profile));
        }
        let elements = place_verb(schema.action, parts, profile.verb.position);
        let roles = ordered.iter().map(|spec| spec.role).collect();

        patterns.push(finish(
            schema,
            &profile.code,
            format!("{}-{}-{}", schema.action, profile.code, patterns.len()),
            elements,
            roles,
        ));
    }
    sort_by_priority(&mut patterns);
    patterns
}

fn role_part(spec: &RoleSpec, profile: &LanguageProfile) -> Vec<PatternElement> {
    let value = PatternElement::Role {
        role: spec.role,
        expected: spec.expected.clone(),
    };
    let marker = resolve_marker(spec, profile);
    if marker.primary.is_empty() {
        return vec![value];
    }
    let literal = PatternElement::Literal {
        primary: marker.primary,
        alternatives: marker.alternatives,
        attachment: marker.attachment,
    };
    if profile.is_prepositional() {
        vec![literal, value]
    } else {
        vec![value, literal]
    }
}

fn place_verb(
    action: Action,
    parts: Vec<Vec<PatternElement>>,
    position: VerbPosition,
) -> Vec<PatternElement> {
    let verb = PatternElement::Keyword(action);
    let mut elements = Vec::new();
    match position {
        VerbPosition::Start => {
            elements.push(verb);
            elements.extend(parts.into_iter().flatten());
        }
        VerbPosition::End => {
            elements.extend(parts.into_iter().flatten());
            elements.push(verb);
        }
        VerbPosition::Second => {
            let mut parts = parts.into_iter();
            if let Some(first) = parts.next() {
                elements.extend(first);
            }
            elements.push(verb);
            elements.extend(parts.flatten());
        }
    }
    elements
}

fn finish(
    schema: &CommandSchema,
    language: &str,
    id: String,
    elements: Vec<PatternElement>,
    roles: Vec<Role>,
) -> Pattern {
    let defaults = schema
        .roles
        .iter()
        .filter(|spec| !roles.contains(&spec.role))
        .filter_map(|spec| spec.default.clone().map(|v| (spec.role, v)))
        .collect();
    Pattern {
        id,
        action: schema.action,
        language: language.to_string(),
        priority: BASE_PRIORITY + ROLE_PRIORITY * roles.len() as u32,
        declared: schema.roles.len(),
        elements,
        roles,
        defaults,
    }
}

/// Stable sort, highest priority first.
fn sort_by_priority(patterns: &mut [Pattern]) {
    patterns.sort_by(|a, b| b.priority.cmp(&a.priority));
}

// ============================================================================
// CACHE
// ============================================================================

/// Derived patterns keyed by `(action, language code)`.
///
/// Computation is pure, so two threads racing on the same key insert equal
/// values and either one may win.
#[derive(Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<(Action, String), Arc<Vec<Pattern>>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, action: Action, code: &str) -> Option<Arc<Vec<Pattern>>> {
        self.entries
            .read()
            .ok()?
            .get(&(action, code.to_string()))
            .cloned()
    }

    /// Cached value for the key, computing and inserting it on a miss.
    pub fn get_or_insert_with(
        &self,
        action: Action,
        code: &str,
        compute: impl FnOnce() -> Vec<Pattern>,
    ) -> Arc<Vec<Pattern>> {
        if let Some(hit) = self.get(action, code) {
            return hit;
        }
        let computed = Arc::new(compute());
        if let Ok(mut entries) = self.entries.write() {
            return entries
                .entry((action, code.to_string()))
                .or_insert(computed)
                .clone();
        }
        computed
    }

    /// Drop every entry for `code` and its variants (after re-registering a
    /// language).
    pub fn invalidate_language(&self, code: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|(_, c), _| c != code && base_code(c) != code);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages;
    use crate::schema::builtin_schemas;

    fn schema(action: Action) -> CommandSchema {
        builtin_schemas()
            .into_iter()
            .find(|s| s.action == action)
            .unwrap_or_else(|| CommandSchema::new(action, vec![]))
    }

    fn shape(pattern: &Pattern) -> Vec<String> {
        pattern
            .elements
            .iter()
            .map(|e| match e {
                PatternElement::Keyword(a) => format!("<{}>", a),
                PatternElement::Literal { primary, .. } => primary.clone(),
                PatternElement::Role { role, .. } => format!("{{{}}}", role),
            })
            .collect()
    }

    #[test]
    fn test_english_toggle_patterns() {
        let patterns = patterns_for(&schema(Action::Toggle), &languages::english());
        assert_eq!(patterns.len(), 2);
        assert_eq!(shape(&patterns[0]), vec!["<toggle>", "{patient}", "on", "{destination}"]);
        assert_eq!(patterns[0].priority, 120);
        assert_eq!(shape(&patterns[1]), vec!["<toggle>", "{patient}"]);
        assert_eq!(patterns[1].priority, 110);
    }

    #[test]
    fn test_marker_alternatives_include_profile_forms() {
        let toggle = schema(Action::Toggle);
        let english = languages::english();
        let destination = toggle.role(Role::Destination);
        let marker = destination.map(|spec| resolve_marker(spec, &english));
        assert_eq!(marker.as_ref().map(|m| m.primary.as_str()), Some("on"));
        assert!(marker
            .map(|m| m.alternatives.contains(&"to".to_string()))
            .unwrap_or(false));
    }

    #[test]
    fn test_empty_override_suppresses_marker() {
        let wait = schema(Action::Wait);
        let patterns = patterns_for(&wait, &languages::english());
        assert_eq!(shape(&patterns[0]), vec!["<wait>", "{duration}"]);
    }

    #[test]
    fn test_show_pattern_defaults_patient() {
        let patterns = patterns_for(&schema(Action::Show), &languages::english());
        let bare = patterns.iter().find(|p| p.roles.is_empty());
        assert_eq!(
            bare.map(|p| p.defaults.clone()),
            Some(vec![(Role::Patient, SemanticValue::reference("me"))])
        );
    }

    #[cfg(feature = "lang-ja")]
    #[test]
    fn test_japanese_ask_is_verb_final() {
        let patterns = patterns_for(&schema(Action::Ask), &languages::japanese());
        assert_eq!(
            shape(&patterns[0]),
            vec!["{source}", "から", "{patient}", "を", "<ask>"]
        );
    }

    #[cfg(feature = "lang-ja")]
    #[test]
    fn test_render_override_is_primary() {
        let patterns = patterns_for(&schema(Action::Go), &languages::japanese());
        match &patterns[0].elements[1] {
            PatternElement::Literal {
                primary,
                alternatives,
                ..
            } => {
                assert_eq!(primary, "へ");
                assert!(alternatives.contains(&"に".to_string()));
            }
            other => panic!("expected a marker literal, got {:?}", other),
        }
    }

    #[test]
    fn test_template_compiles() -> Result<(), LanguageError> {
        let templates = builtin_templates();
        let put = &templates[0];
        let patterns = put.compile(&schema(Action::Put))?;
        assert_eq!(patterns.len(), 2);
        assert_eq!(shape(&patterns[0]), vec!["把", "{patient}", "<put>", "{destination}"]);
        assert_eq!(patterns[0].id, "put-zh-t0");
        Ok(())
    }

    #[test]
    fn test_template_rejects_unknown_slot() {
        let template = PatternTemplate::new(Action::Put, "zh", &["{verb} {colour}"]);
        assert!(template.compile(&schema(Action::Put)).is_err());
        let template = PatternTemplate::new(Action::Put, "zh", &["{patient} {destination}"]);
        assert!(template.compile(&schema(Action::Put)).is_err());
    }

    #[test]
    fn test_cache_is_idempotent() {
        let cache = PatternCache::new();
        let english = languages::english();
        let toggle = schema(Action::Toggle);
        let first = cache.get_or_insert_with(Action::Toggle, "en", || patterns_for(&toggle, &english));
        let second = cache.get_or_insert_with(Action::Toggle, "en", Vec::new);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        cache.invalidate_language("en");
        assert!(cache.is_empty());
    }
}
