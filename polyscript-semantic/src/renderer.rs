//! Renderer
//!
//! The inverse of the matcher: emits natural-language text for a semantic
//! node in a target profile. Rendering never fails; missing keyword or
//! marker data falls back to canonical names.

use polyscript_core::value::escape_quoted;
use polyscript_core::{Action, LiteralType, Role, SemanticNode, SemanticValue};
use polyscript_lang::{
    resolve_marker, Attachment, CommandSchema, LanguageProfile, Pattern, PatternElement,
};
use std::sync::Arc;

/// Patterns and schema of one action in the target language.
pub struct ActionTables {
    pub patterns: Arc<Vec<Pattern>>,
    pub schema: Option<Arc<CommandSchema>>,
}

/// Render `node` with `lookup` supplying tables for each action met,
/// including body steps.
pub fn render(
    node: &SemanticNode,
    profile: &LanguageProfile,
    lookup: &dyn Fn(Action) -> ActionTables,
) -> String {
    match node.action {
        Action::Compound => join_steps(
            node.body.iter().map(|step| render(step, profile, lookup)),
            profile,
        ),
        _ => {
            let tables = lookup(node.action);
            let head = render_command(node, profile, &tables.patterns, tables.schema.as_deref());
            if node.body.is_empty() {
                head
            } else {
                let body = join_steps(
                    node.body.iter().map(|step| render(step, profile, lookup)),
                    profile,
                );
                format!("{} {}", head, body)
            }
        }
    }
}

/// Steps joined by the profile's primary connective.
pub fn join_steps(steps: impl Iterator<Item = String>, profile: &LanguageProfile) -> String {
    let separator = format!(" {} ", connective(profile));
    steps.collect::<Vec<_>>().join(&separator)
}

fn connective(profile: &LanguageProfile) -> &str {
    if profile.connective.primary.is_empty() {
        polyscript_lang::CANONICAL_THEN
    } else {
        &profile.connective.primary
    }
}

/// Words of `node` itself, body excluded.
pub fn render_command(
    node: &SemanticNode,
    profile: &LanguageProfile,
    patterns: &[Pattern],
    schema: Option<&CommandSchema>,
) -> String {
    let roles: Vec<Role> = node
        .role_names()
        .filter(|role| !dropped(node, *role, profile, schema))
        .collect();

    match patterns.iter().find(|p| p.binds_exactly(&roles)) {
        Some(pattern) => render_pattern(node, pattern, profile),
        None => render_fallback(node, &roles, profile, schema),
    }
}

/// Subject-drop languages omit roles still holding their schema default.
fn dropped(
    node: &SemanticNode,
    role: Role,
    profile: &LanguageProfile,
    schema: Option<&CommandSchema>,
) -> bool {
    profile.verb.subject_drop
        && schema
            .and_then(|s| s.default_for(role))
            .map(|default| node.role(role) == Some(default))
            .unwrap_or(false)
}

fn render_pattern(node: &SemanticNode, pattern: &Pattern, profile: &LanguageProfile) -> String {
    let mut out = Words::new(profile.is_prepositional());
    for element in &pattern.elements {
        match element {
            PatternElement::Keyword(action) => out.word(profile.keyword_primary(*action)),
            PatternElement::Literal {
                primary,
                attachment,
                ..
            } => out.marker(primary, *attachment),
            PatternElement::Role { role, .. } => match node.role(*role) {
                Some(value) => out.word(&render_value(value, profile)),
                None => out.word(role.as_str()),
            },
        }
    }
    out.finish()
}

/// Schema-ordered rendering for role sets no pattern binds.
fn render_fallback(
    node: &SemanticNode,
    roles: &[Role],
    profile: &LanguageProfile,
    schema: Option<&CommandSchema>,
) -> String {
    let sov = profile.is_sov();
    let position = |role: &Role| {
        schema
            .and_then(|s| s.role(*role))
            .map(|spec| spec.position(sov))
            .unwrap_or(u8::MAX)
    };
    let mut ordered = roles.to_vec();
    ordered.sort_by_key(position);

    let mut parts: Vec<(String, Attachment, String)> = Vec::with_capacity(ordered.len());
    for role in &ordered {
        let Some(value) = node.role(*role) else {
            continue;
        };
        let (marker, attachment) = match schema.and_then(|s| s.role(*role)) {
            Some(spec) => {
                let resolved = resolve_marker(spec, profile);
                (resolved.primary, resolved.attachment)
            }
            None => match profile.marker(*role) {
                Some(marker) => (marker.primary.clone(), marker.attachment),
                None => (role.as_str().to_string(), Attachment::Separate),
            },
        };
        parts.push((marker, attachment, render_value(value, profile)));
    }

    let mut out = Words::new(profile.is_prepositional());
    let verb = profile.keyword_primary(node.action).to_string();
    let verb_first = !matches!(profile.verb.position, polyscript_lang::VerbPosition::End);
    let second = profile.verb.position == polyscript_lang::VerbPosition::Second;
    if verb_first && !second {
        out.word(&verb);
    }
    for (index, (marker, attachment, value)) in parts.iter().enumerate() {
        if profile.is_prepositional() {
            out.marker(marker, *attachment);
            out.word(value);
        } else {
            out.word(value);
            out.marker(marker, *attachment);
        }
        if second && index == 0 {
            out.word(&verb);
        }
    }
    if !verb_first || (second && parts.is_empty()) {
        out.word(&verb);
    }
    out.finish()
}

/// Surface form of a value.
pub fn render_value(value: &SemanticValue, profile: &LanguageProfile) -> String {
    match value {
        SemanticValue::Literal { value, data_type } => match data_type {
            LiteralType::String => format!("\"{}\"", escape_quoted(value)),
            LiteralType::Number | LiteralType::Boolean => value.clone(),
        },
        SemanticValue::Selector { value, .. } => value.clone(),
        SemanticValue::Reference { value } => profile.reference(value).to_string(),
        SemanticValue::Expression { raw } => raw.clone(),
        SemanticValue::PropertyPath { object, property } => {
            let object = render_value(object, profile);
            let possessive = profile.possessive_marker();
            let joined = match possessive.attachment {
                Attachment::Attached => format!("{}{}", object, possessive.primary),
                Attachment::Apostrophe => format!("{}'{}", object, possessive.primary),
                Attachment::Separate => format!("{} {}", object, possessive.primary),
            };
            format!("{} {}", joined, property)
        }
    }
}

/// Word assembler honoring marker attachment.
struct Words {
    out: String,
    prepositional: bool,
    /// An attached prepositional marker waiting for its value.
    pending: Option<String>,
}

impl Words {
    fn new(prepositional: bool) -> Self {
        Self {
            out: String::new(),
            prepositional,
            pending: None,
        }
    }

    fn word(&mut self, word: &str) {
        let word = match self.pending.take() {
            Some(prefix) => format!("{}{}", prefix, word),
            None => word.to_string(),
        };
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.out.push_str(&word);
    }

    fn marker(&mut self, marker: &str, attachment: Attachment) {
        if marker.is_empty() {
            return;
        }
        match attachment {
            Attachment::Separate => self.word(marker),
            _ if self.prepositional => self.pending = Some(marker.to_string()),
            Attachment::Attached if !self.out.is_empty() => self.out.push_str(marker),
            Attachment::Apostrophe if !self.out.is_empty() => {
                self.out.push('\'');
                self.out.push_str(marker);
            }
            _ => self.word(marker),
        }
    }

    fn finish(mut self) -> String {
        if let Some(prefix) = self.pending.take() {
            self.word(&prefix);
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyscript_core::LanguageError;
    use polyscript_lang::Registry;

    fn render_in(registry: &Registry, code: &str, node: &SemanticNode) -> Result<String, LanguageError> {
        let profile = registry.profile(code)?;
        let lookup = |action: Action| ActionTables {
            patterns: registry
                .patterns(action, code)
                .unwrap_or_else(|_| Arc::new(Vec::new())),
            schema: registry.schema(action),
        };
        Ok(render(node, &profile, &lookup))
    }

    fn toggle() -> SemanticNode {
        SemanticNode::new(Action::Toggle)
            .with_role(Role::Patient, SemanticValue::selector(".active"))
            .with_role(Role::Destination, SemanticValue::selector("#btn"))
    }

    #[test]
    fn test_english_svo() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        assert_eq!(render_in(&registry, "en", &toggle())?, "toggle .active on #btn");
        Ok(())
    }

    #[test]
    fn test_string_values_are_quoted_and_escaped() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::Log).with_role(Role::Patient, SemanticValue::string("say \"hi\""));
        assert_eq!(render_in(&registry, "en", &node)?, r#"log "say \"hi\"""#);
        Ok(())
    }

    #[test]
    fn test_property_path_in_english() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::Log).with_role(
            Role::Patient,
            SemanticValue::property_path(SemanticValue::selector("#name"), "value"),
        );
        assert_eq!(render_in(&registry, "en", &node)?, "log #name's value");
        Ok(())
    }

    #[test]
    fn test_unbound_role_falls_back_to_schema_order() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::Log)
            .with_role(Role::Patient, SemanticValue::number("1"))
            .with_role(Role::Quantity, SemanticValue::number("2"));
        assert_eq!(render_in(&registry, "en", &node)?, "log 1 by 2");
        Ok(())
    }

    #[test]
    fn test_event_handler_renders_body() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::On)
            .with_role(Role::Event, SemanticValue::expression("click"))
            .with_body(vec![toggle(), SemanticNode::new(Action::Hide)
                .with_role(Role::Patient, SemanticValue::selector("#menu"))]);
        assert_eq!(
            render_in(&registry, "en", &node)?,
            "on click toggle .active on #btn then hide #menu"
        );
        Ok(())
    }

    #[cfg(feature = "lang-ja")]
    #[test]
    fn test_japanese_ask_places_verb_last() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::Ask)
            .with_role(Role::Patient, SemanticValue::string("名前は?"))
            .with_role(Role::Source, SemanticValue::selector("#form"));
        let text = render_in(&registry, "ja", &node)?;
        assert_eq!(text, "#form から \"名前は?\" を 尋ねる");
        let verb = text.find("尋ねる");
        let marker = text.find("から");
        assert!(verb > marker);
        Ok(())
    }

    #[cfg(feature = "lang-ja")]
    #[test]
    fn test_subject_drop_omits_default_patient() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::Show).with_role(Role::Patient, SemanticValue::reference("me"));
        assert_eq!(render_in(&registry, "ja", &node)?, "表示");
        assert_eq!(render_in(&registry, "en", &node)?, "show me");
        Ok(())
    }

    #[cfg(feature = "lang-ko")]
    #[test]
    fn test_korean_particles_attach() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::Increment).with_role(Role::Patient, SemanticValue::expression("count"));
        assert_eq!(render_in(&registry, "ko", &node)?, "count를 증가");
        Ok(())
    }

    #[cfg(feature = "lang-tr")]
    #[test]
    fn test_turkish_apostrophe_suffixes() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let node = SemanticNode::new(Action::Add)
            .with_role(Role::Patient, SemanticValue::selector(".active"))
            .with_role(Role::Destination, SemanticValue::selector("#btn"));
        assert_eq!(render_in(&registry, "tr", &node)?, ".active'i #btn'e ekle");
        Ok(())
    }

    #[cfg(feature = "lang-ar")]
    #[test]
    fn test_arabic_is_verb_initial() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let text = render_in(&registry, "ar", &toggle())?;
        assert_eq!(text, "بدّل .active على #btn");
        Ok(())
    }
}
