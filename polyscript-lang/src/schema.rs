//! Command schemas: the role inventory of every action
//!
//! Schemas are the single source of truth for both directions. The pattern
//! generator derives match and render tables from them; the renderer falls
//! back to them when no pattern fits a node.

use polyscript_core::{base_code, Action, Role, SemanticValue, ValueType};
use std::collections::BTreeMap;

/// Wildcard key in marker override maps.
pub const ANY_LANGUAGE: &str = "*";

/// One role slot of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSpec {
    pub role: Role,
    pub svo_position: u8,
    pub sov_position: u8,
    pub expected: Vec<ValueType>,
    pub optional: bool,
    pub default: Option<SemanticValue>,
    /// Language code (or `*`) → marker used instead of the profile default.
    pub marker_override: BTreeMap<String, String>,
    /// Language code (or `*`) → marker emitted when rendering. Still accepted
    /// alongside the other forms when matching.
    pub render_override: BTreeMap<String, String>,
}

impl RoleSpec {
    pub fn required(role: Role, svo_position: u8, sov_position: u8, expected: &[ValueType]) -> Self {
        Self {
            role,
            svo_position,
            sov_position,
            expected: expected.to_vec(),
            optional: false,
            default: None,
            marker_override: BTreeMap::new(),
            render_override: BTreeMap::new(),
        }
    }

    pub fn optional(role: Role, svo_position: u8, sov_position: u8, expected: &[ValueType]) -> Self {
        Self {
            optional: true,
            ..Self::required(role, svo_position, sov_position, expected)
        }
    }

    pub fn with_default(mut self, value: SemanticValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Marker overrides as `(language, marker)` pairs.
    pub fn markers(mut self, overrides: &[(&str, &str)]) -> Self {
        self.marker_override.extend(
            overrides
                .iter()
                .map(|(code, marker)| (code.to_string(), marker.to_string())),
        );
        self
    }

    pub fn renders(mut self, overrides: &[(&str, &str)]) -> Self {
        self.render_override.extend(
            overrides
                .iter()
                .map(|(code, marker)| (code.to_string(), marker.to_string())),
        );
        self
    }

    /// Marker override for `code`: exact code, then base code, then `*`.
    pub fn marker_override_for(&self, code: &str) -> Option<&str> {
        lookup(&self.marker_override, code)
    }

    pub fn render_override_for(&self, code: &str) -> Option<&str> {
        lookup(&self.render_override, code)
    }

    pub fn position(&self, sov: bool) -> u8 {
        if sov {
            self.sov_position
        } else {
            self.svo_position
        }
    }
}

fn lookup<'a>(map: &'a BTreeMap<String, String>, code: &str) -> Option<&'a str> {
    map.get(code)
        .or_else(|| map.get(&base_code(code)))
        .or_else(|| map.get(ANY_LANGUAGE))
        .map(String::as_str)
}

/// Role inventory of one action.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSchema {
    pub action: Action,
    pub roles: Vec<RoleSpec>,
}

impl CommandSchema {
    pub fn new(action: Action, roles: Vec<RoleSpec>) -> Self {
        Self { action, roles }
    }

    pub fn role(&self, role: Role) -> Option<&RoleSpec> {
        self.roles.iter().find(|spec| spec.role == role)
    }

    pub fn required_roles(&self) -> impl Iterator<Item = &RoleSpec> {
        self.roles.iter().filter(|spec| !spec.optional)
    }

    pub fn optional_roles(&self) -> impl Iterator<Item = &RoleSpec> {
        self.roles.iter().filter(|spec| spec.optional)
    }

    pub fn default_for(&self, role: Role) -> Option<&SemanticValue> {
        self.role(role).and_then(|spec| spec.default.as_ref())
    }

    /// Roles sorted for the given word order; ties keep declaration order.
    pub fn ordered<'a>(&'a self, roles: &[&'a RoleSpec], sov: bool) -> Vec<&'a RoleSpec> {
        let mut ordered = roles.to_vec();
        ordered.sort_by_key(|spec| spec.position(sov));
        ordered
    }
}

use ValueType::{Expression, Literal, PropertyPath, Reference, Selector};

const TARGET: &[ValueType] = &[Selector, Reference, PropertyPath];
const CONTENT: &[ValueType] = &[Literal, Selector, Reference, PropertyPath];
const ANY: &[ValueType] = &[Literal, Selector, Reference, Expression, PropertyPath];
const AMOUNT: &[ValueType] = &[Literal];
const NAME: &[ValueType] = &[Literal, Expression];

fn me() -> SemanticValue {
    SemanticValue::reference("me")
}

/// Built-in schemas for every keyworded action.
pub fn builtin_schemas() -> Vec<CommandSchema> {
    use Role::*;

    let implied_target = |action| {
        CommandSchema::new(
            action,
            vec![RoleSpec::optional(Patient, 1, 1, TARGET).with_default(me())],
        )
    };

    vec![
        CommandSchema::new(
            Action::Toggle,
            vec![
                RoleSpec::required(Patient, 1, 1, CONTENT),
                RoleSpec::optional(Destination, 2, 2, TARGET).markers(&[
                    ("en", "on"),
                    ("es", "en"),
                    ("fr", "sur"),
                    ("ar", "على"),
                    ("zh", "在"),
                ]),
            ],
        ),
        CommandSchema::new(
            Action::Add,
            vec![
                RoleSpec::required(Patient, 1, 1, CONTENT),
                RoleSpec::optional(Destination, 2, 2, TARGET),
            ],
        ),
        CommandSchema::new(
            Action::Remove,
            vec![
                RoleSpec::required(Patient, 1, 2, CONTENT),
                RoleSpec::optional(Source, 2, 1, TARGET),
            ],
        ),
        implied_target(Action::Show),
        implied_target(Action::Hide),
        CommandSchema::new(
            Action::Set,
            vec![
                RoleSpec::required(Destination, 1, 1, ANY).markers(&[
                    (ANY_LANGUAGE, ""),
                    ("ja", "を"),
                    ("ko", "를"),
                    ("tr", "i"),
                ]),
                RoleSpec::required(Patient, 2, 2, ANY).markers(&[
                    ("en", "to"),
                    ("es", "a"),
                    ("fr", "à"),
                    ("ar", "إلى"),
                    ("zh", "为"),
                    ("ja", "に"),
                    ("ko", "로"),
                    ("tr", "e"),
                ]),
            ],
        ),
        CommandSchema::new(Action::Get, vec![RoleSpec::required(Patient, 1, 1, ANY)]),
        CommandSchema::new(
            Action::Put,
            vec![
                RoleSpec::required(Patient, 1, 1, ANY),
                RoleSpec::required(Destination, 2, 2, TARGET).markers(&[
                    ("en", "into"),
                    ("es", "en"),
                    ("fr", "dans"),
                    ("ar", "في"),
                ]),
            ],
        ),
        CommandSchema::new(
            Action::Append,
            vec![
                RoleSpec::required(Patient, 1, 1, ANY),
                RoleSpec::optional(Destination, 2, 2, TARGET),
            ],
        ),
        CommandSchema::new(
            Action::Take,
            vec![
                RoleSpec::required(Patient, 1, 2, CONTENT),
                RoleSpec::optional(Source, 2, 1, TARGET),
            ],
        ),
        CommandSchema::new(
            Action::Increment,
            vec![
                RoleSpec::required(Patient, 1, 1, TARGET),
                RoleSpec::optional(Quantity, 2, 2, AMOUNT),
            ],
        ),
        CommandSchema::new(
            Action::Decrement,
            vec![
                RoleSpec::required(Patient, 1, 1, TARGET),
                RoleSpec::optional(Quantity, 2, 2, AMOUNT),
            ],
        ),
        CommandSchema::new(Action::Log, vec![RoleSpec::required(Patient, 1, 1, ANY)]),
        CommandSchema::new(
            Action::Send,
            vec![
                RoleSpec::required(Patient, 1, 1, NAME),
                RoleSpec::optional(Destination, 2, 2, TARGET),
            ],
        ),
        CommandSchema::new(
            Action::Trigger,
            vec![
                RoleSpec::required(Patient, 1, 1, NAME),
                RoleSpec::optional(Destination, 2, 2, TARGET),
            ],
        ),
        CommandSchema::new(
            Action::Wait,
            vec![RoleSpec::required(Duration, 1, 1, AMOUNT).markers(&[(ANY_LANGUAGE, "")])],
        ),
        CommandSchema::new(
            Action::Transition,
            vec![
                RoleSpec::required(Patient, 1, 1, NAME),
                RoleSpec::required(Destination, 2, 2, ANY),
                RoleSpec::optional(Duration, 3, 3, AMOUNT),
            ],
        ),
        CommandSchema::new(
            Action::Go,
            vec![RoleSpec::required(Destination, 1, 1, ANY).renders(&[("ja", "へ")])],
        ),
        CommandSchema::new(Action::Call, vec![RoleSpec::required(Patient, 1, 1, ANY)]),
        implied_target(Action::Focus),
        implied_target(Action::Blur),
        CommandSchema::new(Action::Return, vec![RoleSpec::required(Patient, 1, 1, ANY)]),
        CommandSchema::new(
            Action::Fetch,
            vec![
                RoleSpec::required(Source, 1, 1, ANY).markers(&[
                    ("en", ""),
                    ("es", ""),
                    ("fr", ""),
                    ("zh", ""),
                    ("ar", ""),
                ]),
                RoleSpec::optional(Manner, 2, 2, NAME),
            ],
        ),
        CommandSchema::new(
            Action::Ask,
            vec![
                RoleSpec::required(Patient, 1, 2, ANY),
                RoleSpec::optional(Source, 2, 1, TARGET),
            ],
        ),
        CommandSchema::new(
            Action::On,
            vec![
                RoleSpec::required(Event, 1, 1, NAME),
                RoleSpec::optional(Source, 2, 2, TARGET),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyworded_action_has_a_schema() {
        let schemas = builtin_schemas();
        for action in Action::keyworded() {
            assert!(
                schemas.iter().any(|s| s.action == action),
                "missing schema for {}",
                action
            );
        }
        assert!(!schemas.iter().any(|s| s.action == Action::Compound));
    }

    #[test]
    fn test_override_lookup_order() {
        let spec = RoleSpec::required(Role::Duration, 1, 1, AMOUNT)
            .markers(&[(ANY_LANGUAGE, ""), ("ja", "かけて")]);
        assert_eq!(spec.marker_override_for("ja"), Some("かけて"));
        assert_eq!(spec.marker_override_for("es-MX"), Some(""));
        let spec = RoleSpec::required(Role::Destination, 1, 1, ANY).markers(&[("es", "en")]);
        assert_eq!(spec.marker_override_for("es-MX"), Some("en"));
        assert_eq!(spec.marker_override_for("fr"), None);
    }

    #[test]
    fn test_ordering_by_word_order() {
        let schemas = builtin_schemas();
        let remove = schemas
            .iter()
            .find(|s| s.action == Action::Remove)
            .map(|s| {
                let all: Vec<&RoleSpec> = s.roles.iter().collect();
                s.ordered(&all, true)
                    .iter()
                    .map(|r| r.role)
                    .collect::<Vec<_>>()
            });
        assert_eq!(remove, Some(vec![Role::Source, Role::Patient]));
    }

    #[test]
    fn test_implied_patient_default() {
        let schemas = builtin_schemas();
        let show = schemas.iter().find(|s| s.action == Action::Show);
        assert_eq!(
            show.and_then(|s| s.default_for(Role::Patient)),
            Some(&SemanticValue::reference("me"))
        );
    }
}
