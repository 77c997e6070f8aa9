//! Polyscript Test Utilities
//!
//! Shared test infrastructure for the polyscript workspace:
//! - Proptest generators for values and semantic nodes
//! - Fixtures for registries, configs and sample commands
//! - Assertions over translation errors

pub use polyscript_core::{
    Action, LanguageError, MatchError, PolyscriptError, PolyscriptResult, Role, SemanticNode,
    SemanticValue, TranslateError, TranslatorConfig,
};
pub use polyscript_lang::{builtin_schemas, CommandSchema, Registry};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for semantic values and nodes.

    use super::*;
    use polyscript_core::ValueType;
    use polyscript_lang::RoleSpec;
    use proptest::prelude::*;
    use proptest::strategy::Union;

    /// Actions whose every role accepts a selector.
    pub const SELECTOR_ACTIONS: &[Action] = &[
        Action::Toggle,
        Action::Add,
        Action::Remove,
        Action::Show,
        Action::Hide,
        Action::Put,
        Action::Append,
        Action::Take,
        Action::Focus,
        Action::Blur,
        Action::Log,
        Action::Get,
    ];

    /// `#id` or `.class` selector.
    pub fn arb_selector() -> impl Strategy<Value = SemanticValue> {
        prop_oneof![
            "[a-z][a-z0-9]{0,7}".prop_map(|s| SemanticValue::selector(format!("#{}", s))),
            "[a-z][a-z0-9-]{0,7}[a-z0-9]".prop_map(|s| SemanticValue::selector(format!(".{}", s))),
        ]
    }

    /// String literal without quotes or escapes.
    pub fn arb_string() -> impl Strategy<Value = SemanticValue> {
        "[a-zA-Z0-9?!][a-zA-Z0-9 ?!]{0,10}".prop_map(SemanticValue::string)
    }

    pub fn arb_number() -> impl Strategy<Value = SemanticValue> {
        (1u32..1000).prop_map(|n| SemanticValue::number(n.to_string()))
    }

    pub fn arb_language() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["en", "es", "fr", "ja", "ko", "tr", "ar", "zh"])
    }

    /// Node for one of [`SELECTOR_ACTIONS`]: required and defaulted roles
    /// always bound, other optional roles sometimes.
    pub fn arb_selector_node() -> impl Strategy<Value = SemanticNode> {
        prop::sample::select(SELECTOR_ACTIONS.to_vec())
            .prop_flat_map(|action| arb_node_for(action, |_| arb_selector().boxed()))
    }

    /// Value of one of the `expected` kinds. Literals are numbers when
    /// nothing else is accepted, strings otherwise.
    pub fn arb_value_for(expected: &[ValueType]) -> BoxedStrategy<SemanticValue> {
        let literal_only = expected == [ValueType::Literal];
        let options: Vec<BoxedStrategy<SemanticValue>> = expected
            .iter()
            .map(|kind| match kind {
                ValueType::Literal if literal_only => arb_number().boxed(),
                ValueType::Literal => arb_string().boxed(),
                ValueType::Selector => arb_selector().boxed(),
                ValueType::Reference => Just(SemanticValue::reference("me")).boxed(),
                ValueType::Expression => prop::sample::select(IDENTIFIERS.to_vec())
                    .prop_map(SemanticValue::expression)
                    .boxed(),
                ValueType::PropertyPath => (arb_selector(), prop::sample::select(PROPERTIES.to_vec()))
                    .prop_map(|(object, property)| SemanticValue::property_path(object, property))
                    .boxed(),
            })
            .collect();
        if options.is_empty() {
            arb_selector().boxed()
        } else {
            Union::new(options).boxed()
        }
    }

    /// Command node for any keyworded action except `on`, with values drawn
    /// from each role's expected kinds.
    pub fn arb_command_node() -> impl Strategy<Value = SemanticNode> {
        let actions: Vec<Action> = Action::keyworded().filter(|a| *a != Action::On).collect();
        prop::sample::select(actions).prop_flat_map(|action| arb_node_for(action, schema_value))
    }

    /// `on click` handler, sometimes with a source, over one or two commands.
    pub fn arb_handler_node() -> impl Strategy<Value = SemanticNode> {
        let head = arb_node_for(Action::On, |spec| match spec.role {
            Role::Event => Just(SemanticValue::expression("click")).boxed(),
            _ => schema_value(spec),
        });
        (head, prop::collection::vec(arb_command_node(), 1..=2)).prop_map(|(mut handler, body)| {
            handler.body = body;
            handler
        })
    }

    /// A command or a handler.
    pub fn arb_any_node() -> impl Strategy<Value = SemanticNode> {
        prop_oneof![4 => arb_command_node(), 1 => arb_handler_node()]
    }

    const IDENTIFIERS: &[&str] = &["count", "total", "score"];
    const PROPERTIES: &[&str] = &["value", "width", "title"];

    fn schema_value(spec: &RoleSpec) -> BoxedStrategy<SemanticValue> {
        arb_value_for(&spec.expected)
    }

    /// Required and defaulted roles always bound, other optional roles
    /// sometimes.
    fn arb_node_for(
        action: Action,
        value: impl Fn(&RoleSpec) -> BoxedStrategy<SemanticValue>,
    ) -> BoxedStrategy<SemanticNode> {
        let schema = builtin_schemas()
            .into_iter()
            .find(|s| s.action == action)
            .unwrap_or_else(|| CommandSchema::new(action, Vec::new()));
        let slots = schema
            .roles
            .iter()
            .map(|spec| {
                let maybe = spec.optional && spec.default.is_none();
                let keep = if maybe { any::<bool>().boxed() } else { Just(true).boxed() };
                (Just(spec.role), keep, value(spec))
            })
            .collect::<Vec<_>>();
        slots
            .prop_map(move |bound| {
                bound
                    .into_iter()
                    .filter(|(_, keep, _)| *keep)
                    .fold(SemanticNode::new(action), |node, (role, _, value)| {
                        node.with_role(role, value)
                    })
            })
            .boxed()
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Registries, configs and sample commands.

    use super::*;
    use polyscript_lang::languages;
    use std::sync::Arc;

    /// One command said the same way in every built-in language.
    pub struct Parallel {
        pub node: SemanticNode,
        pub forms: &'static [(&'static str, &'static str)],
    }

    /// `toggle .active on #btn`
    pub fn toggle_on_button() -> Parallel {
        Parallel {
            node: SemanticNode::new(Action::Toggle)
                .with_role(Role::Patient, SemanticValue::selector(".active"))
                .with_role(Role::Destination, SemanticValue::selector("#btn")),
            forms: &[
                ("en", "toggle .active on #btn"),
                ("es", "alternar .active en #btn"),
                ("ja", ".active を #btn に 切り替え"),
                ("ar", "بدّل .active على #btn"),
            ],
        }
    }

    /// Registry holding the built-in base languages but no variants.
    pub fn registry_without_variants() -> Registry {
        let registry = Registry::new();
        for profile in languages::builtin_profiles() {
            registry.register_profile(profile);
        }
        for normalizer in languages::builtin_normalizers() {
            registry.register_normalizer(Arc::new(normalizer));
        }
        registry
    }

    /// Defaults with every threshold raised to `threshold`.
    pub fn strict_config(threshold: f32) -> TranslatorConfig {
        TranslatorConfig {
            default_threshold: threshold,
            sov_threshold: threshold,
            ..TranslatorConfig::default()
        }
    }

    /// Defaults with fallback to the original text turned off.
    pub fn no_fallback_config() -> TranslatorConfig {
        TranslatorConfig {
            fallback_to_original: false,
            ..TranslatorConfig::default()
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over translator results.

    use super::*;

    pub fn assert_no_match<T: std::fmt::Debug>(result: &PolyscriptResult<T>) {
        assert!(
            matches!(result, Err(PolyscriptError::Match(MatchError::NoMatch { .. }))),
            "Expected NoMatch, got {:?}",
            result
        );
    }

    pub fn assert_low_confidence<T: std::fmt::Debug>(result: &PolyscriptResult<T>) {
        assert!(
            matches!(result, Err(PolyscriptError::Match(MatchError::LowConfidence { .. }))),
            "Expected LowConfidence, got {:?}",
            result
        );
    }

    pub fn assert_unsupported<T: std::fmt::Debug>(result: &PolyscriptResult<T>) {
        assert!(
            matches!(
                result,
                Err(PolyscriptError::Language(LanguageError::Unsupported { .. }))
            ),
            "Expected Unsupported, got {:?}",
            result
        );
    }

    /// Asserts a compound failure names step `expected` (1-based).
    pub fn assert_step_failed<T: std::fmt::Debug>(result: &PolyscriptResult<T>, expected: usize) {
        match result {
            Err(PolyscriptError::Translate(TranslateError::StepFailed { step, .. })) => {
                assert_eq!(*step, expected, "Wrong failing step")
            }
            other => panic!("Expected StepFailed, got {:?}", other),
        }
    }

    /// Same action and roles; bodies compared recursively.
    pub fn assert_same_meaning(actual: &SemanticNode, expected: &SemanticNode) {
        assert_eq!(actual.action, expected.action, "Action mismatch");
        let mut actual_roles: Vec<_> = actual.roles.iter().collect();
        let mut expected_roles: Vec<_> = expected.roles.iter().collect();
        actual_roles.sort_by_key(|(role, _)| **role);
        expected_roles.sort_by_key(|(role, _)| **role);
        assert_eq!(actual_roles, expected_roles, "Roles of {} differ", actual.action);
        assert_eq!(actual.body.len(), expected.body.len(), "Body length mismatch");
        for (a, e) in actual.body.iter().zip(&expected.body) {
            assert_same_meaning(a, e);
        }
    }
}
