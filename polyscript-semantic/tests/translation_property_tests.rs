//! Property-Based Tests for Render/Parse Round-Trip
//!
//! Property: For any node N of a keyworded action and language L,
//! parse(render(N, L), L) SHALL produce a node with the same meaning.
//!
//! Nodes are built from the command schemas: every role gets a value of one
//! of its expected kinds, and handlers carry one or two body steps.
//!
//! This validates:
//! - Pattern derivation is symmetric between matcher and renderer
//! - Tokenization is deterministic
//! - Translation through any pivot language preserves the action

use polyscript_semantic::Translator;
use polyscript_test_utils::assertions::assert_same_meaning;
use polyscript_test_utils::generators::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_render_then_parse_keeps_meaning(node in arb_any_node(), code in arb_language()) {
        let translator = Translator::default();
        let text = translator.render(&node, code)?;
        let parsed = translator
            .parse(&text, code)
            .map_err(|e| TestCaseError::fail(format!("{}: {:?} -> {}", code, text, e)))?;
        assert_same_meaning(&parsed, &node);
    }

    #[test]
    fn prop_handler_body_survives_every_language(node in arb_handler_node(), code in arb_language()) {
        let translator = Translator::default();
        let text = translator.render(&node, code)?;
        let parsed = translator
            .parse(&text, code)
            .map_err(|e| TestCaseError::fail(format!("{}: {:?} -> {}", code, text, e)))?;
        prop_assert_eq!(parsed.body.len(), node.body.len());
        assert_same_meaning(&parsed, &node);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_selector_commands_keep_meaning(node in arb_selector_node(), code in arb_language()) {
        let translator = Translator::default();
        let text = translator.render(&node, code)?;
        let parsed = translator
            .parse(&text, code)
            .map_err(|e| TestCaseError::fail(format!("{}: {:?} -> {}", code, text, e)))?;
        assert_same_meaning(&parsed, &node);
    }

    #[test]
    fn prop_tokenize_is_deterministic(node in arb_any_node(), code in arb_language()) {
        let first = Translator::default();
        let second = Translator::default();
        let text = first.render(&node, code)?;
        prop_assert_eq!(first.tokenize(&text, code)?, second.tokenize(&text, code)?);
        prop_assert_eq!(
            first.parse(&text, code).ok(),
            second.parse(&text, code).ok()
        );
    }

    #[test]
    fn prop_pivot_translation_keeps_action(
        node in arb_any_node(),
        pivot in arb_language(),
    ) {
        let translator = Translator::default();
        let english = translator.render(&node, "en")?;
        let foreign = translator
            .translate(&english, "en", pivot)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let back = translator
            .parse(&foreign, pivot)
            .map_err(|e| TestCaseError::fail(format!("{}: {:?} -> {}", pivot, foreign, e)))?;
        prop_assert_eq!(back.action, node.action);
    }
}
