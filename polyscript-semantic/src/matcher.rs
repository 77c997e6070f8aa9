//! Pattern matcher
//!
//! Aligns a token slice against candidate patterns, highest priority first,
//! and extracts a [`SemanticNode`] from the first full alignment. Event
//! handlers align as a prefix; whatever follows is matched as their body.

use polyscript_core::{
    Action, MatchWeights, Role, SemanticNode, SemanticValue, Token, TokenKind,
};
use polyscript_lang::{fold, LanguageProfile, Pattern, PatternElement};
use std::collections::HashSet;
use tracing::trace;

/// A successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub node: SemanticNode,
    pub confidence: f32,
    pub pattern_id: String,
}

/// Match `tokens` against `candidates` in `profile`.
pub fn match_tokens(
    tokens: &[Token],
    profile: &LanguageProfile,
    candidates: &[&Pattern],
    weights: &MatchWeights,
) -> Option<MatchResult> {
    Matcher::new(profile, weights).match_tokens(tokens, candidates)
}

/// Roles bound by one alignment, plus bookkeeping.
struct Alignment {
    roles: Vec<(Role, SemanticValue)>,
    consumed: usize,
    keyword_confidence: f32,
}

pub struct Matcher<'a> {
    profile: &'a LanguageProfile,
    weights: &'a MatchWeights,
    /// Folded marker words of the profile; never role values.
    markers: HashSet<String>,
    possessives: Vec<String>,
}

impl<'a> Matcher<'a> {
    pub fn new(profile: &'a LanguageProfile, weights: &'a MatchWeights) -> Self {
        let markers = profile
            .role_markers
            .values()
            .chain(profile.possessive.iter())
            .flat_map(|m| m.forms().map(fold).collect::<Vec<_>>())
            .filter(|f| !f.is_empty())
            .collect();
        let possessives = profile
            .possessive_marker()
            .forms()
            .map(fold)
            .filter(|f| !f.is_empty())
            .collect();
        Self {
            profile,
            weights,
            markers,
            possessives,
        }
    }

    /// Best match over `candidates`. Ties in priority keep candidate order.
    pub fn match_tokens(&self, tokens: &[Token], candidates: &[&Pattern]) -> Option<MatchResult> {
        let tokens = strip_eof(tokens);
        if tokens.is_empty() {
            return None;
        }
        let mut ordered: Vec<&Pattern> = candidates.to_vec();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

        for pattern in &ordered {
            let Some(alignment) = self.align(pattern, tokens) else {
                continue;
            };
            let rest = &tokens[alignment.consumed..];

            let (body, body_confidence) = if pattern.action == Action::On {
                if rest.is_empty() {
                    (Vec::new(), 1.0)
                } else {
                    let handlers: Vec<&Pattern> = ordered
                        .iter()
                        .copied()
                        .filter(|p| p.action != Action::On)
                        .collect();
                    match self.match_tokens(rest, &handlers) {
                        Some(inner) => (vec![inner.node], inner.confidence),
                        None => continue,
                    }
                }
            } else if rest.is_empty() {
                (Vec::new(), 1.0)
            } else {
                continue;
            };

            let confidence = alignment.keyword_confidence
                * self.weights.specificity(pattern.roles.len(), pattern.declared)
                * body_confidence;

            let mut node = SemanticNode::new(pattern.action);
            for (role, value) in alignment.roles {
                node = node.with_role(role, value);
            }
            for (role, value) in &pattern.defaults {
                if !node.has_role(*role) {
                    node = node.with_role(*role, value.clone());
                }
            }
            node.body = body;

            trace!(
                pattern = %pattern.id,
                confidence = confidence,
                "Pattern matched"
            );
            return Some(MatchResult {
                node,
                confidence,
                pattern_id: pattern.id.clone(),
            });
        }
        None
    }

    /// Positional alignment of `pattern` against the start of `tokens`.
    fn align(&self, pattern: &Pattern, tokens: &[Token]) -> Option<Alignment> {
        let literals: HashSet<String> = pattern
            .elements
            .iter()
            .flat_map(|e| e.literal_forms().into_iter().map(fold).collect::<Vec<_>>())
            .filter(|f| !f.is_empty())
            .collect();

        let mut i = 0;
        let mut roles = Vec::with_capacity(pattern.roles.len());
        let mut keyword_confidence = 1.0f32;

        for element in &pattern.elements {
            match element {
                PatternElement::Keyword(action) => {
                    let token = tokens.get(i)?;
                    if !token.is_keyword(action.as_str()) {
                        return None;
                    }
                    keyword_confidence *= token.confidence;
                    i += 1;
                }
                PatternElement::Literal {
                    primary,
                    alternatives,
                    ..
                } => {
                    if primary.is_empty() {
                        continue;
                    }
                    let token = tokens.get(i)?;
                    let folded = fold(&token.value);
                    let hit = std::iter::once(primary)
                        .chain(alternatives.iter())
                        .any(|form| fold(form) == folded);
                    if !hit {
                        return None;
                    }
                    i += 1;
                }
                PatternElement::Role { role, expected } => {
                    let (value, used) = self.value_at(tokens, i, &literals)?;
                    if !value.satisfies(expected) {
                        return None;
                    }
                    roles.push((*role, value));
                    i += used;
                }
            }
        }

        Some(Alignment {
            roles,
            consumed: i,
            keyword_confidence,
        })
    }

    /// One value unit at `i`, extended into a property path by possessives.
    fn value_at(
        &self,
        tokens: &[Token],
        i: usize,
        literals: &HashSet<String>,
    ) -> Option<(SemanticValue, usize)> {
        let token = tokens.get(i)?;
        let mut value = self.infer(token, literals)?;
        let mut used = 1;

        while let (Some(marker), Some(property)) = (tokens.get(i + used), tokens.get(i + used + 1)) {
            if !self.is_possessive(marker)
                || property.kind != TokenKind::Identifier
                || self.is_marker(property, literals)
            {
                break;
            }
            value = SemanticValue::property_path(value, property.value.clone());
            used += 2;
        }
        Some((value, used))
    }

    fn is_possessive(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Symbol => token.value == "'s",
            TokenKind::Identifier => self.possessives.contains(&fold(&token.value)),
            _ => false,
        }
    }

    fn is_marker(&self, token: &Token, literals: &HashSet<String>) -> bool {
        let folded = fold(&token.value);
        self.markers.contains(&folded) || literals.contains(&folded)
    }

    /// Value kind inferred from one token. Keywords, markers and symbols
    /// never fill a role.
    fn infer(&self, token: &Token, literals: &HashSet<String>) -> Option<SemanticValue> {
        match token.kind {
            TokenKind::Selector => Some(SemanticValue::selector(token.value.clone())),
            TokenKind::String => Some(SemanticValue::string(unquote(&token.value))),
            TokenKind::Number => Some(SemanticValue::number(token.value.clone())),
            TokenKind::Identifier => {
                if self.is_marker(token, literals) {
                    return None;
                }
                match token.value.as_str() {
                    "true" => return Some(SemanticValue::boolean(true)),
                    "false" => return Some(SemanticValue::boolean(false)),
                    _ => {}
                }
                match self.profile.canonical_reference(&token.value) {
                    Some(canonical) => Some(SemanticValue::reference(canonical)),
                    None => Some(SemanticValue::expression(token.value.clone())),
                }
            }
            TokenKind::Keyword | TokenKind::Symbol | TokenKind::Eof => None,
        }
    }
}

fn strip_eof(tokens: &[Token]) -> &[Token] {
    match tokens.split_last() {
        Some((last, rest)) if last.is_eof() => rest,
        _ => tokens,
    }
}

/// Raw string token text → literal value: quotes removed, escapes resolved.
pub fn unquote(raw: &str) -> String {
    let mut chars = raw.chars();
    let close = match chars.next() {
        Some('"') => '"',
        Some('\'') => '\'',
        Some('「') => '」',
        _ => return raw.to_string(),
    };
    let inner: &str = chars.as_str();
    let inner = inner.strip_suffix(close).unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut escaped = inner.chars();
    while let Some(c) = escaped.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match escaped.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyscript_core::{LanguageError, TokenStream};
    use polyscript_lang::Registry;
    use std::sync::Arc;

    fn run(registry: &Registry, code: &str, text: &str) -> Result<Option<MatchResult>, LanguageError> {
        let profile = registry.profile(code)?;
        let stream: TokenStream = registry.tokenizer(code)?.tokenize(text);
        let mut arcs: Vec<Arc<Vec<Pattern>>> = Vec::new();
        for token in stream.significant() {
            if let Some(action) = token.normalized.as_deref().and_then(|n| n.parse::<Action>().ok()) {
                arcs.push(registry.patterns(action, code)?);
            }
        }
        let candidates: Vec<&Pattern> = arcs.iter().flat_map(|a| a.iter()).collect();
        Ok(match_tokens(
            stream.tokens(),
            &profile,
            &candidates,
            &MatchWeights::default(),
        ))
    }

    #[test]
    fn test_two_role_pattern_wins() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let Some(result) = run(&registry, "en", "toggle .active on #btn")? else {
            panic!("expected a match");
        };
        assert_eq!(result.node.action, Action::Toggle);
        assert_eq!(result.node.role(Role::Patient), Some(&SemanticValue::selector(".active")));
        assert_eq!(result.node.role(Role::Destination), Some(&SemanticValue::selector("#btn")));
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.pattern_id, "toggle-en-0");
        Ok(())
    }

    #[test]
    fn test_partial_alignment_is_rejected() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        assert!(run(&registry, "en", "toggle .active #btn")?.is_none());
        assert!(run(&registry, "en", "toggle")?.is_none());
        Ok(())
    }

    #[test]
    fn test_default_fills_unbound_role() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let result = run(&registry, "en", "show")?;
        let node = result.as_ref().map(|r| &r.node);
        assert_eq!(
            node.and_then(|n| n.role(Role::Patient)),
            Some(&SemanticValue::reference("me"))
        );
        assert!((result.map(|r| r.confidence).unwrap_or(0.0) - 0.8).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_type_inference() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let log = |text: &str| -> Result<Option<SemanticValue>, LanguageError> {
            Ok(run(&registry, "en", text)?.and_then(|r| r.node.role(Role::Patient).cloned()))
        };
        assert_eq!(log(r#"log "a \"b\"""#)?, Some(SemanticValue::string("a \"b\"")));
        assert_eq!(log("log 42")?, Some(SemanticValue::number("42")));
        assert_eq!(log("log true")?, Some(SemanticValue::boolean(true)));
        assert_eq!(log("log it")?, Some(SemanticValue::reference("it")));
        assert_eq!(log("log count")?, Some(SemanticValue::expression("count")));
        Ok(())
    }

    #[test]
    fn test_property_path() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let result = run(&registry, "en", "log #name's value")?;
        assert_eq!(
            result.and_then(|r| r.node.role(Role::Patient).cloned()),
            Some(SemanticValue::property_path(
                SemanticValue::selector("#name"),
                "value"
            ))
        );
        Ok(())
    }

    #[test]
    fn test_literal_role_rejects_selector() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        assert!(run(&registry, "en", "wait #btn")?.is_none());
        assert!(run(&registry, "en", "wait 2s")?.is_some());
        Ok(())
    }

    #[test]
    fn test_event_handler_takes_body() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let result = run(&registry, "en", "on click toggle .active")?;
        let node = result.map(|r| r.node);
        assert_eq!(node.as_ref().map(|n| n.action), Some(Action::On));
        assert_eq!(
            node.as_ref().and_then(|n| n.role(Role::Event)),
            Some(&SemanticValue::expression("click"))
        );
        assert_eq!(
            node.and_then(|n| n.body.first().map(|b| b.action)),
            Some(Action::Toggle)
        );
        Ok(())
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a\\\\b\""), "a\\b");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("「こんにちは」"), "こんにちは");
        assert_eq!(unquote("\"open"), "open");
    }

    #[cfg(feature = "lang-ja")]
    #[test]
    fn test_japanese_markers_are_not_values() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let result = run(&registry, "ja", "#box から \"x\" を 尋ねる")?;
        let node = result.map(|r| r.node);
        assert_eq!(node.as_ref().map(|n| n.action), Some(Action::Ask));
        assert_eq!(
            node.and_then(|n| n.role(Role::Source).cloned()),
            Some(SemanticValue::selector("#box"))
        );
        Ok(())
    }
}
