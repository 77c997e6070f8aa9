//! Translation orchestrator
//!
//! The only layer that knows thresholds and fallback policy. Input is split
//! into lines and then into steps at connective tokens; every step must
//! match above threshold or the whole request fails.

use crate::matcher::{match_tokens, MatchResult};
use crate::renderer::{self, ActionTables};
use polyscript_core::{
    is_explicit, parse_explicit, Action, LanguageError, MatchError, PolyscriptResult,
    SemanticNode, Token, TokenStream, TranslateError, TranslatorConfig,
};
use polyscript_lang::{LanguageProfile, Pattern, Registry, CANONICAL_THEN};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Best match of one step, accepted or not.
#[derive(Debug, Clone, PartialEq)]
pub struct StepAnalysis {
    pub tokens: Vec<Token>,
    pub matched: Option<MatchResult>,
}

/// What the matcher makes of a text, before any threshold is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub language: String,
    pub threshold: f32,
    pub steps: Vec<StepAnalysis>,
}

impl Analysis {
    /// True when every step matched at or above the threshold.
    pub fn is_accepted(&self) -> bool {
        !self.steps.is_empty()
            && self.steps.iter().all(|step| {
                step.matched
                    .as_ref()
                    .map(|m| m.confidence >= self.threshold)
                    .unwrap_or(false)
            })
    }

    /// Lowest step confidence; zero when any step failed to match.
    pub fn confidence(&self) -> f32 {
        self.steps
            .iter()
            .map(|s| s.matched.as_ref().map(|m| m.confidence).unwrap_or(0.0))
            .fold(1.0, f32::min)
    }
}

/// Translator over a shared registry.
#[derive(Debug, Clone)]
pub struct Translator {
    registry: Arc<Registry>,
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(registry: Arc<Registry>, config: TranslatorConfig) -> Self {
        Self { registry, config }
    }

    /// Built-in languages; normalizer penalties scaled by the config.
    pub fn with_config(config: TranslatorConfig) -> Self {
        let registry = Arc::new(Registry::with_morphology(&config.morphology));
        Self::new(registry, config)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn supported_languages(&self) -> Vec<String> {
        self.registry.supported_languages()
    }

    pub fn is_language_supported(&self, code: &str) -> bool {
        self.registry.is_language_supported(code)
    }

    /// Minimum confidence for `profile`: explicit per-language value, then
    /// the SOV threshold, then the default.
    pub fn threshold(&self, profile: &LanguageProfile) -> f32 {
        self.config
            .threshold_override(&profile.code)
            .unwrap_or(if profile.is_sov() {
                self.config.sov_threshold
            } else {
                self.config.default_threshold
            })
    }

    pub fn tokenize(&self, text: &str, code: &str) -> Result<TokenStream, LanguageError> {
        Ok(self.registry.tokenizer(code)?.tokenize(text))
    }

    /// Every step of `text` with its best match, thresholds not applied.
    pub fn analyze(&self, text: &str, code: &str) -> PolyscriptResult<Analysis> {
        let profile = self.registry.profile(code)?;
        let mut steps = Vec::new();
        for line in lines(text) {
            let stream = self.tokenize(line, code)?;
            for step in split_steps(&stream) {
                let matched = self.match_step(step, &profile)?;
                steps.push(StepAnalysis {
                    tokens: step.to_vec(),
                    matched,
                });
            }
        }
        Ok(Analysis {
            language: profile.code.clone(),
            threshold: self.threshold(&profile),
            steps,
        })
    }

    /// Parse `text` into a node. Explicit notation is accepted in any
    /// language. Several steps become a compound, or the body of a leading
    /// event handler.
    pub fn parse(&self, text: &str, code: &str) -> PolyscriptResult<SemanticNode> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyInput.into());
        }
        if is_explicit(text) {
            return Ok(parse_explicit(text.trim())?);
        }
        let profile = self.registry.profile(code)?;
        let mut nodes = Vec::new();
        for line in lines(text) {
            nodes.extend(self.parse_line(line, &profile)?);
        }
        Ok(assemble(nodes))
    }

    /// Never fails.
    pub fn can_parse(&self, text: &str, code: &str) -> bool {
        self.parse(text, code).is_ok()
    }

    /// Render `node` in `code`.
    pub fn render(&self, node: &SemanticNode, code: &str) -> Result<String, LanguageError> {
        let profile = self.registry.profile(code)?;
        Ok(self.render_in(node, &profile))
    }

    /// Translate `text` from one language to another, line by line.
    pub fn translate(&self, text: &str, from: &str, to: &str) -> PolyscriptResult<String> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyInput.into());
        }
        let source = self.registry.profile(from)?;
        let target = self.registry.profile(to)?;
        trace!(from = %source.code, to = %target.code, "Translating");

        if is_explicit(text) {
            let node = parse_explicit(text.trim())?;
            return Ok(self.render_in(&node, &target));
        }

        let mut out = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                out.push(String::new());
                continue;
            }
            let node = assemble(self.parse_line(line, &source)?);
            let rendered = self.render_in(&node, &target);
            if self.config.verify_round_trip {
                self.verify(&node, &rendered, &target)?;
            }
            out.push(rendered);
        }
        Ok(out.join("\n"))
    }

    /// Like [`Translator::translate`], but returns the input unchanged on
    /// failure when `fallback_to_original` is set.
    pub fn translate_or_original(&self, text: &str, from: &str, to: &str) -> PolyscriptResult<String> {
        match self.translate(text, from, to) {
            Ok(rendered) => Ok(rendered),
            Err(e) if self.config.fallback_to_original => {
                warn!(from = %from, to = %to, error = %e, "Translation failed; keeping original");
                Ok(text.to_string())
            }
            Err(e) => Err(e),
        }
    }

    fn parse_line(&self, line: &str, profile: &LanguageProfile) -> PolyscriptResult<Vec<SemanticNode>> {
        let stream = self.tokenize(line, &profile.code)?;
        let steps = split_steps(&stream);
        let threshold = self.threshold(profile);
        let compound = steps.len() > 1;

        let mut nodes = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let outcome = self.accept(step, profile, threshold);
            match outcome {
                Ok(node) => nodes.push(node),
                Err(e) if compound => {
                    return Err(TranslateError::StepFailed {
                        step: index + 1,
                        reason: e.to_string(),
                    }
                    .into())
                }
                Err(e) => return Err(e),
            }
        }
        if nodes.is_empty() {
            return Err(MatchError::NoMatch {
                language: profile.code.clone(),
                input: line.to_string(),
            }
            .into());
        }
        Ok(nodes)
    }

    /// Match one step and apply the threshold.
    fn accept(&self, step: &[Token], profile: &LanguageProfile, threshold: f32) -> PolyscriptResult<SemanticNode> {
        let input = || {
            step.iter()
                .map(|t| t.value.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let Some(result) = self.match_step(step, profile)? else {
            debug!(language = %profile.code, input = %input(), "No pattern matched");
            return Err(MatchError::NoMatch {
                language: profile.code.clone(),
                input: input(),
            }
            .into());
        };
        if result.confidence < threshold {
            debug!(
                language = %profile.code,
                pattern = %result.pattern_id,
                confidence = result.confidence,
                threshold = threshold,
                "Match below threshold"
            );
            return Err(MatchError::LowConfidence {
                language: profile.code.clone(),
                confidence: result.confidence,
                threshold,
            }
            .into());
        }
        trace!(pattern = %result.pattern_id, confidence = result.confidence, "Step accepted");
        Ok(result.node)
    }

    /// Candidate patterns are those of every action named in the step.
    fn match_step(&self, step: &[Token], profile: &LanguageProfile) -> Result<Option<MatchResult>, LanguageError> {
        let mut actions: Vec<Action> = Vec::new();
        for token in step {
            let Some(action) = token.normalized.as_deref().and_then(|n| n.parse::<Action>().ok()) else {
                continue;
            };
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        let tables: Vec<Arc<Vec<Pattern>>> = actions
            .iter()
            .map(|action| self.registry.patterns(*action, &profile.code))
            .collect::<Result<_, _>>()?;
        let candidates: Vec<&Pattern> = tables.iter().flat_map(|t| t.iter()).collect();
        Ok(match_tokens(step, profile, &candidates, &self.config.match_weights))
    }

    fn render_in(&self, node: &SemanticNode, profile: &LanguageProfile) -> String {
        let lookup = |action: Action| ActionTables {
            patterns: self
                .registry
                .patterns(action, &profile.code)
                .unwrap_or_else(|_| Arc::new(Vec::new())),
            schema: self.registry.schema(action),
        };
        renderer::render(node, profile, &lookup)
    }

    /// Re-parse a rendering in the target language.
    fn verify(&self, node: &SemanticNode, rendered: &str, target: &LanguageProfile) -> PolyscriptResult<()> {
        let mismatch = || TranslateError::RoundTripMismatch {
            language: target.code.clone(),
            rendered: rendered.to_string(),
        };
        let nodes = self.parse_line(rendered, target).map_err(|_| mismatch())?;
        if assemble(nodes).action != node.action {
            return Err(mismatch().into());
        }
        Ok(())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::with_config(TranslatorConfig::default())
    }
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// Steps of one line, split at connective tokens.
fn split_steps(stream: &TokenStream) -> Vec<&[Token]> {
    stream.split(|token| token.is_keyword(CANONICAL_THEN))
}

/// One node for a run of steps: a leading event handler absorbs the rest
/// into its body, otherwise several steps form a compound.
fn assemble(mut nodes: Vec<SemanticNode>) -> SemanticNode {
    if nodes.len() == 1 {
        return nodes.remove(0);
    }
    if nodes.first().map(|n| n.action == Action::On).unwrap_or(false) {
        let mut handler = nodes.remove(0);
        handler.body.extend(nodes);
        return handler;
    }
    SemanticNode::compound(nodes)
}
