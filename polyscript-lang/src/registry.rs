//! Language registry
//!
//! Owns every profile, normalizer, tokenizer, schema and template, and the
//! derived-pattern cache. Registration takes `&self`, so one registry can be
//! shared behind an `Arc` and extended at runtime.

use crate::languages;
use crate::morphology::Normalizer;
use crate::pattern::{
    builtin_templates, patterns_for, Pattern, PatternCache, PatternElement, PatternTemplate,
};
use crate::profile::{LanguageProfile, VariantHeader};
use crate::schema::{builtin_schemas, CommandSchema};
use crate::tokenizer::{LanguageTokenizer, Tokenizer};
use polyscript_core::{base_code, Action, LanguageError, MorphologyWeights};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace, warn};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of languages and command schemas.
pub struct Registry {
    profiles: RwLock<HashMap<String, Arc<LanguageProfile>>>,
    normalizers: RwLock<HashMap<String, Arc<dyn Normalizer>>>,
    tokenizers: RwLock<HashMap<String, Arc<dyn Tokenizer>>>,
    /// Codes whose tokenizer was registered by hand and is never rebuilt.
    custom_tokenizers: RwLock<HashSet<String>>,
    schemas: RwLock<BTreeMap<Action, Arc<CommandSchema>>>,
    templates: RwLock<HashMap<(Action, String), PatternTemplate>>,
    patterns: PatternCache,
}

impl Registry {
    /// Registry with the built-in schemas and templates but no languages.
    pub fn new() -> Self {
        let registry = Self {
            profiles: RwLock::new(HashMap::new()),
            normalizers: RwLock::new(HashMap::new()),
            tokenizers: RwLock::new(HashMap::new()),
            custom_tokenizers: RwLock::new(HashSet::new()),
            schemas: RwLock::new(
                builtin_schemas()
                    .into_iter()
                    .map(|schema| (schema.action, Arc::new(schema)))
                    .collect(),
            ),
            templates: RwLock::new(HashMap::new()),
            patterns: PatternCache::new(),
        };
        for template in builtin_templates() {
            if let Err(e) = registry.register_override(template) {
                warn!(error = %e, "Skipping built-in template");
            }
        }
        registry
    }

    /// Every compiled-in language with default morphology weights.
    pub fn builtin() -> Self {
        Self::with_morphology(&MorphologyWeights::default())
    }

    /// Every compiled-in language, scaling normalizer penalties.
    pub fn with_morphology(weights: &MorphologyWeights) -> Self {
        let registry = Self::new();
        for profile in languages::builtin_profiles() {
            registry.register_profile(profile);
        }
        for normalizer in languages::builtin_normalizers() {
            registry.register_normalizer(Arc::new(normalizer.with_weight_scale(weights.weight_scale)));
        }
        for variant in languages::builtin_variants() {
            if let Err(e) = registry.register_variant_yaml(variant) {
                warn!(error = %e, "Skipping built-in variant");
            }
        }
        debug!(languages = registry.supported_languages().len(), "Built-in registry ready");
        registry
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Add or replace a profile. Cached patterns and tokenizers for the code
    /// are dropped.
    pub fn register_profile(&self, profile: LanguageProfile) {
        let code = profile.code.clone();
        debug!(code = %code, keywords = profile.keywords.len(), "Registering language profile");
        write(&self.profiles).insert(code.clone(), Arc::new(profile));
        self.invalidate(&code);
    }

    /// Register a variant document (`code`, `extends`, partial profile
    /// fields). The base must already be registered.
    pub fn register_variant_yaml(&self, source: &str) -> Result<String, LanguageError> {
        let header = VariantHeader::from_yaml(source)?;
        let base = read(&self.profiles).get(&header.extends).cloned().ok_or_else(|| {
            LanguageError::MissingBase {
                code: header.code.clone(),
                base: header.extends.clone(),
            }
        })?;
        let merged = base.merge_yaml(source)?;
        if merged.code != header.code {
            return Err(LanguageError::InvalidProfile {
                code: header.code,
                reason: format!("merged profile reports code {}", merged.code),
            });
        }
        let code = merged.code.clone();
        debug!(code = %code, base = %header.extends, "Registering language variant");
        self.register_profile(merged);
        Ok(code)
    }

    pub fn register_normalizer(&self, normalizer: Arc<dyn Normalizer>) {
        let code = normalizer.language().to_string();
        debug!(code = %code, "Registering normalizer");
        write(&self.normalizers).insert(code.clone(), normalizer);
        self.invalidate(&code);
    }

    /// Install a hand-written tokenizer for `code`, replacing the derived one.
    pub fn register_tokenizer(&self, code: &str, tokenizer: Arc<dyn Tokenizer>) {
        debug!(code = %code, "Registering custom tokenizer");
        write(&self.custom_tokenizers).insert(code.to_string());
        write(&self.tokenizers).insert(code.to_string(), tokenizer);
    }

    /// Add or replace the schema for its action. Every derived pattern is
    /// dropped.
    pub fn register_schema(&self, schema: CommandSchema) {
        debug!(action = %schema.action, roles = schema.roles.len(), "Registering schema");
        write(&self.schemas).insert(schema.action, Arc::new(schema));
        self.patterns.clear();
        self.drop_derived_tokenizers(None);
    }

    /// Replace derived patterns of one `(action, language)` pair. The
    /// template is compiled against the current schema before it is kept.
    pub fn register_override(&self, template: PatternTemplate) -> Result<(), LanguageError> {
        let schema = self.schema(template.action).ok_or_else(|| LanguageError::InvalidProfile {
            code: template.language.clone(),
            reason: format!("no schema for {}", template.action),
        })?;
        template.compile(&schema)?;
        let code = template.language.clone();
        debug!(action = %template.action, code = %code, "Registering pattern template");
        write(&self.templates).insert((template.action, code.clone()), template);
        self.invalidate(&code);
        Ok(())
    }

    fn invalidate(&self, code: &str) {
        self.patterns.invalidate_language(code);
        self.drop_derived_tokenizers(Some(code));
    }

    fn drop_derived_tokenizers(&self, code: Option<&str>) {
        let custom = read(&self.custom_tokenizers);
        write(&self.tokenizers).retain(|key, _| {
            custom.contains(key)
                || code
                    .map(|code| key != code && base_code(key) != code)
                    .unwrap_or(false)
        });
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Profile for `code`, falling back to its base code (`es-MX` → `es`).
    pub fn profile(&self, code: &str) -> Result<Arc<LanguageProfile>, LanguageError> {
        let profiles = read(&self.profiles);
        profiles
            .get(code)
            .or_else(|| profiles.get(&base_code(code)))
            .cloned()
            .ok_or_else(|| LanguageError::Unsupported {
                code: code.to_string(),
            })
    }

    pub fn is_language_supported(&self, code: &str) -> bool {
        self.profile(code).is_ok()
    }

    /// Registered codes, sorted.
    pub fn supported_languages(&self) -> Vec<String> {
        let mut codes: Vec<String> = read(&self.profiles).keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn schema(&self, action: Action) -> Option<Arc<CommandSchema>> {
        read(&self.schemas).get(&action).cloned()
    }

    pub fn schemas(&self) -> Vec<Arc<CommandSchema>> {
        read(&self.schemas).values().cloned().collect()
    }

    /// Normalizer for `code` or its base code.
    pub fn normalizer(&self, code: &str) -> Option<Arc<dyn Normalizer>> {
        let normalizers = read(&self.normalizers);
        normalizers
            .get(code)
            .or_else(|| normalizers.get(&base_code(code)))
            .cloned()
    }

    fn template(&self, action: Action, code: &str) -> Option<PatternTemplate> {
        let templates = read(&self.templates);
        templates
            .get(&(action, code.to_string()))
            .or_else(|| templates.get(&(action, base_code(code))))
            .cloned()
    }

    /// Patterns for `action` in `code`, highest priority first. Computed on
    /// first use and cached.
    pub fn patterns(&self, action: Action, code: &str) -> Result<Arc<Vec<Pattern>>, LanguageError> {
        let profile = self.profile(code)?;
        let Some(schema) = self.schema(action) else {
            return Ok(Arc::new(Vec::new()));
        };
        Ok(self.patterns.get_or_insert_with(action, &profile.code, || {
            trace!(action = %action, code = %profile.code, "Deriving patterns");
            if let Some(template) = self.template(action, &profile.code) {
                match template.compile(&schema) {
                    Ok(patterns) => return patterns,
                    Err(e) => warn!(error = %e, "Template no longer compiles; deriving instead"),
                }
            }
            patterns_for(&schema, &profile)
        }))
    }

    /// Tokenizer for `code`, built from the profile on first use.
    pub fn tokenizer(&self, code: &str) -> Result<Arc<dyn Tokenizer>, LanguageError> {
        if let Some(hit) = read(&self.tokenizers).get(code) {
            return Ok(Arc::clone(hit));
        }
        let profile = self.profile(code)?;
        if let Some(hit) = read(&self.tokenizers).get(&profile.code) {
            return Ok(Arc::clone(hit));
        }

        let vocabulary = self.vocabulary(&profile.code);
        trace!(code = %profile.code, extra = vocabulary.len(), "Building tokenizer");
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(
            LanguageTokenizer::new(Arc::clone(&profile), self.normalizer(&profile.code))
                .with_vocabulary(vocabulary),
        );
        Ok(Arc::clone(
            write(&self.tokenizers)
                .entry(profile.code.clone())
                .or_insert(tokenizer),
        ))
    }

    /// Words a segmenting tokenizer must know beyond the profile tables:
    /// schema marker overrides and template literals.
    fn vocabulary(&self, code: &str) -> Vec<String> {
        let mut words = Vec::new();
        for schema in self.schemas() {
            for spec in &schema.roles {
                words.extend(
                    spec.marker_override_for(code)
                        .into_iter()
                        .chain(spec.render_override_for(code))
                        .filter(|w| !w.is_empty())
                        .map(str::to_string),
                );
            }
            if let Some(template) = self.template(schema.action, code) {
                if let Ok(patterns) = template.compile(&schema) {
                    for element in patterns.iter().flat_map(|p| p.elements.iter()) {
                        if let PatternElement::Literal { .. } = element {
                            words.extend(element.literal_forms().into_iter().map(str::to_string));
                        }
                    }
                }
            }
        }
        words
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("languages", &self.supported_languages())
            .field("schemas", &read(&self.schemas).len())
            .field("patterns", &self.patterns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RoleSpec;
    use polyscript_core::{Role, TokenKind, ValueType};

    #[test]
    fn test_unknown_language_is_unsupported() {
        let registry = Registry::builtin();
        assert!(registry.is_language_supported("en"));
        assert_eq!(
            registry.profile("xx").map(|p| p.code.clone()),
            Err(LanguageError::Unsupported {
                code: "xx".to_string()
            })
        );
    }

    #[test]
    fn test_region_falls_back_to_base() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        assert_eq!(registry.profile("en-GB")?.code, "en");
        Ok(())
    }

    #[cfg(feature = "lang-es")]
    #[test]
    fn test_builtin_variant_overlays_base() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let mx = registry.profile("es-MX")?;
        assert_eq!(mx.code, "es-MX");
        assert_eq!(mx.keyword_primary(Action::Take), "agarrar");
        assert_eq!(mx.keyword_primary(Action::Toggle), "alternar");
        assert_eq!(mx.reference("you"), "usted");
        assert!(registry.normalizer("es-MX").is_some());
        Ok(())
    }

    #[test]
    fn test_variant_requires_base() {
        let registry = Registry::new();
        let result = registry.register_variant_yaml("code: pt-BR\nextends: pt\n");
        assert_eq!(
            result,
            Err(LanguageError::MissingBase {
                code: "pt-BR".to_string(),
                base: "pt".to_string()
            })
        );
    }

    #[test]
    fn test_patterns_are_cached_and_invalidated() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let first = registry.patterns(Action::Toggle, "en")?;
        let second = registry.patterns(Action::Toggle, "en")?;
        assert!(Arc::ptr_eq(&first, &second));

        registry.register_schema(CommandSchema::new(
            Action::Toggle,
            vec![RoleSpec::required(Role::Patient, 1, 1, &[ValueType::Selector])],
        ));
        let third = registry.patterns(Action::Toggle, "en")?;
        assert_eq!(third.len(), 1);
        Ok(())
    }

    #[cfg(feature = "lang-es")]
    #[test]
    fn test_base_override_reaches_cached_variant() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let before = registry.patterns(Action::Log, "es-MX")?;
        assert!(before.iter().all(|p| !p.id.contains("-t")));

        registry.register_override(PatternTemplate::new(
            Action::Log,
            "es",
            &["por favor {verb} {patient}"],
        ))?;
        let ids = |code: &str| -> Result<Vec<String>, LanguageError> {
            Ok(registry.patterns(Action::Log, code)?.iter().map(|p| p.id.clone()).collect())
        };
        assert_eq!(ids("es")?, vec!["log-es-t0".to_string()]);
        assert_eq!(ids("es-MX")?, ids("es")?);
        Ok(())
    }

    #[test]
    fn test_template_replaces_derived_patterns() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        registry.register_override(PatternTemplate::new(
            Action::Log,
            "en",
            &["please {verb} {patient}"],
        ))?;
        let patterns = registry.patterns(Action::Log, "en")?;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].id, "log-en-t0");
        Ok(())
    }

    #[test]
    fn test_bad_template_is_rejected() {
        let registry = Registry::builtin();
        let result = registry.register_override(PatternTemplate::new(Action::Log, "en", &["{verb} {colour}"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_tokenizer_is_shared() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let a = registry.tokenizer("en")?;
        let b = registry.tokenizer("en-US")?;
        assert!(Arc::ptr_eq(&a, &b));
        let stream = a.tokenize("toggle .x");
        assert_eq!(stream.significant()[0].kind, TokenKind::Keyword);
        Ok(())
    }

    #[cfg(feature = "lang-zh")]
    #[test]
    fn test_segmenting_tokenizer_learns_schema_markers() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let tokenizer = registry.tokenizer("zh")?;
        let stream = tokenizer.tokenize("把\"你好\"放置#out");
        let values: Vec<_> = stream.significant().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["把", "\"你好\"", "放置", "#out"]);
        Ok(())
    }

    #[test]
    fn test_custom_tokenizer_survives_profile_updates() -> Result<(), LanguageError> {
        let registry = Registry::builtin();
        let custom: Arc<dyn Tokenizer> = Arc::new(LanguageTokenizer::new(
            Arc::new(languages::english()),
            None,
        ));
        registry.register_tokenizer("en", Arc::clone(&custom));
        registry.register_profile(languages::english());
        assert!(Arc::ptr_eq(&registry.tokenizer("en")?, &custom));
        Ok(())
    }
}
