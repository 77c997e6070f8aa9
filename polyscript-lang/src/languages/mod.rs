//! Built-in language data
//!
//! Each language is gated behind its `lang-*` feature; English is always
//! present.

mod en;
pub use en::english;

#[cfg(feature = "lang-ar")]
mod ar;
#[cfg(feature = "lang-ar")]
pub use ar::{arabic, arabic_normalizer};

#[cfg(feature = "lang-es")]
mod es;
#[cfg(feature = "lang-es")]
pub use es::{spanish, spanish_normalizer};

#[cfg(feature = "lang-fr")]
mod fr;
#[cfg(feature = "lang-fr")]
pub use fr::{french, french_normalizer};

#[cfg(feature = "lang-ja")]
mod ja;
#[cfg(feature = "lang-ja")]
pub use ja::{japanese, japanese_normalizer};

#[cfg(feature = "lang-ko")]
mod ko;
#[cfg(feature = "lang-ko")]
pub use ko::{korean, korean_normalizer};

#[cfg(feature = "lang-tr")]
mod tr;
#[cfg(feature = "lang-tr")]
pub use tr::{turkish, turkish_normalizer};

#[cfg(feature = "lang-zh")]
mod zh;
#[cfg(feature = "lang-zh")]
pub use zh::{chinese, chinese_normalizer};

use crate::morphology::AffixNormalizer;
use crate::profile::{KeywordEntry, LanguageProfile, Marker};
use polyscript_core::{Action, Role};
use std::collections::BTreeMap;

/// Mexican Spanish overlay on `es`.
#[cfg(feature = "lang-es")]
pub const ES_MX: &str = include_str!("variants/es-MX.yaml");

/// Every compiled-in base profile.
pub fn builtin_profiles() -> Vec<LanguageProfile> {
    #[allow(unused_mut)]
    let mut profiles = vec![english()];
    #[cfg(feature = "lang-es")]
    profiles.push(spanish());
    #[cfg(feature = "lang-fr")]
    profiles.push(french());
    #[cfg(feature = "lang-ja")]
    profiles.push(japanese());
    #[cfg(feature = "lang-ko")]
    profiles.push(korean());
    #[cfg(feature = "lang-tr")]
    profiles.push(turkish());
    #[cfg(feature = "lang-ar")]
    profiles.push(arabic());
    #[cfg(feature = "lang-zh")]
    profiles.push(chinese());
    profiles
}

/// Every compiled-in normalizer. English has none.
pub fn builtin_normalizers() -> Vec<AffixNormalizer> {
    #[allow(unused_mut)]
    let mut normalizers = Vec::new();
    #[cfg(feature = "lang-es")]
    normalizers.push(spanish_normalizer());
    #[cfg(feature = "lang-fr")]
    normalizers.push(french_normalizer());
    #[cfg(feature = "lang-ja")]
    normalizers.push(japanese_normalizer());
    #[cfg(feature = "lang-ko")]
    normalizers.push(korean_normalizer());
    #[cfg(feature = "lang-tr")]
    normalizers.push(turkish_normalizer());
    #[cfg(feature = "lang-ar")]
    normalizers.push(arabic_normalizer());
    #[cfg(feature = "lang-zh")]
    normalizers.push(chinese_normalizer());
    normalizers
}

/// Variant documents registered after the base profiles.
pub fn builtin_variants() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut variants = Vec::new();
    #[cfg(feature = "lang-es")]
    variants.push(ES_MX);
    variants
}

fn keywords(entries: &[(Action, &str, &[&str])]) -> BTreeMap<Action, KeywordEntry> {
    entries
        .iter()
        .map(|(action, primary, alternatives)| {
            (*action, KeywordEntry::new(*primary).or(alternatives))
        })
        .collect()
}

fn markers(entries: Vec<(Role, Marker)>) -> BTreeMap<Role, Marker> {
    entries.into_iter().collect()
}

fn references(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(canonical, local)| (canonical.to_string(), local.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::fold;
    use std::collections::HashMap;

    /// No two actions (or an action and the connective) may share a
    /// spelling within one language.
    #[test]
    fn test_keyword_forms_are_unique_per_language() {
        for profile in builtin_profiles() {
            let mut seen: HashMap<String, String> = HashMap::new();
            for (action, entry) in &profile.keywords {
                for form in entry.forms() {
                    let previous = seen.insert(fold(form), action.to_string());
                    assert!(
                        previous.is_none(),
                        "{}: {:?} used by {} and {:?}",
                        profile.code,
                        form,
                        action,
                        previous
                    );
                }
            }
            for form in profile.connective.forms() {
                assert!(!seen.contains_key(&fold(form)), "{}: connective {:?} is a keyword", profile.code, form);
            }
        }
    }

    #[test]
    fn test_every_profile_covers_every_keyworded_action() {
        for profile in builtin_profiles() {
            for action in Action::keyworded() {
                assert!(
                    profile.keyword(action).is_some(),
                    "{} has no keyword for {}",
                    profile.code,
                    action
                );
            }
        }
    }

    #[test]
    fn test_markers_never_collide_with_keywords() {
        for profile in builtin_profiles() {
            let keyword_forms: Vec<String> = profile
                .keywords
                .values()
                .flat_map(|k| k.forms().map(fold).collect::<Vec<_>>())
                .collect();
            for marker in profile.role_markers.values() {
                for form in marker.forms() {
                    assert!(
                        !keyword_forms.contains(&fold(form)),
                        "{}: marker {:?} is also a keyword",
                        profile.code,
                        form
                    );
                }
            }
        }
    }

    #[test]
    fn test_normalizers_match_profiles() {
        let codes: Vec<String> = builtin_profiles().into_iter().map(|p| p.code).collect();
        for normalizer in builtin_normalizers() {
            assert!(codes.iter().any(|c| c == normalizer.code()));
        }
    }
}
