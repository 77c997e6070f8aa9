use super::{keywords, markers, references};
use crate::morphology::AffixNormalizer;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};

/// Turkish. Case suffixes follow non-word values after an apostrophe
/// (`#btn'e`) and keep vowel-harmony variants as alternatives.
pub fn turkish() -> LanguageProfile {
    LanguageProfile {
        code: "tr".to_string(),
        name: "Türkçe".to_string(),
        direction: Direction::Ltr,
        word_order: WordOrder::Sov,
        marking_strategy: MarkingStrategy::Agglutinative,
        segmentation: Segmentation::Whitespace,
        role_markers: markers(vec![
            (
                Role::Patient,
                Marker::apostrophe("i").or(&["ı", "u", "ü", "yi", "yı", "yu", "yü"]),
            ),
            (Role::Destination, Marker::apostrophe("e").or(&["a", "ye", "ya"])),
            (Role::Source, Marker::apostrophe("den").or(&["dan", "ten", "tan"])),
            (Role::Manner, Marker::separate("olarak").or(&["ile"])),
            (Role::Quantity, Marker::separate("kadar")),
            (Role::Duration, Marker::separate("boyunca")),
        ]),
        keywords: keywords(&[
            (Action::Toggle, "değiştir", &[]),
            (Action::Add, "ekle", &[]),
            (Action::Remove, "kaldır", &[]),
            (Action::Show, "göster", &[]),
            (Action::Hide, "gizle", &[]),
            (Action::Set, "ayarla", &[]),
            (Action::Get, "al", &[]),
            (Action::Put, "koy", &[]),
            (Action::Append, "iliştir", &[]),
            (Action::Take, "devral", &[]),
            (Action::Increment, "artır", &[]),
            (Action::Decrement, "azalt", &[]),
            (Action::Log, "kaydet", &[]),
            (Action::Send, "gönder", &[]),
            (Action::Trigger, "tetikle", &[]),
            (Action::Wait, "bekle", &[]),
            (Action::Transition, "geçiş", &[]),
            (Action::Go, "git", &[]),
            (Action::Call, "çağır", &[]),
            (Action::Focus, "odakla", &[]),
            (Action::Blur, "bulanıklaştır", &[]),
            (Action::Return, "döndür", &[]),
            (Action::Fetch, "getir", &[]),
            (Action::Ask, "sor", &[]),
            (Action::On, "olduğunda", &["zaman"]),
        ]),
        connective: KeywordEntry::new("sonra").or(&["ardından"]),
        references: references(&[
            ("me", "ben"),
            ("it", "o"),
            ("you", "sen"),
            ("result", "sonuç"),
            ("event", "olay"),
            ("target", "hedef"),
            ("body", "gövde"),
        ]),
        possessive: Some(
            Marker::apostrophe("nin").or(&["nın", "nun", "nün", "in", "ın", "un", "ün"]),
        ),
        verb: VerbInfo {
            position: VerbPosition::End,
            subject_drop: true,
        },
    }
}

/// Plural and polite imperatives, then infinitives.
pub fn turkish_normalizer() -> AffixNormalizer {
    AffixNormalizer::new("tr").with_suffixes(
        &[
            "yiniz", "yınız", "iniz", "ınız", "yin", "yın", "in", "ın", "un", "ün", "mek", "mak",
        ],
        2,
        0.1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::Normalizer;

    #[test]
    fn test_polite_imperative() {
        assert_eq!(turkish_normalizer().normalize("kaldırın").stem(), "kaldır");
        assert_eq!(turkish_normalizer().normalize("gösteriniz").stem(), "göster");
    }

    #[test]
    fn test_marker_words_are_not_stripped() {
        assert!(!turkish_normalizer().normalize("in").is_changed());
        assert!(!turkish_normalizer().normalize("nin").is_changed());
    }
}
