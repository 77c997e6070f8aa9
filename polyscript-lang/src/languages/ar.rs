use super::{keywords, markers, references};
use crate::morphology::AffixNormalizer;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};

pub fn arabic() -> LanguageProfile {
    LanguageProfile {
        code: "ar".to_string(),
        name: "العربية".to_string(),
        direction: Direction::Rtl,
        word_order: WordOrder::Vso,
        marking_strategy: MarkingStrategy::Preposition,
        segmentation: Segmentation::Whitespace,
        role_markers: markers(vec![
            (Role::Destination, Marker::separate("إلى")),
            (Role::Source, Marker::separate("من")),
            (Role::Manner, Marker::separate("ك")),
            (Role::Quantity, Marker::separate("بمقدار")),
            (Role::Duration, Marker::separate("خلال").or(&["لمدة"])),
        ]),
        keywords: keywords(&[
            (Action::Toggle, "بدّل", &[]),
            (Action::Add, "أضف", &[]),
            (Action::Remove, "أزل", &["احذف"]),
            (Action::Show, "أظهر", &["اعرض"]),
            (Action::Hide, "أخفِ", &[]),
            (Action::Set, "عيّن", &[]),
            (Action::Get, "احصل", &[]),
            (Action::Put, "ضع", &[]),
            (Action::Append, "ألحق", &[]),
            (Action::Take, "خذ", &[]),
            (Action::Increment, "زِد", &[]),
            (Action::Decrement, "أنقص", &[]),
            (Action::Log, "سجّل", &[]),
            (Action::Send, "أرسل", &[]),
            (Action::Trigger, "أطلق", &[]),
            (Action::Wait, "انتظر", &[]),
            (Action::Transition, "انتقل", &[]),
            (Action::Go, "اذهب", &[]),
            (Action::Call, "استدعِ", &[]),
            (Action::Focus, "ركّز", &[]),
            (Action::Blur, "ضبّب", &[]),
            (Action::Return, "أرجع", &[]),
            (Action::Fetch, "اجلب", &[]),
            (Action::Ask, "اسأل", &[]),
            (Action::On, "عند", &["حين"]),
        ]),
        connective: KeywordEntry::new("ثم").or(&["بعدها"]),
        references: references(&[
            ("me", "أنا"),
            ("it", "هو"),
            ("you", "أنت"),
            ("result", "النتيجة"),
            ("event", "الحدث"),
            ("target", "الهدف"),
            ("body", "الجسم"),
        ]),
        possessive: None,
        verb: VerbInfo {
            position: VerbPosition::Start,
            subject_drop: true,
        },
    }
}

/// Conjunction, preposition and article prefixes; pronoun and plural
/// suffixes.
pub fn arabic_normalizer() -> AffixNormalizer {
    AffixNormalizer::new("ar")
        .with_prefixes(&["وال", "بال", "فال", "لل", "ال", "و", "ف", "ب", "ل"], 2, 0.1)
        .with_suffixes(&["ها", "ه", "ي", "وا", "ون", "ين", "ات"], 2, 0.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::Normalizer;

    #[test]
    fn test_conjunction_prefix() {
        let result = arabic_normalizer().normalize("وأضف");
        assert_eq!(result.stem(), "اضف");
        assert!((result.confidence() - 0.9).abs() < 1e-6);
    }
}
