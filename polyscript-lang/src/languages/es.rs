use super::{keywords, markers, references};
use crate::morphology::AffixNormalizer;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};

pub fn spanish() -> LanguageProfile {
    LanguageProfile {
        code: "es".to_string(),
        name: "Español".to_string(),
        direction: Direction::Ltr,
        word_order: WordOrder::Svo,
        marking_strategy: MarkingStrategy::Preposition,
        segmentation: Segmentation::Whitespace,
        role_markers: markers(vec![
            (Role::Destination, Marker::separate("a").or(&["en"])),
            (Role::Source, Marker::separate("de").or(&["desde"])),
            (Role::Manner, Marker::separate("como")),
            (Role::Quantity, Marker::separate("por")),
            (Role::Duration, Marker::separate("durante")),
        ]),
        keywords: keywords(&[
            (Action::Toggle, "alternar", &[]),
            (Action::Add, "agregar", &["añadir"]),
            (Action::Remove, "quitar", &["eliminar"]),
            (Action::Show, "mostrar", &[]),
            (Action::Hide, "ocultar", &[]),
            (Action::Set, "establecer", &["fijar"]),
            (Action::Get, "obtener", &[]),
            (Action::Put, "poner", &[]),
            (Action::Append, "anexar", &[]),
            (Action::Take, "tomar", &[]),
            (Action::Increment, "incrementar", &["aumentar"]),
            (Action::Decrement, "decrementar", &["disminuir"]),
            (Action::Log, "registrar", &[]),
            (Action::Send, "enviar", &[]),
            (Action::Trigger, "disparar", &[]),
            (Action::Wait, "esperar", &[]),
            (Action::Transition, "transicionar", &[]),
            (Action::Go, "ir", &["navegar"]),
            (Action::Call, "llamar", &[]),
            (Action::Focus, "enfocar", &[]),
            (Action::Blur, "desenfocar", &[]),
            (Action::Return, "retornar", &["devolver"]),
            (Action::Fetch, "recuperar", &["buscar"]),
            (Action::Ask, "preguntar", &[]),
            (Action::On, "al", &["cuando"]),
        ]),
        connective: KeywordEntry::new("entonces").or(&["luego"]),
        references: references(&[
            ("me", "yo"),
            ("it", "ello"),
            ("you", "tú"),
            ("result", "resultado"),
            ("event", "evento"),
            ("target", "objetivo"),
            ("body", "cuerpo"),
        ]),
        possessive: None,
        verb: VerbInfo {
            position: VerbPosition::Start,
            subject_drop: true,
        },
    }
}

/// Enclitic pronouns (`mostrarlo`), then infinitive, gerund and imperative
/// endings.
pub fn spanish_normalizer() -> AffixNormalizer {
    AffixNormalizer::new("es")
        .with_suffixes(&["los", "las", "les", "lo", "la", "le", "se"], 3, 0.05)
        .with_suffixes(&["iendo", "ando", "ar", "er", "ir", "an", "en", "a", "e"], 3, 0.1)
        .suffix_passes(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::Normalizer;

    #[test]
    fn test_clitic_and_infinitive_stack() {
        let result = spanish_normalizer().normalize("mostrarlo");
        assert_eq!(result.stem(), "mostr");
        assert!((result.confidence() - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_short_words_survive() {
        assert!(!spanish_normalizer().normalize("de").is_changed());
        assert!(!spanish_normalizer().normalize("ir").is_changed());
    }
}
