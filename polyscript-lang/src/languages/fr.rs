use super::{keywords, markers, references};
use crate::morphology::AffixNormalizer;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};

pub fn french() -> LanguageProfile {
    LanguageProfile {
        code: "fr".to_string(),
        name: "Français".to_string(),
        direction: Direction::Ltr,
        word_order: WordOrder::Svo,
        marking_strategy: MarkingStrategy::Preposition,
        segmentation: Segmentation::Whitespace,
        role_markers: markers(vec![
            (Role::Destination, Marker::separate("à").or(&["au", "vers"])),
            (Role::Source, Marker::separate("de").or(&["du", "depuis"])),
            (Role::Manner, Marker::separate("comme")),
            (Role::Quantity, Marker::separate("par")),
            (Role::Duration, Marker::separate("pendant")),
        ]),
        keywords: keywords(&[
            (Action::Toggle, "basculer", &[]),
            (Action::Add, "ajouter", &[]),
            (Action::Remove, "retirer", &["supprimer"]),
            (Action::Show, "afficher", &["montrer"]),
            (Action::Hide, "masquer", &["cacher"]),
            (Action::Set, "définir", &[]),
            (Action::Get, "obtenir", &[]),
            (Action::Put, "mettre", &[]),
            (Action::Append, "adjoindre", &[]),
            (Action::Take, "prendre", &[]),
            (Action::Increment, "incrémenter", &[]),
            (Action::Decrement, "décrémenter", &[]),
            (Action::Log, "journaliser", &[]),
            (Action::Send, "envoyer", &[]),
            (Action::Trigger, "déclencher", &[]),
            (Action::Wait, "attendre", &[]),
            (Action::Transition, "transitionner", &[]),
            (Action::Go, "aller", &["naviguer"]),
            (Action::Call, "appeler", &[]),
            (Action::Focus, "focaliser", &[]),
            (Action::Blur, "défocaliser", &[]),
            (Action::Return, "retourner", &["renvoyer"]),
            (Action::Fetch, "charger", &["récupérer"]),
            (Action::Ask, "demander", &[]),
            (Action::On, "quand", &["lorsque"]),
        ]),
        connective: KeywordEntry::new("puis").or(&["ensuite"]),
        references: references(&[
            ("me", "moi"),
            ("it", "cela"),
            ("you", "toi"),
            ("result", "résultat"),
            ("event", "événement"),
            ("target", "cible"),
            ("body", "corps"),
        ]),
        possessive: None,
        verb: VerbInfo {
            position: VerbPosition::Start,
            subject_drop: false,
        },
    }
}

/// Imperative and infinitive endings.
pub fn french_normalizer() -> AffixNormalizer {
    AffixNormalizer::new("fr").with_suffixes(&["ez", "er", "ir", "re", "e"], 3, 0.1)
}
