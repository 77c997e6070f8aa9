use super::markers;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};
use std::collections::BTreeMap;

/// English. Keywords are the canonical action names.
pub fn english() -> LanguageProfile {
    LanguageProfile {
        code: "en".to_string(),
        name: "English".to_string(),
        direction: Direction::Ltr,
        word_order: WordOrder::Svo,
        marking_strategy: MarkingStrategy::Preposition,
        segmentation: Segmentation::Whitespace,
        role_markers: markers(vec![
            (Role::Destination, Marker::separate("to")),
            (Role::Source, Marker::separate("from")),
            (Role::Manner, Marker::separate("as")),
            (Role::Quantity, Marker::separate("by")),
            (Role::Duration, Marker::separate("over")),
        ]),
        keywords: Action::keyworded()
            .map(|action| (action, KeywordEntry::new(action.as_str())))
            .collect(),
        connective: KeywordEntry::new("then"),
        references: BTreeMap::new(),
        possessive: None,
        verb: VerbInfo {
            position: VerbPosition::Start,
            subject_drop: false,
        },
    }
}
