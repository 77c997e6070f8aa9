use super::{keywords, markers, references};
use crate::morphology::AffixNormalizer;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};

/// Korean. Case particles attach to the preceding word (`버튼을`).
pub fn korean() -> LanguageProfile {
    LanguageProfile {
        code: "ko".to_string(),
        name: "한국어".to_string(),
        direction: Direction::Ltr,
        word_order: WordOrder::Sov,
        marking_strategy: MarkingStrategy::Agglutinative,
        segmentation: Segmentation::Whitespace,
        role_markers: markers(vec![
            (Role::Patient, Marker::attached("를").or(&["을"])),
            (Role::Destination, Marker::attached("에").or(&["에게"])),
            (Role::Source, Marker::attached("에서").or(&["부터"])),
            (Role::Manner, Marker::attached("로").or(&["으로"])),
            (Role::Quantity, Marker::attached("만큼")),
            (Role::Duration, Marker::separate("동안")),
        ]),
        keywords: keywords(&[
            (Action::Toggle, "토글", &[]),
            (Action::Add, "추가", &[]),
            (Action::Remove, "제거", &[]),
            (Action::Show, "표시", &["보이기"]),
            (Action::Hide, "숨기기", &[]),
            (Action::Set, "설정", &[]),
            (Action::Get, "가져오기", &[]),
            (Action::Put, "넣기", &[]),
            (Action::Append, "덧붙이기", &[]),
            (Action::Take, "가져가기", &[]),
            (Action::Increment, "증가", &[]),
            (Action::Decrement, "감소", &[]),
            (Action::Log, "기록", &[]),
            (Action::Send, "보내기", &[]),
            (Action::Trigger, "트리거", &[]),
            (Action::Wait, "대기", &[]),
            (Action::Transition, "전환", &[]),
            (Action::Go, "이동", &[]),
            (Action::Call, "호출", &[]),
            (Action::Focus, "포커스", &[]),
            (Action::Blur, "블러", &[]),
            (Action::Return, "반환", &[]),
            (Action::Fetch, "불러오기", &[]),
            (Action::Ask, "묻기", &[]),
            (Action::On, "때", &[]),
        ]),
        connective: KeywordEntry::new("그다음").or(&["그리고"]),
        references: references(&[
            ("me", "나"),
            ("it", "그것"),
            ("you", "너"),
            ("result", "결과"),
            ("event", "이벤트"),
            ("target", "대상"),
            ("body", "본문"),
        ]),
        possessive: Some(Marker::attached("의")),
        verb: VerbInfo {
            position: VerbPosition::End,
            subject_drop: true,
        },
    }
}

/// Honorific, polite and nominalizing verb endings.
pub fn korean_normalizer() -> AffixNormalizer {
    AffixNormalizer::new("ko").with_suffixes(
        &[
            "하십시오", "해주세요", "하세요", "합니다", "해요", "하기", "하다", "하고", "해라", "세요", "해", "기",
        ],
        1,
        0.1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::Normalizer;

    #[test]
    fn test_polite_ending() {
        let result = korean_normalizer().normalize("토글하세요");
        assert_eq!(result.stem(), "토글");
        assert!(result.confidence() < 1.0);
    }
}
