use super::{keywords, markers, references};
use crate::morphology::AffixNormalizer;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};

pub fn japanese() -> LanguageProfile {
    LanguageProfile {
        code: "ja".to_string(),
        name: "日本語".to_string(),
        direction: Direction::Ltr,
        word_order: WordOrder::Sov,
        marking_strategy: MarkingStrategy::Postposition,
        segmentation: Segmentation::Dictionary,
        role_markers: markers(vec![
            (Role::Patient, Marker::separate("を")),
            (Role::Destination, Marker::separate("に").or(&["へ"])),
            (Role::Source, Marker::separate("から")),
            (Role::Manner, Marker::separate("として")),
            (Role::Quantity, Marker::separate("だけ")),
            (Role::Duration, Marker::separate("かけて")),
        ]),
        keywords: keywords(&[
            (Action::Toggle, "切り替え", &["切り替える"]),
            (Action::Add, "追加", &[]),
            (Action::Remove, "削除", &[]),
            (Action::Show, "表示", &[]),
            (Action::Hide, "非表示", &[]),
            (Action::Set, "設定", &[]),
            (Action::Get, "取得", &[]),
            (Action::Put, "入れる", &[]),
            (Action::Append, "追記", &[]),
            (Action::Take, "取り出し", &[]),
            (Action::Increment, "増加", &[]),
            (Action::Decrement, "減少", &[]),
            (Action::Log, "記録", &[]),
            (Action::Send, "送信", &[]),
            (Action::Trigger, "発火", &[]),
            (Action::Wait, "待機", &[]),
            (Action::Transition, "遷移", &[]),
            (Action::Go, "移動", &[]),
            (Action::Call, "呼び出し", &[]),
            (Action::Focus, "フォーカス", &[]),
            (Action::Blur, "フォーカス解除", &[]),
            (Action::Return, "返す", &[]),
            (Action::Fetch, "読み込み", &[]),
            (Action::Ask, "尋ねる", &[]),
            (Action::On, "で", &["の時", "とき"]),
        ]),
        connective: KeywordEntry::new("それから").or(&["そして"]),
        references: references(&[
            ("me", "自分"),
            ("it", "それ"),
            ("you", "あなた"),
            ("result", "結果"),
            ("event", "イベント"),
            ("target", "ターゲット"),
            ("body", "本体"),
        ]),
        possessive: Some(Marker::separate("の")),
        verb: VerbInfo {
            position: VerbPosition::End,
            subject_drop: true,
        },
    }
}

/// Polite and plain verb endings. Longer endings come first.
pub fn japanese_normalizer() -> AffixNormalizer {
    AffixNormalizer::new("ja")
        .with_suffixes(
            &["してください", "てください", "ください", "しました", "します", "する", "して", "ました", "ます"],
            1,
            0.1,
        )
        .with_suffixes(&["る", "て", "た"], 1, 0.15)
}
