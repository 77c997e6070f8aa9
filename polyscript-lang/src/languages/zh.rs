use super::{keywords, markers, references};
use crate::morphology::AffixNormalizer;
use crate::profile::{
    Direction, KeywordEntry, LanguageProfile, Marker, MarkingStrategy, Segmentation, VerbInfo,
    VerbPosition, WordOrder,
};
use polyscript_core::{Action, Role};

pub fn chinese() -> LanguageProfile {
    LanguageProfile {
        code: "zh".to_string(),
        name: "中文".to_string(),
        direction: Direction::Ltr,
        word_order: WordOrder::Svo,
        marking_strategy: MarkingStrategy::Preposition,
        segmentation: Segmentation::Dictionary,
        role_markers: markers(vec![
            (Role::Destination, Marker::separate("到").or(&["给"])),
            (Role::Source, Marker::separate("从")),
            (Role::Manner, Marker::separate("作为")),
            (Role::Quantity, Marker::separate("按")),
            (Role::Duration, Marker::separate("持续")),
        ]),
        keywords: keywords(&[
            (Action::Toggle, "切换", &[]),
            (Action::Add, "添加", &[]),
            (Action::Remove, "移除", &["删除"]),
            (Action::Show, "显示", &[]),
            (Action::Hide, "隐藏", &[]),
            (Action::Set, "设置", &[]),
            (Action::Get, "获取", &[]),
            (Action::Put, "放置", &["放"]),
            (Action::Append, "追加", &[]),
            (Action::Take, "拿取", &[]),
            (Action::Increment, "增加", &[]),
            (Action::Decrement, "减少", &[]),
            (Action::Log, "记录", &[]),
            (Action::Send, "发送", &[]),
            (Action::Trigger, "触发", &[]),
            (Action::Wait, "等待", &[]),
            (Action::Transition, "过渡", &[]),
            (Action::Go, "前往", &[]),
            (Action::Call, "调用", &[]),
            (Action::Focus, "聚焦", &[]),
            (Action::Blur, "失焦", &[]),
            (Action::Return, "返回", &[]),
            (Action::Fetch, "抓取", &[]),
            (Action::Ask, "询问", &[]),
            (Action::On, "当", &[]),
        ]),
        connective: KeywordEntry::new("然后").or(&["接着"]),
        references: references(&[
            ("me", "我"),
            ("it", "它"),
            ("you", "你"),
            ("result", "结果"),
            ("event", "事件"),
            ("target", "目标"),
            ("body", "主体"),
        ]),
        possessive: Some(Marker::separate("的")),
        verb: VerbInfo {
            position: VerbPosition::Start,
            subject_drop: true,
        },
    }
}

/// A leading `请` and aspect particles.
pub fn chinese_normalizer() -> AffixNormalizer {
    AffixNormalizer::new("zh")
        .with_prefixes(&["请"], 1, 0.05)
        .with_suffixes(&["一下", "了"], 1, 0.05)
}
