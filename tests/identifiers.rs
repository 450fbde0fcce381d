//! Identifier Integration Tests
//!
//! Classification, SEO segments and anchor ids through the public API.

use bibliotechka::identifier::{
    candidates, canonical_path, classify, transliterate, Lookup, PrimaryKey, TrailingIdScheme,
};
use bibliotechka::{anchor_id, build_seo_segment, extract_trailing_id, Scheme};
use uuid::Uuid;

const LABELS: &[&str] = &[
    "",
    "   ",
    "Тренажёры",
    "Графический дизайн",
    "Без подгруппы",
    "UI/UX — основы",
    "Щёлк & Съешь ещё",
    "---already-an-anchor---",
    "CSS 3",
    "日本語",
];

#[test]
fn test_seo_segment_for_cyrillic_title() {
    let segment = build_seo_segment("Интерактивный Тренажёр", "42");
    assert_eq!(segment, "interaktivnyy-trenazher-42");
    assert_eq!(extract_trailing_id(&segment), "42");
    assert_eq!(classify(&segment), Some(Scheme::Composite));
}

#[test]
fn test_hyphenated_title_keeps_trailing_id() {
    assert_eq!(extract_trailing_id(&build_seo_segment("A-B-C", "7")), "7");
    assert_eq!(extract_trailing_id("a-b-c-7"), "7");
}

#[test]
fn test_composite_lookup_uses_only_the_trailing_id() {
    let steps = candidates(
        &build_seo_segment("Интерактивный Тренажёр", "42"),
        TrailingIdScheme::Numeric,
    );
    assert_eq!(steps[0].scheme, Scheme::Composite);
    assert_eq!(steps[0].lookup, Lookup::PrimaryKey(PrimaryKey::Numeric(42)));
}

#[test]
fn test_any_uuid_is_a_single_primary_key_lookup() {
    for _ in 0..20 {
        let id = Uuid::new_v4();
        for segment in [id.to_string(), id.to_string().to_uppercase()] {
            let steps = candidates(&segment, TrailingIdScheme::Numeric);
            assert_eq!(steps.len(), 1, "{}", segment);
            assert_eq!(steps[0].scheme, Scheme::Uuid);
            assert_eq!(steps[0].lookup, Lookup::PrimaryKey(PrimaryKey::Uuid(id)));
        }
    }
}

#[test]
fn test_anchor_is_total_and_idempotent() {
    assert_eq!(anchor_id(""), "");

    for label in LABELS {
        let anchor = anchor_id(label);
        assert!(
            anchor
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "{:?} -> {:?}",
            label,
            anchor
        );
        assert!(!anchor.starts_with('-') && !anchor.ends_with('-'));
        assert!(!anchor.contains("--"));
        assert_eq!(anchor_id(&anchor), anchor, "{:?}", label);
    }
}

#[test]
fn test_anchor_examples() {
    assert_eq!(anchor_id("Тренажёры"), "trenazhery");
    assert_eq!(anchor_id("Щёлк & Съешь ещё"), "schelk-sesh-esche");
    assert_eq!(anchor_id("UI/UX — основы"), "ui-ux-osnovy");
    assert_eq!(anchor_id("日本語"), "");
    assert_eq!(transliterate("Жук"), "zhuk");
}

#[test]
fn test_canonical_path() {
    assert_eq!(
        canonical_path("trainers", "Интерактивный Тренажёр", "42"),
        "/trainers/interaktivnyy-trenazher-42"
    );
}
