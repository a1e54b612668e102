//! Classifier properties over realistic folder listings

use texassign_scan::models::{Preset, PresetKind};
use texassign_scan::services::ChannelClassifier;
use texassign_common::{Channel, ChannelRule, TieBreak};

/// Megascans-style download with several LODs and formats
fn megascan_listing() -> Vec<&'static str> {
    vec![
        "rock_4K_Albedo.jpg",
        "rock_4K_Albedo_LOD1.exr",
        "rock_4K_Albedo.exr",
        "rock_4K_Normal_LOD0.jpg",
        "rock_4K_Normal_LOD10.jpg",
        "rock_4K_Normal_LOD2.jpg",
        "rock_4K_NormalCombine.exr",
        "rock_4K_Roughness.jpg",
        "rock_4K_Displacement.exr",
        "rock_4K_Preview.png",
    ]
}

#[test]
fn test_classification_is_deterministic() {
    let preset = Preset::new(PresetKind::Megascan3d).unwrap();
    let names = megascan_listing();

    let first = ChannelClassifier::classify(&preset.fields, &names);
    for _ in 0..10 {
        assert_eq!(ChannelClassifier::classify(&preset.fields, &names), first);
    }
}

#[test]
fn test_every_candidate_appears_exactly_once() {
    let preset = Preset::new(PresetKind::Standard).unwrap();
    let names = megascan_listing();

    for field in &preset.fields {
        let ordered = ChannelClassifier::ordered_matches(&field.rule, &names);
        let expected: Vec<_> = names.iter().filter(|n| field.rule.is_candidate(n)).collect();

        assert_eq!(ordered.len(), expected.len(), "field {}", field.title);
        for name in expected {
            assert_eq!(
                ordered.iter().filter(|o| o.as_str() == *name).count(),
                1,
                "{} in field {}",
                name,
                field.title
            );
        }
    }
}

#[test]
fn test_non_candidates_never_assigned() {
    let preset = Preset::new(PresetKind::Megascan3d).unwrap();
    let names = megascan_listing();

    for found in ChannelClassifier::classify(&preset.fields, &names) {
        let field = preset.field(&found.title).unwrap();
        for candidate in &found.candidates {
            assert!(field.rule.is_candidate(candidate), "{} in {}", candidate, found.title);
        }
    }
}

#[test]
fn test_megascan_best_picks() {
    let preset = Preset::new(PresetKind::Megascan3d).unwrap();
    let found = ChannelClassifier::classify(&preset.fields, &megascan_listing());

    let best = |title: &str| {
        found
            .iter()
            .find(|f| f.title == title)
            .and_then(|f| f.best())
            .map(str::to_string)
    };
    assert_eq!(best("Albedo").as_deref(), Some("rock_4K_Albedo.exr"));
    assert_eq!(best("Normal").as_deref(), Some("rock_4K_Normal_LOD0.jpg"));
    assert_eq!(best("Roughness").as_deref(), Some("rock_4K_Roughness.jpg"));
    assert_eq!(best("Displacement").as_deref(), Some("rock_4K_Displacement.exr"));
    assert_eq!(best("Metalness"), None);
}

#[test]
fn test_lod_ranking_is_numeric() {
    let preset = Preset::new(PresetKind::Megascan3d).unwrap();
    let normal = preset.field("Normal").unwrap();
    assert_eq!(
        ChannelClassifier::ordered_matches(&normal.rule, &megascan_listing()),
        vec![
            "rock_4K_Normal_LOD0.jpg",
            "rock_4K_Normal_LOD2.jpg",
            "rock_4K_Normal_LOD10.jpg",
        ]
    );
}

#[test]
fn test_matching_ignores_case() {
    let rule = ChannelRule::new(Channel::Roughness, "roughness")
        .unwrap()
        .with_primary_rules(vec![TieBreak::present(r"\.exr$").unwrap()]);
    let names = ["A_ROUGHNESS.JPG", "a_roughness.EXR"];
    assert_eq!(
        ChannelClassifier::ordered_matches(&rule, &names),
        vec!["a_roughness.EXR", "A_ROUGHNESS.JPG"]
    );
}

#[test]
fn test_empty_listing() {
    let preset = Preset::new(PresetKind::Substance).unwrap();
    let names: Vec<String> = Vec::new();
    for found in ChannelClassifier::classify(&preset.fields, &names) {
        assert!(found.candidates.is_empty());
        assert!(found.best().is_none());
    }
}
