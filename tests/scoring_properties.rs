// Property tests for the two scorers: bounds, blank input and idempotence.

use proptest::prelude::*;
use voice_clone_lib::models::{DnaElement, SampleDescriptor, SourceKind, StyleProfile};
use voice_clone_lib::services::{ConfidenceMetric, DetectionMetric};
use voice_clone_lib::{compute_confidence_score, compute_detection_score};

fn source_kind() -> impl Strategy<Value = SourceKind> {
    prop_oneof![
        Just(SourceKind::Paste),
        Just(SourceKind::File),
        Just(SourceKind::Url),
    ]
}

fn sample() -> impl Strategy<Value = SampleDescriptor> {
    (0u32..20_000, source_kind()).prop_map(|(words, kind)| SampleDescriptor::new(words, kind))
}

/// Text built from fragments that trip the markers, mixed with noise.
fn marker_heavy_text() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("In conclusion, ".to_string()),
        Just("furthermore ".to_string()),
        Just("Honestly? ".to_string()),
        Just("I think we did it! ".to_string()),
        Just("On Monday in March 2024 we hit 40% growth. ".to_string()),
        Just("\"quoted\" ".to_string()),
        Just("... (aside) — ".to_string()),
        Just("\n\n- bullet\n1. item\n".to_string()),
        Just("Let me know what you think.".to_string()),
        "[a-zA-Z ,.!?]{0,40}",
    ];
    prop::collection::vec(fragment, 0..30).prop_map(|parts| parts.concat())
}

fn profile_with(examples: Vec<String>) -> StyleProfile {
    StyleProfile {
        distinctive_signatures: Some(DnaElement {
            examples,
            ..DnaElement::default()
        }),
        ..StyleProfile::default()
    }
}

proptest! {
    #[test]
    fn detection_sub_scores_stay_in_bounds(text in "\\PC{0,400}") {
        let result = compute_detection_score(&text, None);
        prop_assert!(result.total <= 100);
        for metric in DetectionMetric::ALL {
            if let Some(points) = result.get(metric.as_str()) {
                prop_assert!(points <= metric.max_points(), "{} = {}", metric.as_str(), points);
            }
        }
    }

    #[test]
    fn detection_marker_text_in_bounds(text in marker_heavy_text(), sig in "[a-z ]{0,12}") {
        let profile = profile_with(vec![sig, "we did it".to_string()]);
        let result = compute_detection_score(&text, Some(&profile));
        let sum: u32 = result.breakdown.values().sum();
        prop_assert_eq!(result.total, sum.min(100));
        for metric in DetectionMetric::ALL {
            if let Some(points) = result.get(metric.as_str()) {
                prop_assert!(points <= metric.max_points());
            }
        }
    }

    #[test]
    fn detection_is_idempotent(text in marker_heavy_text()) {
        prop_assert_eq!(
            compute_detection_score(&text, None),
            compute_detection_score(&text, None)
        );
    }

    #[test]
    fn whitespace_only_text_is_empty(text in "[ \t\n\r]{0,50}") {
        let result = compute_detection_score(&text, None);
        prop_assert_eq!(result.total, 0);
        prop_assert!(result.breakdown.is_empty());
    }

    #[test]
    fn non_blank_text_has_full_breakdown(text in "[a-z]{1,20}") {
        let result = compute_detection_score(&text, None);
        prop_assert_eq!(result.breakdown.len(), DetectionMetric::ALL.len());
    }

    #[test]
    fn confidence_in_bounds(samples in prop::collection::vec(sample(), 0..40), has_profile: bool) {
        let result = compute_confidence_score(&samples, has_profile);
        prop_assert!(result.total <= 100);
        prop_assert_eq!(result.breakdown.len(), ConfidenceMetric::ALL.len());
        for metric in ConfidenceMetric::ALL {
            let points = result.get(metric.as_str()).unwrap_or_default();
            prop_assert!(points <= metric.max_points(), "{} = {}", metric.as_str(), points);
        }
    }

    #[test]
    fn confidence_ignores_sample_order(samples in prop::collection::vec(sample(), 0..20), has_profile: bool) {
        let mut reversed = samples.clone();
        reversed.reverse();
        prop_assert_eq!(
            compute_confidence_score(&samples, has_profile),
            compute_confidence_score(&reversed, has_profile)
        );
    }
}

#[test]
fn very_long_repetitive_text_is_bounded() {
    let text = "!?...—(".repeat(5_000) + &"word ".repeat(20_000);
    let result = compute_detection_score(&text, None);
    assert!(result.total <= 100);
    assert_eq!(result.breakdown.len(), 8);
}

#[test]
fn more_training_data_raises_confidence() {
    let rich: Vec<SampleDescriptor> = (0..10)
        .map(|_| SampleDescriptor::new(1_200, SourceKind::File))
        .collect();
    let thin = vec![
        SampleDescriptor::new(150, SourceKind::Paste),
        SampleDescriptor::new(150, SourceKind::Paste),
    ];

    let rich_score = compute_confidence_score(&rich, true);
    let thin_score = compute_confidence_score(&thin, false);

    assert!(rich_score.get("word_count") > thin_score.get("word_count"));
    assert!(rich_score.get("consistency") > thin_score.get("consistency"));
}
