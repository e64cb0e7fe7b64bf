// Detection Scorer
// Combines the eight metrics into a single 0-100 human-likeness score

use std::collections::BTreeMap;
use tracing::debug;

use super::metrics;
use crate::models::{ScoreResult, StyleProfile};
use crate::services::text_processor::count_words;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DetectionMetric {
    SentenceVariety,
    VocabularyDiversity,
    Specificity,
    TransitionNaturalness,
    OpeningClosing,
    Punctuation,
    Personality,
    Structure,
}

impl DetectionMetric {
    pub const ALL: [DetectionMetric; 8] = [
        DetectionMetric::SentenceVariety,
        DetectionMetric::VocabularyDiversity,
        DetectionMetric::Specificity,
        DetectionMetric::TransitionNaturalness,
        DetectionMetric::OpeningClosing,
        DetectionMetric::Punctuation,
        DetectionMetric::Personality,
        DetectionMetric::Structure,
    ];

    /// Key used in the persisted breakdown.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMetric::SentenceVariety => "sentence_variety",
            DetectionMetric::VocabularyDiversity => "vocabulary_diversity",
            DetectionMetric::Specificity => "specificity",
            DetectionMetric::TransitionNaturalness => "transition_naturalness",
            DetectionMetric::OpeningClosing => "opening_closing",
            DetectionMetric::Punctuation => "punctuation",
            DetectionMetric::Personality => "personality",
            DetectionMetric::Structure => "structure",
        }
    }

    pub fn max_points(&self) -> u32 {
        match self {
            DetectionMetric::SentenceVariety => 20,
            DetectionMetric::VocabularyDiversity | DetectionMetric::Specificity => 15,
            _ => 10,
        }
    }

    /// Sub-score for this metric, never above [`max_points`](Self::max_points).
    pub fn evaluate(&self, text: &str, profile: Option<&StyleProfile>) -> u32 {
        let raw = match self {
            DetectionMetric::SentenceVariety => metrics::sentence_variety(text),
            DetectionMetric::VocabularyDiversity => metrics::vocabulary_diversity(text),
            DetectionMetric::Specificity => metrics::specificity(text),
            DetectionMetric::TransitionNaturalness => metrics::transition_naturalness(text),
            DetectionMetric::OpeningClosing => metrics::opening_closing(text),
            DetectionMetric::Punctuation => metrics::punctuation(text),
            DetectionMetric::Personality => metrics::personality(text, profile),
            DetectionMetric::Structure => metrics::structure(text),
        };
        raw.min(self.max_points())
    }
}

/// Stateless scorer; safe to share across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetectionScorer;

impl DetectionScorer {
    pub fn score(&self, text: &str, profile: Option<&StyleProfile>) -> ScoreResult {
        compute_detection_score(text, profile)
    }
}

/// Score how human-written `text` looks. Blank text yields an empty result.
pub fn compute_detection_score(text: &str, profile: Option<&StyleProfile>) -> ScoreResult {
    if text.trim().is_empty() {
        return ScoreResult::empty();
    }

    let breakdown: BTreeMap<String, u32> = DetectionMetric::ALL
        .iter()
        .map(|metric| (metric.as_str().to_string(), metric.evaluate(text, profile)))
        .collect();
    let result = ScoreResult::from_breakdown(breakdown);

    debug!(
        total = result.total,
        words = count_words(text),
        with_profile = profile.is_some(),
        "detection.scored"
    );
    result
}
