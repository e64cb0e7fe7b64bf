// Confidence Scoring
// How well a voice clone's writing samples support a reliable style profile

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::models::{SampleDescriptor, ScoreResult};
use crate::services::text_processor::population_std_dev;

const SHORT_SAMPLE_WORDS: u32 = 200;
const LONG_SAMPLE_WORDS: u32 = 1000;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConfidenceMetric {
    WordCount,
    SampleCount,
    ContentVariety,
    LengthDistribution,
    Consistency,
}

impl ConfidenceMetric {
    pub const ALL: [ConfidenceMetric; 5] = [
        ConfidenceMetric::WordCount,
        ConfidenceMetric::SampleCount,
        ConfidenceMetric::ContentVariety,
        ConfidenceMetric::LengthDistribution,
        ConfidenceMetric::Consistency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceMetric::WordCount => "word_count",
            ConfidenceMetric::SampleCount => "sample_count",
            ConfidenceMetric::ContentVariety => "content_variety",
            ConfidenceMetric::LengthDistribution => "length_distribution",
            ConfidenceMetric::Consistency => "consistency",
        }
    }

    pub fn max_points(&self) -> u32 {
        match self {
            ConfidenceMetric::WordCount => 30,
            ConfidenceMetric::SampleCount | ConfidenceMetric::ContentVariety => 20,
            ConfidenceMetric::LengthDistribution | ConfidenceMetric::Consistency => 15,
        }
    }

    pub fn evaluate(&self, samples: &[SampleDescriptor], has_style_profile: bool) -> u32 {
        let raw = match self {
            ConfidenceMetric::WordCount => word_count_score(samples),
            ConfidenceMetric::SampleCount => sample_count_score(samples),
            ConfidenceMetric::ContentVariety => content_variety_score(samples),
            ConfidenceMetric::LengthDistribution => length_distribution_score(samples),
            ConfidenceMetric::Consistency => consistency_score(samples, has_style_profile),
        };
        raw.min(self.max_points())
    }
}

fn word_count_score(samples: &[SampleDescriptor]) -> u32 {
    let total_words: u64 = samples.iter().map(|s| u64::from(s.word_count)).sum();
    match total_words {
        w if w >= 10_000 => 30,
        w if w >= 5_000 => 25,
        w if w >= 2_500 => 20,
        w if w >= 1_000 => 15,
        w if w >= 500 => 10,
        w => (w / 50).min(10) as u32,
    }
}

fn sample_count_score(samples: &[SampleDescriptor]) -> u32 {
    match samples.len() {
        n if n >= 10 => 20,
        n if n >= 5 => 15,
        n if n >= 3 => 10,
        n => n as u32 * 3,
    }
}

/// 5 points per distinct source kind, 3 per size bucket represented.
fn content_variety_score(samples: &[SampleDescriptor]) -> u32 {
    let kinds: HashSet<_> = samples.iter().map(|s| s.source_kind).collect();

    let has_short = samples.iter().any(|s| s.word_count < SHORT_SAMPLE_WORDS);
    let has_medium = samples
        .iter()
        .any(|s| (SHORT_SAMPLE_WORDS..LONG_SAMPLE_WORDS).contains(&s.word_count));
    let has_long = samples.iter().any(|s| s.word_count >= LONG_SAMPLE_WORDS);
    let buckets = [has_short, has_medium, has_long]
        .iter()
        .filter(|b| **b)
        .count() as u32;

    (kinds.len() as u32 * 5 + buckets * 3).min(20)
}

fn length_distribution_score(samples: &[SampleDescriptor]) -> u32 {
    if samples.len() < 3 {
        return (samples.len() as u32 * 3).min(15);
    }

    let counts: Vec<f64> = samples.iter().map(|s| f64::from(s.word_count)).collect();
    let std_dev = population_std_dev(&counts);
    if std_dev > 500.0 {
        15
    } else if std_dev > 200.0 {
        12
    } else if std_dev > 100.0 {
        8
    } else {
        5
    }
}

fn consistency_score(samples: &[SampleDescriptor], has_style_profile: bool) -> u32 {
    if has_style_profile {
        15
    } else if samples.len() >= 3 {
        8
    } else if !samples.is_empty() {
        3
    } else {
        0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn score(&self, samples: &[SampleDescriptor], has_style_profile: bool) -> ScoreResult {
        compute_confidence_score(samples, has_style_profile)
    }
}

/// Score a voice clone's training data. Sample order does not matter.
pub fn compute_confidence_score(
    samples: &[SampleDescriptor],
    has_style_profile: bool,
) -> ScoreResult {
    let breakdown: BTreeMap<String, u32> = ConfidenceMetric::ALL
        .iter()
        .map(|metric| {
            (
                metric.as_str().to_string(),
                metric.evaluate(samples, has_style_profile),
            )
        })
        .collect();
    let result = ScoreResult::from_breakdown(breakdown);

    debug!(
        total = result.total,
        samples = samples.len(),
        has_style_profile,
        "confidence.scored"
    );
    result
}
