// Voice Clone Data Models
// Value objects shared by the scorers, sample intake and generation workflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Upper bound for any aggregated score.
pub const MAX_TOTAL_SCORE: u32 = 100;

// ============ Score Result ============

/// Output of both scorers: a capped total and the per-metric sub-scores.
///
/// Persisted verbatim by callers (total as an integer column, breakdown as a
/// key to integer document). Older records stored the total under `score`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(alias = "score")]
    pub total: u32,
    #[serde(default)]
    pub breakdown: BTreeMap<String, u32>,
}

impl ScoreResult {
    /// Degenerate result for input that carries nothing to score.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sum the sub-scores and cap at [`MAX_TOTAL_SCORE`].
    pub fn from_breakdown(breakdown: BTreeMap<String, u32>) -> Self {
        let sum: u32 = breakdown.values().sum();
        Self {
            total: sum.min(MAX_TOTAL_SCORE),
            breakdown,
        }
    }

    pub fn get(&self, metric: &str) -> Option<u32> {
        self.breakdown.get(metric).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }
}

// ============ Writing Samples ============

/// Where a writing sample came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Paste,
    File,
    Url,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Paste, SourceKind::File, SourceKind::Url];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Paste => "paste",
            SourceKind::File => "file",
            SourceKind::Url => "url",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSourceKind(pub String);

impl fmt::Display for UnknownSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown source kind: {:?} (expected paste, file or url)", self.0)
    }
}

impl std::error::Error for UnknownSourceKind {}

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paste" => Ok(SourceKind::Paste),
            "file" => Ok(SourceKind::File),
            "url" => Ok(SourceKind::Url),
            _ => Err(UnknownSourceKind(s.to_string())),
        }
    }
}

/// The only facts about a sample that confidence scoring looks at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDescriptor {
    pub word_count: u32,
    pub source_kind: SourceKind,
}

impl SampleDescriptor {
    pub fn new(word_count: u32, source_kind: SourceKind) -> Self {
        Self {
            word_count,
            source_kind,
        }
    }
}

// ============ Voice DNA ============

/// The ten fixed dimensions of a Voice DNA profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DnaElementKind {
    VocabularyPatterns,
    SentenceStructure,
    ParagraphStructure,
    ToneMarkers,
    RhetoricalDevices,
    PunctuationHabits,
    OpeningPatterns,
    ClosingPatterns,
    HumorAndPersonality,
    DistinctiveSignatures,
}

impl DnaElementKind {
    pub const ALL: [DnaElementKind; 10] = [
        DnaElementKind::VocabularyPatterns,
        DnaElementKind::SentenceStructure,
        DnaElementKind::ParagraphStructure,
        DnaElementKind::ToneMarkers,
        DnaElementKind::RhetoricalDevices,
        DnaElementKind::PunctuationHabits,
        DnaElementKind::OpeningPatterns,
        DnaElementKind::ClosingPatterns,
        DnaElementKind::HumorAndPersonality,
        DnaElementKind::DistinctiveSignatures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DnaElementKind::VocabularyPatterns => "vocabulary_patterns",
            DnaElementKind::SentenceStructure => "sentence_structure",
            DnaElementKind::ParagraphStructure => "paragraph_structure",
            DnaElementKind::ToneMarkers => "tone_markers",
            DnaElementKind::RhetoricalDevices => "rhetorical_devices",
            DnaElementKind::PunctuationHabits => "punctuation_habits",
            DnaElementKind::OpeningPatterns => "opening_patterns",
            DnaElementKind::ClosingPatterns => "closing_patterns",
            DnaElementKind::HumorAndPersonality => "humor_and_personality",
            DnaElementKind::DistinctiveSignatures => "distinctive_signatures",
        }
    }

    /// What the analysis model should describe for this element.
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            DnaElementKind::VocabularyPatterns => "Word choice preferences, jargon, favorite phrases",
            DnaElementKind::SentenceStructure => "Typical sentence length, complexity, variety",
            DnaElementKind::ParagraphStructure => "Paragraph length, organization patterns",
            DnaElementKind::ToneMarkers => "Emotional tone, formality level, attitude",
            DnaElementKind::RhetoricalDevices => "Persuasion techniques, metaphors, analogies",
            DnaElementKind::PunctuationHabits => "Distinctive punctuation usage, em-dashes, ellipses",
            DnaElementKind::OpeningPatterns => "How they typically start content",
            DnaElementKind::ClosingPatterns => "How they typically end content",
            DnaElementKind::HumorAndPersonality => "Wit, sarcasm, personality traits that come through",
            DnaElementKind::DistinctiveSignatures => "Unique catchphrases, mannerisms, or habits",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaElement {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// A writer's "Voice DNA". Every element is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_patterns: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_structure: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_structure: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_markers: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhetorical_devices: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punctuation_habits: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_patterns: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_patterns: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humor_and_personality: Option<DnaElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinctive_signatures: Option<DnaElement>,
}

impl StyleProfile {
    pub fn element(&self, kind: DnaElementKind) -> Option<&DnaElement> {
        match kind {
            DnaElementKind::VocabularyPatterns => self.vocabulary_patterns.as_ref(),
            DnaElementKind::SentenceStructure => self.sentence_structure.as_ref(),
            DnaElementKind::ParagraphStructure => self.paragraph_structure.as_ref(),
            DnaElementKind::ToneMarkers => self.tone_markers.as_ref(),
            DnaElementKind::RhetoricalDevices => self.rhetorical_devices.as_ref(),
            DnaElementKind::PunctuationHabits => self.punctuation_habits.as_ref(),
            DnaElementKind::OpeningPatterns => self.opening_patterns.as_ref(),
            DnaElementKind::ClosingPatterns => self.closing_patterns.as_ref(),
            DnaElementKind::HumorAndPersonality => self.humor_and_personality.as_ref(),
            DnaElementKind::DistinctiveSignatures => self.distinctive_signatures.as_ref(),
        }
    }

    /// Examples recorded under `distinctive_signatures`, empty when absent.
    pub fn signature_examples(&self) -> &[String] {
        self.distinctive_signatures
            .as_ref()
            .map(|e| e.examples.as_slice())
            .unwrap_or(&[])
    }

    pub fn populated_elements(&self) -> Vec<DnaElementKind> {
        DnaElementKind::ALL
            .into_iter()
            .filter(|kind| self.element(*kind).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_elements().is_empty()
    }
}

// ============ Generation ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub platform: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub provider: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A freshly analysed profile plus what it took to produce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnaAnalysis {
    pub profile: StyleProfile,
    pub usage: UsageRecord,
    pub sample_count: usize,
    pub total_words: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub id: Uuid,
    pub platform: String,
    pub content_text: String,
    pub detection: ScoreResult,
    pub usage: UsageRecord,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_result_caps_total() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("a".to_string(), 70);
        breakdown.insert("b".to_string(), 45);
        let result = ScoreResult::from_breakdown(breakdown);
        assert_eq!(result.total, 100);
        assert_eq!(result.get("b"), Some(45));
    }

    #[test]
    fn test_score_result_reads_legacy_score_key() {
        let parsed: ScoreResult =
            serde_json::from_str(r#"{"score": 42, "breakdown": {"structure": 7}}"#).unwrap();
        assert_eq!(parsed.total, 42);
        assert_eq!(parsed.get("structure"), Some(7));

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["total"], 42);
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("URL".parse::<SourceKind>().unwrap(), SourceKind::Url);
        assert_eq!(" paste ".parse::<SourceKind>().unwrap(), SourceKind::Paste);
        assert!("email".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_sample_descriptor_rejects_unknown_kind() {
        let ok: SampleDescriptor =
            serde_json::from_str(r#"{"word_count": 120, "source_kind": "file"}"#).unwrap();
        assert_eq!(ok, SampleDescriptor::new(120, SourceKind::File));

        let bad = serde_json::from_str::<SampleDescriptor>(r#"{"word_count": 1, "source_kind": "fax"}"#);
        assert!(bad.is_err());
        let negative = serde_json::from_str::<SampleDescriptor>(r#"{"word_count": -1, "source_kind": "file"}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_profile_signature_examples_default_empty() {
        let profile = StyleProfile::default();
        assert!(profile.signature_examples().is_empty());
        assert!(profile.is_empty());

        let profile = StyleProfile {
            distinctive_signatures: Some(DnaElement {
                examples: vec!["no fluff".to_string()],
                ..DnaElement::default()
            }),
            ..StyleProfile::default()
        };
        assert_eq!(profile.signature_examples(), ["no fluff".to_string()]);
        assert_eq!(
            profile.populated_elements(),
            vec![DnaElementKind::DistinctiveSignatures]
        );
    }
}
