// Clone Merge Rules
// Source-count and per-element weight checks for merging voice clones

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::DnaElementKind;

pub const MIN_MERGE_SOURCES: usize = 2;
pub const MAX_MERGE_SOURCES: usize = 5;

/// Per-element weights must land in this band (nominally 100).
const WEIGHT_TOTAL_MIN: u32 = 99;
const WEIGHT_TOTAL_MAX: u32 = 101;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MergeError {
    #[error("At least 2 source voice clones are required for merging")]
    TooFewSources,
    #[error("Maximum 5 source voice clones can be merged")]
    TooManySources,
    #[error("Weights for '{element}' must sum to 100 (got {total})")]
    WeightsOutOfRange { element: &'static str, total: u32 },
}

/// One clone taking part in a merge, keyed by DNA element name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSource {
    pub voice_clone_id: String,
    #[serde(default)]
    pub confidence_score: Option<u32>,
    #[serde(default)]
    pub element_weights: BTreeMap<String, u32>,
}

impl MergeSource {
    /// Weight for `kind`; missing elements weigh 0.
    pub fn weight(&self, kind: DnaElementKind) -> u32 {
        self.element_weights.get(kind.as_str()).copied().unwrap_or(0)
    }
}

pub fn validate_merge_sources(sources: &[MergeSource]) -> Result<(), MergeError> {
    if sources.len() < MIN_MERGE_SOURCES {
        return Err(MergeError::TooFewSources);
    }
    if sources.len() > MAX_MERGE_SOURCES {
        return Err(MergeError::TooManySources);
    }

    for kind in DnaElementKind::ALL {
        let total: u32 = sources.iter().map(|s| s.weight(kind)).sum();
        if !(WEIGHT_TOTAL_MIN..=WEIGHT_TOTAL_MAX).contains(&total) {
            return Err(MergeError::WeightsOutOfRange {
                element: kind.as_str(),
                total,
            });
        }
    }
    Ok(())
}

/// Integer mean of the sources' confidence scores; unscored sources count as 0.
pub fn merged_confidence(sources: &[MergeSource]) -> u32 {
    if sources.is_empty() {
        return 0;
    }
    let total: u32 = sources.iter().map(|s| s.confidence_score.unwrap_or(0)).sum();
    total / sources.len() as u32
}
