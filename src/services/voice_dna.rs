// Voice DNA Analysis
// Builds the analysis prompt and turns the model's reply into a typed StyleProfile

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

use crate::models::{DnaElementKind, StyleProfile};

#[derive(Error, Debug)]
pub enum VoiceDnaError {
    #[error("Could not find Voice DNA JSON in response")]
    NoJsonFound,
    #[error("Invalid JSON in Voice DNA response: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert linguistic analyst. Always return valid JSON.";

/// Samples longer than this many characters are cut before prompting.
const PROMPT_SAMPLE_CHARS: usize = 5000;

const ANALYSIS_PREAMBLE: &str = "You are an expert linguistic analyst specializing in voice and writing style analysis. \
Analyze the following writing samples to extract a comprehensive \"Voice DNA\" profile that captures \
the unique characteristics of this writer.";

const ANALYSIS_OUTPUT_FORMAT: &str = "Return a JSON object with these 10 elements. For each element, provide:
- A description of the pattern
- 2-3 specific examples from the text
- Frequency/consistency notes";

const ANALYSIS_CLOSING: &str = "Be specific and concrete. Extract actual patterns from the text, not generic \
observations. The goal is to capture enough detail to replicate this voice in new content.";

/// The ten-element skeleton the model is asked to fill in.
fn profile_template() -> String {
    let elements: serde_json::Map<String, serde_json::Value> = DnaElementKind::ALL
        .iter()
        .map(|kind| {
            (
                kind.as_str().to_string(),
                serde_json::json!({
                    "description": kind.prompt_hint(),
                    "examples": [],
                    "notes": "",
                }),
            )
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::Value::Object(elements)).unwrap_or_default()
}

fn truncate_sample(sample: &str) -> String {
    if sample.chars().count() > PROMPT_SAMPLE_CHARS {
        let mut cut: String = sample.chars().take(PROMPT_SAMPLE_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        sample.to_string()
    }
}

/// Prompt asking for a Voice DNA profile of `samples`, numbered from 1.
pub fn build_analysis_prompt<S: AsRef<str>>(samples: &[S], instructions: &str) -> String {
    let samples_text = samples
        .iter()
        .enumerate()
        .map(|(i, sample)| format!("### Sample {}\n{}", i + 1, truncate_sample(sample.as_ref())))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\n## Instructions\n{}\n\n## Writing Samples\n{}\n\n## Output Format\n{}\n\n```json\n{}\n```\n\n{}",
        ANALYSIS_PREAMBLE,
        instructions,
        samples_text,
        ANALYSIS_OUTPUT_FORMAT,
        profile_template(),
        ANALYSIS_CLOSING
    )
}

fn fenced_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced json regex"))
}

fn raw_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("raw object regex"))
}

/// Parse a stored or freshly produced profile document.
pub fn parse_style_profile(json: &str) -> Result<StyleProfile, VoiceDnaError> {
    Ok(serde_json::from_str(json)?)
}

/// Extract the profile from a model reply: a ```json fence wins, otherwise
/// the outermost `{...}` span.
pub fn parse_dna_response(response: &str) -> Result<StyleProfile, VoiceDnaError> {
    let json = if let Some(caps) = fenced_json_re().captures(response) {
        caps.get(1).map(|m| m.as_str()).unwrap_or_default()
    } else if let Some(m) = raw_object_re().find(response) {
        m.as_str()
    } else {
        warn!(chars = response.chars().count(), "voice_dna.no_json");
        return Err(VoiceDnaError::NoJsonFound);
    };

    parse_style_profile(json).inspect_err(|e| warn!(error = %e, "voice_dna.invalid_json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_JSON: &str = r#"{
        "tone_markers": {"description": "Dry, wry", "examples": ["sure, fine"], "notes": ""},
        "distinctive_signatures": {"description": "Sign-offs", "examples": ["Onward.", "More soon"]},
        "analysis_version": 3
    }"#;

    #[test]
    fn test_parse_fenced_block() {
        let response = format!("Here is the analysis:\n```json\n{}\n```\nLet me know!", PROFILE_JSON);
        let profile = parse_dna_response(&response).unwrap();
        assert_eq!(profile.signature_examples(), ["Onward.".to_string(), "More soon".to_string()]);
        assert_eq!(
            profile.populated_elements(),
            vec![DnaElementKind::ToneMarkers, DnaElementKind::DistinctiveSignatures]
        );
        let signatures = profile.element(DnaElementKind::DistinctiveSignatures).unwrap();
        assert_eq!(signatures.notes, "");
    }

    #[test]
    fn test_parse_raw_object() {
        let response = format!("Sure! {} Hope that helps.", PROFILE_JSON);
        let profile = parse_dna_response(&response).unwrap();
        assert_eq!(profile.tone_markers.unwrap().description, "Dry, wry");
    }

    #[test]
    fn test_no_json() {
        let err = parse_dna_response("I could not analyze these samples.").unwrap_err();
        assert!(matches!(err, VoiceDnaError::NoJsonFound));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_dna_response("{not json}").unwrap_err();
        assert!(matches!(err, VoiceDnaError::InvalidJson(_)));
    }

    #[test]
    fn test_malformed_shape_rejected() {
        let err = parse_style_profile(r#"{"distinctive_signatures": {"examples": "Onward."}}"#)
            .unwrap_err();
        assert!(matches!(err, VoiceDnaError::InvalidJson(_)));
    }

    #[test]
    fn test_analysis_prompt_numbers_and_truncates_samples() {
        let long = "a".repeat(5001);
        let prompt = build_analysis_prompt(&["First sample.", long.as_str()], "Focus on tone.");

        assert!(prompt.contains("## Instructions\nFocus on tone."));
        assert!(prompt.contains("### Sample 1\nFirst sample."));
        assert!(prompt.contains(&format!("### Sample 2\n{}...", "a".repeat(5000))));
        assert!(!prompt.contains(&"a".repeat(5001)));
        for kind in DnaElementKind::ALL {
            assert!(prompt.contains(&format!("\"{}\"", kind.as_str())), "{}", kind.as_str());
        }
    }

    #[test]
    fn test_analysis_template_parses_as_profile() {
        let profile = parse_dna_response(&build_analysis_prompt(&["x"], "")).unwrap();
        assert_eq!(profile.populated_elements(), DnaElementKind::ALL.to_vec());
    }

    #[test]
    fn test_empty_object_is_empty_profile() {
        let profile = parse_style_profile("{}").unwrap();
        assert!(profile.is_empty());
    }
}
