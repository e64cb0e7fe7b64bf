// Content Generation Service
// Analyse samples into a voice profile, generate text through a provider,
// then score it against that profile

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::detection::compute_detection_score;
use super::providers::{GenerationOptions, ProviderError, TextGenerator};
use super::sample_intake::WritingSample;
use super::voice_dna::{build_analysis_prompt, parse_dna_response, VoiceDnaError, ANALYST_SYSTEM_PROMPT};
use crate::models::{
    DnaAnalysis, GeneratedContent, GenerationRequest, ScoreResult, StyleProfile, UsageRecord,
};

const GENERATION_MAX_TOKENS: u32 = 2048;
const GENERATION_TEMPERATURE: f64 = 0.7;
const ANALYSIS_MAX_TOKENS: u32 = 4096;
const ANALYSIS_TEMPERATURE: f64 = 0.3;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation prompt is empty")]
    EmptyPrompt,
    #[error("Voice clone has no writing samples to analyze")]
    NoSamples,
    #[error(transparent)]
    VoiceDna(#[from] VoiceDnaError),
    #[error("Provider failed: {0}")]
    Provider(#[from] ProviderError),
}

pub struct ContentGenerator<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> ContentGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Ask the provider for a Voice DNA profile of `samples`.
    pub async fn analyze(
        &self,
        samples: &[WritingSample],
        instructions: &str,
    ) -> Result<DnaAnalysis, GenerationError> {
        if samples.is_empty() {
            return Err(GenerationError::NoSamples);
        }

        let texts: Vec<&str> = samples.iter().map(|s| s.content.as_str()).collect();
        let prompt = build_analysis_prompt(&texts, instructions);
        let options = GenerationOptions {
            max_tokens: ANALYSIS_MAX_TOKENS,
            temperature: ANALYSIS_TEMPERATURE,
            system_prompt: Some(ANALYST_SYSTEM_PROMPT.to_string()),
            ..GenerationOptions::default()
        };
        let result = self.generator.generate_text(&prompt, &options).await?;
        let profile = parse_dna_response(&result.text)?;

        let total_words: u64 = samples.iter().map(|s| u64::from(s.word_count)).sum();
        info!(
            provider = self.generator.name(),
            model = %result.model,
            samples = samples.len(),
            total_words,
            elements = profile.populated_elements().len(),
            "analysis.completed"
        );

        Ok(DnaAnalysis {
            profile,
            usage: UsageRecord {
                provider: self.generator.name().to_string(),
                model: result.model,
                input_tokens: result.input_tokens,
                output_tokens: result.output_tokens,
            },
            sample_count: samples.len(),
            total_words,
        })
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
        profile: &StyleProfile,
    ) -> Result<GeneratedContent, GenerationError> {
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let options = GenerationOptions {
            max_tokens: GENERATION_MAX_TOKENS,
            temperature: GENERATION_TEMPERATURE,
            ..GenerationOptions::default()
        };
        let result = self.generator.generate_text(&request.prompt, &options).await?;

        let content_text = result.text.trim().to_string();
        let detection = compute_detection_score(&content_text, Some(profile));

        info!(
            provider = self.generator.name(),
            model = %result.model,
            platform = %request.platform,
            score = detection.total,
            "generation.completed"
        );

        Ok(GeneratedContent {
            id: Uuid::new_v4(),
            platform: request.platform.clone(),
            content_text,
            detection,
            usage: UsageRecord {
                provider: self.generator.name().to_string(),
                model: result.model,
                input_tokens: result.input_tokens,
                output_tokens: result.output_tokens,
            },
            created_at: Utc::now(),
        })
    }

    /// Generate again from the same request with reviewer feedback appended.
    pub async fn regenerate(
        &self,
        request: &GenerationRequest,
        feedback: Option<&str>,
        profile: &StyleProfile,
    ) -> Result<GeneratedContent, GenerationError> {
        match feedback.map(str::trim).filter(|f| !f.is_empty()) {
            Some(feedback) => {
                let revised = GenerationRequest {
                    platform: request.platform.clone(),
                    prompt: format!("{}\n\n[Feedback: {}]", request.prompt, feedback),
                };
                self.generate(&revised, profile).await
            }
            None => self.generate(request, profile).await,
        }
    }

    /// Score user-edited content. Edits are scored without the profile.
    pub fn rescore_edited(&self, text: &str) -> ScoreResult {
        compute_detection_score(text, None)
    }
}
