// Voice Clone Core Services
// Scoring, sample intake, profile parsing and provider-backed generation

pub mod text_processor;
pub mod config_store;
pub mod providers;
pub mod detection;
pub mod confidence;
pub mod voice_dna;
pub mod sample_intake;
pub mod generation;
pub mod merge;
pub mod platform;

pub use text_processor::*;
pub use config_store::*;
pub use providers::*;
pub use confidence::{compute_confidence_score, ConfidenceMetric, ConfidenceScorer};
pub use voice_dna::{build_analysis_prompt, parse_dna_response, parse_style_profile, VoiceDnaError};
pub use sample_intake::{
    describe_samples, extract_text_from_file, SampleError, WritingSample, MIN_SAMPLE_WORDS,
};
pub use generation::{ContentGenerator, GenerationError};
pub use merge::{merged_confidence, validate_merge_sources, MergeError, MergeSource};
pub use platform::{platform_limit, preview_for_platform, split_into_threads, PlatformPreview};

// Re-export detection module functions
pub use detection::{compute_detection_score, DetectionMetric, DetectionScorer};
