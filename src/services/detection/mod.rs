// Detection Module
// Heuristic "AI-detection" scoring of generated content, organized as:
// - markers: phrase lists and compiled patterns
// - metrics: the eight independent sub-score functions
// - scorer: metric table and the aggregating entry point

pub mod markers;
pub mod metrics;
pub mod scorer;

pub use scorer::{compute_detection_score, DetectionMetric, DetectionScorer};
