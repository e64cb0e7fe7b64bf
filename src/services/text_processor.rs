// Text Processing Service
// Tokenization and small statistics helpers shared by the scorers and sample intake

use regex::Regex;
use std::sync::OnceLock;

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence break regex"))
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w+\b").expect("word regex"))
}

/// Split on runs of `.`, `!` and `?`; pieces are trimmed and empty ones dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_break_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Case-folded word tokens (`\w+` runs).
pub fn extract_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_re()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Word count as stored on a writing sample.
pub fn count_words(text: &str) -> usize {
    word_re().find_iter(text).count()
}

/// Whitespace-delimited token count, used for sentence and paragraph lengths.
pub fn whitespace_word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Paragraphs separated by a blank line (`"\n\n"`), trimmed, empties dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standard deviation over mean; `None` when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let mean = mean(values);
    if mean == 0.0 {
        return None;
    }
    Some(population_std_dev(values) / mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_collapses_runs() {
        let sentences = split_sentences("Wait... what?! Fine.  ");
        assert_eq!(sentences, vec!["Wait", "what", "Fine"]);
    }

    #[test]
    fn test_split_sentences_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("?!...").is_empty());
    }

    #[test]
    fn test_extract_words_case_folds() {
        assert_eq!(extract_words("The the THE, don't"), vec!["the", "the", "the", "don", "t"]);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Hello, world! It's 2024."), 5);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn test_split_paragraphs() {
        let text = "First one.\n\n\n\nSecond one.\nStill second.\n\n   ";
        assert_eq!(split_paragraphs(text), vec!["First one.", "Second one.\nStill second."]);
    }

    #[test]
    fn test_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(population_std_dev(&[]), 0.0);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        let cv = coefficient_of_variation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((cv - 0.4).abs() < 1e-12);
    }
}
