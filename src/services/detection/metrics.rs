// Detection Metrics
// Eight independent heuristics, each returning a bounded integer sub-score.
// Higher means the text reads as more human-written.

use std::collections::HashSet;

use super::markers::{
    numbered_item_re, personality_patterns, specific_patterns, AI_OPENINGS, AI_TRANSITIONS,
    BULLET_PREFIXES, CALLS_TO_ACTION, GENERIC_AI_PHRASES, NATURAL_TRANSITIONS,
};
use crate::models::StyleProfile;
use crate::services::text_processor::{
    coefficient_of_variation, extract_words, split_paragraphs, split_sentences,
    whitespace_word_count,
};

/// Fallback for inputs too small to measure.
const INSUFFICIENT_DATA: u32 = 5;

/// Sentence length variety via coefficient of variation (max 20).
pub fn sentence_variety(text: &str) -> u32 {
    let sentences = split_sentences(text);
    if sentences.len() < 2 {
        return INSUFFICIENT_DATA;
    }

    let lengths: Vec<f64> = sentences
        .iter()
        .map(|s| whitespace_word_count(s) as f64)
        .collect();
    let Some(cv) = coefficient_of_variation(&lengths) else {
        return INSUFFICIENT_DATA;
    };

    if cv > 0.5 {
        20
    } else if cv > 0.4 {
        17
    } else if cv > 0.3 {
        14
    } else if cv > 0.2 {
        10
    } else {
        5
    }
}

/// Type-token ratio, boosted for long texts where TTR decays (max 15).
pub fn vocabulary_diversity(text: &str) -> u32 {
    let words = extract_words(text);
    if words.len() < 10 {
        return INSUFFICIENT_DATA;
    }

    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    let mut ttr = unique.len() as f64 / words.len() as f64;
    if words.len() > 200 {
        ttr *= 1.3;
    }

    if ttr > 0.7 {
        15
    } else if ttr > 0.6 {
        12
    } else if ttr > 0.5 {
        9
    } else if ttr > 0.4 {
        6
    } else {
        3
    }
}

/// Concrete details versus stock filler phrases (max 15).
pub fn specificity(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    let mut score: i32 = 0;

    for pattern in specific_patterns() {
        if pattern.is_match(&lowered) {
            score += 2;
        }
    }
    for phrase in GENERIC_AI_PHRASES {
        if lowered.contains(phrase) {
            score -= 2;
        }
    }

    (score + 8).clamp(0, 15) as u32
}

/// Conversational versus textbook transitions, presence only (max 10).
pub fn transition_naturalness(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    let ai_count = AI_TRANSITIONS.iter().filter(|t| lowered.contains(*t)).count() as i32;
    let natural_count = NATURAL_TRANSITIONS
        .iter()
        .filter(|t| lowered.contains(*t))
        .count() as i32;

    (5 + natural_count * 2 - ai_count * 2).clamp(0, 10) as u32
}

/// Stock openers are penalised and a closing call to action rewarded (max 10).
pub fn opening_closing(text: &str) -> u32 {
    let mut score: i32 = 5;

    let sentences = split_sentences(text);
    let Some(first) = sentences.first() else {
        return score as u32;
    };

    let first_lower = first.to_lowercase();
    for opening in AI_OPENINGS {
        if first_lower.starts_with(opening) {
            score -= 2;
        }
    }

    // Runs on the lowercased sentence, so it only fires for characters with
    // no lowercase form. Stored scores depend on this.
    let starts_upper = first_lower.chars().next().is_some_and(char::is_uppercase);
    if starts_upper && whitespace_word_count(first) < 10 {
        score += 2;
    }

    if sentences.len() > 1 {
        let last_lower = sentences[sentences.len() - 1].to_lowercase();
        if CALLS_TO_ACTION.iter().any(|cta| last_lower.contains(cta)) {
            score += 1;
        }
    }

    score.clamp(0, 10) as u32
}

/// Variety of punctuation marks plus natural comma density (max 10).
pub fn punctuation(text: &str) -> u32 {
    let mut score: u32 = 5;

    let detections = [
        text.contains('—') || text.contains(" - "),
        text.contains("...") || text.contains('…'),
        text.contains('(') && text.contains(')'),
        text.contains('!'),
        text.contains('?'),
    ];
    let variety = detections.iter().filter(|d| **d).count() as u32;
    score += variety.min(3);

    let sentence_count = split_sentences(text).len();
    if sentence_count > 0 {
        let comma_ratio = text.matches(',').count() as f64 / sentence_count as f64;
        if comma_ratio > 1.0 && comma_ratio < 3.0 {
            score += 2;
        }
    }

    score.min(10)
}

/// First-person voice, candour adverbs, emotional punctuation and the
/// writer's own signature phrases (max 10).
pub fn personality(text: &str, profile: Option<&StyleProfile>) -> u32 {
    let lowered = text.to_lowercase();

    // Counted in half points: base 5 => 10 halves, each marker => 1, each signature => 4.
    let mut halves: u32 = 10;
    halves += personality_patterns()
        .iter()
        .filter(|re| re.is_match(&lowered))
        .count() as u32;

    if let Some(profile) = profile {
        for example in profile.signature_examples() {
            if lowered.contains(&example.to_lowercase()) {
                halves += 4;
            }
        }
    }

    (halves / 2).min(10)
}

/// Paragraph length spread, list usage and varied paragraph openings (max 10).
pub fn structure(text: &str) -> u32 {
    let mut score: u32 = 5;

    let paragraphs = split_paragraphs(text);
    if paragraphs.len() > 1 {
        let lengths: Vec<usize> = paragraphs.iter().map(|p| whitespace_word_count(p)).collect();
        let longest = lengths.iter().copied().max().unwrap_or(0);
        let shortest = lengths.iter().copied().min().unwrap_or(0);
        if longest - shortest > 20 {
            score += 2;
        }
    }

    let has_list = text.split('\n').map(str::trim).any(|line| {
        line.starts_with(&BULLET_PREFIXES[..]) || numbered_item_re().is_match(line)
    });
    if has_list {
        score += 2;
    }

    let openers: HashSet<String> = paragraphs
        .iter()
        .map(|p| p.split_whitespace().next().unwrap_or("").to_lowercase())
        .collect();
    if openers.len() as f64 >= paragraphs.len() as f64 * 0.7 {
        score += 1;
    }

    score.min(10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DnaElement;

    fn profile_with_signatures(examples: &[&str]) -> StyleProfile {
        StyleProfile {
            distinctive_signatures: Some(DnaElement {
                description: "Recurring phrases".to_string(),
                examples: examples.iter().map(|e| e.to_string()).collect(),
                notes: String::new(),
            }),
            ..StyleProfile::default()
        }
    }

    #[test]
    fn test_sentence_variety_single_sentence() {
        assert_eq!(sentence_variety("One sentence only."), 5);
        assert_eq!(sentence_variety("no terminator at all"), 5);
    }

    #[test]
    fn test_sentence_variety_thresholds() {
        // lengths 1 and 10: cv ~0.82
        assert_eq!(sentence_variety("Short. This one is a good deal longer than the first."), 20);
        // identical lengths: cv 0
        assert_eq!(sentence_variety("Three words here. Three words again. And three more."), 5);
        // lengths 3, 5, 3: cv ~0.257
        assert_eq!(sentence_variety("I love this! Have you ever wondered why? Honestly, it's simple."), 10);
    }

    #[test]
    fn test_vocabulary_diversity_short_text() {
        assert_eq!(vocabulary_diversity("too short to judge"), 5);
    }

    #[test]
    fn test_vocabulary_diversity_ratio() {
        assert_eq!(
            vocabulary_diversity("alpha beta gamma delta epsilon zeta eta theta iota kappa"),
            15
        );
        assert_eq!(vocabulary_diversity(&"the ".repeat(10)), 3);
    }

    #[test]
    fn test_vocabulary_diversity_long_text_boost() {
        // 210 words, 70 distinct: ttr 0.333 boosted to 0.433
        let words: Vec<String> = (0..210).map(|i| format!("w{}", i % 70)).collect();
        assert_eq!(vocabulary_diversity(&words.join(" ")), 6);

        // same ratio below the length cutoff gets no boost
        let words: Vec<String> = (0..150).map(|i| format!("w{}", i % 50)).collect();
        assert_eq!(vocabulary_diversity(&words.join(" ")), 3);
    }

    #[test]
    fn test_specificity_baseline_and_rewards() {
        assert_eq!(specificity("nothing special here"), 8);
        assert_eq!(specificity("We met on Monday in 2023."), 12);
        assert_eq!(
            specificity("On Monday, 2023, I paid 3.50 for \"coffee\", specifically."),
            15
        );
    }

    #[test]
    fn test_specificity_counts_each_pattern_once() {
        assert_eq!(specificity("Monday, Tuesday and Friday."), 10);
    }

    #[test]
    fn test_specificity_penalises_generic_phrases() {
        assert_eq!(
            specificity("In conclusion, going forward, at the end of the day it goes without saying."),
            0
        );
        assert_eq!(specificity("In conclusion, that's it."), 6);
    }

    #[test]
    fn test_transition_naturalness() {
        assert_eq!(transition_naturalness("Furthermore, moreover, thus."), 0);
        // "also" also contains "so"
        assert_eq!(transition_naturalness("Also, it works."), 9);
        assert_eq!(transition_naturalness("Nothing to see here."), 5);
    }

    #[test]
    fn test_opening_closing_direct_opener_and_cta() {
        assert_eq!(opening_closing("Short opener. What do you think?"), 6);
    }

    #[test]
    fn test_opening_closing_capital_start_not_rewarded() {
        assert_eq!(opening_closing("Short opener. Thanks for reading."), 5);
        assert_eq!(opening_closing("Hi."), 5);
    }

    #[test]
    fn test_opening_closing_generic_opener() {
        let text = "In today's fast-paced digital landscape, we will explore many different things together. Thanks for reading.";
        assert_eq!(opening_closing(text), 3);
    }

    #[test]
    fn test_opening_closing_lowercase_single_sentence() {
        assert_eq!(opening_closing("lowercase start here"), 5);
        assert_eq!(opening_closing("...!!"), 5);
    }

    #[test]
    fn test_opening_closing_cta_requires_distinct_last_sentence() {
        // only one sentence, so no closing bonus
        assert_eq!(opening_closing("Let me know"), 5);
    }

    #[test]
    fn test_punctuation_variety() {
        assert_eq!(punctuation("Plain sentence"), 5);
        assert_eq!(punctuation("Wait — really? Yes (mostly)! Well... fine."), 8);
    }

    #[test]
    fn test_punctuation_comma_ratio() {
        assert_eq!(punctuation("One, two, three. Four, five."), 7);
        // ratio exactly 1.0 is not rewarded
        assert_eq!(punctuation("One, two. Three, four."), 5);
    }

    #[test]
    fn test_personality_markers() {
        assert_eq!(personality("The report is ready.", None), 5);
        assert_eq!(
            personality("I love this! Have you ever wondered why? Honestly, it's simple.", None),
            6
        );
    }

    #[test]
    fn test_personality_signature_examples() {
        let profile = profile_with_signatures(&["Here's the thing"]);
        assert_eq!(personality("here's the thing: I ship fast.", Some(&profile)), 7);
        assert_eq!(personality("here's the thing: I ship fast.", None), 5);
    }

    #[test]
    fn test_personality_clamped() {
        let profile = profile_with_signatures(&["ship it", "no fluff", "period"]);
        let text = "Honestly, I ship it. No fluff, period! We literally mean it?";
        assert_eq!(personality(text, Some(&profile)), 10);
    }

    #[test]
    fn test_structure_single_paragraph() {
        assert_eq!(structure("Just one paragraph of text."), 6);
    }

    #[test]
    fn test_structure_lists() {
        assert_eq!(structure("Intro line\n- one\n- two"), 8);
        assert_eq!(structure("Steps:\n1. mix\n2. bake"), 8);
    }

    #[test]
    fn test_structure_paragraph_spread_and_openers() {
        let long = format!("The {}", "word ".repeat(26));
        let text = format!("The end.\n\n{}", long.trim());
        // spread 27 - 2 > 20, but both paragraphs open with "the"
        assert_eq!(structure(&text), 7);
    }
}
