// Marker Tables
// Phrase lists and compiled patterns used by the detection metrics.
// Patterns are applied to lower-cased text unless noted.

use regex::Regex;
use std::sync::OnceLock;

/// Concrete-detail patterns, each worth points once regardless of repetitions.
/// The percentage pattern keeps its trailing `\b`, so it only fires when a
/// word character follows the `%`.
const SPECIFIC_PATTERNS: [&str; 7] = [
    r"\b\d{1,2}[%]\b",
    r"\b\d+[,.]\d+\b",
    r"\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    r"\b(january|february|march|april|may|june|july|august|september|october|november|december)\b",
    r"\b\d{4}\b",
    r#""[^"]+?""#,
    r"\b(specifically|particularly|exactly|precisely)\b",
];

pub const GENERIC_AI_PHRASES: [&str; 8] = [
    "in today's world",
    "in conclusion",
    "it's important to note",
    "as we all know",
    "in this day and age",
    "going forward",
    "at the end of the day",
    "it goes without saying",
];

/// Checked as plain substrings, so "thus" also counts inside longer words.
pub const AI_TRANSITIONS: [&str; 8] = [
    "furthermore",
    "moreover",
    "additionally",
    "in addition",
    "consequently",
    "subsequently",
    "thus",
    "hence",
];

/// Substring checks as well: "so" is present whenever "also" is.
pub const NATURAL_TRANSITIONS: [&str; 10] = [
    "but", "so", "and", "also", "though", "still", "yet", "anyway", "look", "honestly",
];

pub const AI_OPENINGS: [&str; 4] = ["in today's", "have you ever", "let me tell you", "i'm excited to"];

pub const CALLS_TO_ACTION: [&str; 4] = ["let me know", "share your", "drop a comment", "what do you think"];

/// Voice markers worth half a point each. The final `\?\n?$` mirrors a
/// question mark at end of text, tolerating one trailing newline.
const PERSONALITY_PATTERNS: [&str; 11] = [
    r"\bi\b",
    r"\bwe\b",
    r"\bmy\b",
    r"\bour\b",
    r"\bhonestly\b",
    r"\bfrankly\b",
    r"\bactually\b",
    r"\bliterally\b",
    r"\bseriously\b",
    r"!",
    r"\?\n?$",
];

pub const BULLET_PREFIXES: [char; 4] = ['-', '•', '*', '→'];

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("marker regex"))
        .collect()
}

pub fn specific_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| compile_all(&SPECIFIC_PATTERNS))
}

pub fn personality_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| compile_all(&PERSONALITY_PATTERNS))
}

pub fn numbered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.").expect("numbered item regex"))
}
