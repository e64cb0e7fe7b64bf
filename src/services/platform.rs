// Platform Limits
// Character limits per publishing platform and thread splitting for long posts

use serde::Serialize;

/// Room kept free for the `"i/total "` prefix on each thread part.
const THREAD_PREFIX_RESERVE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformLimit {
    pub platform: &'static str,
    pub name: &'static str,
    pub char_limit: Option<usize>,
    pub supports_threads: bool,
    pub thread_limit: Option<usize>,
}

const fn limit(
    platform: &'static str,
    name: &'static str,
    char_limit: Option<usize>,
    supports_threads: bool,
    thread_limit: Option<usize>,
) -> PlatformLimit {
    PlatformLimit {
        platform,
        name,
        char_limit,
        supports_threads,
        thread_limit,
    }
}

pub static PLATFORM_LIMITS: [PlatformLimit; 7] = [
    limit("twitter", "Twitter/X", Some(280), true, Some(25)),
    limit("linkedin", "LinkedIn", Some(3000), false, None),
    limit("facebook", "Facebook", Some(63206), false, None),
    limit("instagram", "Instagram", Some(2200), false, None),
    limit("email", "Email", None, false, None),
    limit("blog", "Blog", None, false, None),
    limit("sms", "SMS", Some(160), false, None),
];

pub fn platform_limit(platform: &str) -> Option<&'static PlatformLimit> {
    PLATFORM_LIMITS.iter().find(|p| p.platform == platform)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformPreview {
    pub platform: String,
    pub char_count: usize,
    pub char_limit: Option<usize>,
    pub is_within_limit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<Vec<String>>,
}

/// How `text` fits `platform`. Over-long Twitter posts come back split into threads.
pub fn preview_for_platform(platform: &str, text: &str) -> PlatformPreview {
    let info = platform_limit(platform);
    let char_limit = info.and_then(|p| p.char_limit);
    let supports_threads = info.is_some_and(|p| p.supports_threads);
    let char_count = text.chars().count();

    let threads = match char_limit {
        Some(limit) if platform == "twitter" && supports_threads && char_count > limit => {
            Some(split_into_threads(text, limit))
        }
        _ => None,
    };

    PlatformPreview {
        platform: platform.to_string(),
        char_count,
        char_limit,
        is_within_limit: char_limit.map_or(true, |limit| char_count <= limit),
        threads,
    }
}

/// Pack whitespace-separated words into parts of at most `char_limit - 6`
/// characters, then number them `"1/n "`, `"2/n "`, ... A single word longer
/// than the budget gets a part of its own.
pub fn split_into_threads(text: &str, char_limit: usize) -> Vec<String> {
    let budget = char_limit.saturating_sub(THREAD_PREFIX_RESERVE);

    let mut parts: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = word_len + usize::from(!current.is_empty());

        if current_len + needed > budget {
            if !current.is_empty() {
                parts.push(current.join(" "));
            }
            current = vec![word];
            current_len = word_len;
        } else {
            current.push(word);
            current_len += needed;
        }
    }
    if !current.is_empty() {
        parts.push(current.join(" "));
    }

    let total = parts.len();
    parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| format!("{}/{} {}", i + 1, total, part))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_platforms() {
        assert_eq!(platform_limit("twitter").unwrap().char_limit, Some(280));
        assert_eq!(platform_limit("blog").unwrap().char_limit, None);
        assert!(platform_limit("myspace").is_none());
    }

    #[test]
    fn test_split_packs_words_and_numbers_parts() {
        // budget is 16 - 6 = 10 characters
        let parts = split_into_threads("aaaa bbbb cccc dd e", 16);
        assert_eq!(parts, vec!["1/2 aaaa bbbb", "2/2 cccc dd e"]);
    }

    #[test]
    fn test_split_long_word_gets_own_part() {
        let parts = split_into_threads("hi abcdefghijklmnop yo", 16);
        assert_eq!(parts, vec!["1/3 hi", "2/3 abcdefghijklmnop", "3/3 yo"]);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        // four 2-char words of 4 bytes each
        let parts = split_into_threads("éé éé éé éé", 14);
        assert_eq!(parts, vec!["1/2 éé éé éé", "2/2 éé"]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_into_threads("   ", 280).is_empty());
    }

    #[test]
    fn test_preview_twitter_threads_only_when_over_limit() {
        let short = preview_for_platform("twitter", "Shipping today.");
        assert!(short.is_within_limit);
        assert_eq!(short.threads, None);

        let long_text = "word ".repeat(100);
        let long = preview_for_platform("twitter", long_text.trim());
        assert_eq!(long.char_count, 499);
        assert!(!long.is_within_limit);
        let threads = long.threads.unwrap();
        assert_eq!(threads.len(), 2);
        assert!(threads.iter().all(|t| t.chars().count() <= 280));
        assert!(threads[0].starts_with("1/2 "));
    }

    #[test]
    fn test_preview_other_platforms() {
        let sms = preview_for_platform("sms", &"x".repeat(161));
        assert!(!sms.is_within_limit);
        assert_eq!(sms.threads, None);

        let blog = preview_for_platform("blog", &"x".repeat(100_000));
        assert!(blog.is_within_limit);

        let unknown = preview_for_platform("myspace", "hello");
        assert_eq!(unknown.char_limit, None);
        assert!(unknown.is_within_limit);
    }
}
