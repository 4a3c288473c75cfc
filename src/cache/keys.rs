//! Cache key formats. These are read by other services, keep them stable.

use sha2::{Digest, Sha256};

use crate::settings::SummaryStyle;

/// Hex digits of the custom prompt hash kept in summary keys.
const PROMPT_HASH_CHARS: usize = 12;

pub fn quality(fingerprint: &str) -> String {
    format!("quality:{}", fingerprint)
}

pub fn topics(fingerprint: &str) -> String {
    format!("topics:{}", fingerprint)
}

pub fn relevance(profile_id: &str, article_url: &str) -> String {
    format!("relevance:{}:{}", profile_id, article_url)
}

/// Summary key. A non-blank custom prompt shapes the output, so its hash
/// becomes part of the key: `summary:{style}:{prompt_hash}:{fingerprint}`.
pub fn summary(style: SummaryStyle, custom_prompt: Option<&str>, fingerprint: &str) -> String {
    match custom_prompt.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prompt) => {
            let digest = format!("{:x}", Sha256::digest(prompt.as_bytes()));
            format!(
                "summary:{}:{}:{}",
                style,
                &digest[..PROMPT_HASH_CHARS],
                fingerprint
            )
        }
        None => format!("summary:{}:{}", style, fingerprint),
    }
}

/// Order-independent key for a pair of articles.
pub fn similarity(fingerprint_a: &str, fingerprint_b: &str) -> String {
    let (first, second) = if fingerprint_a <= fingerprint_b {
        (fingerprint_a, fingerprint_b)
    } else {
        (fingerprint_b, fingerprint_a)
    };
    format!("similarity:{}:{}", first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_formats() {
        assert_eq!(quality("abc"), "quality:abc");
        assert_eq!(topics("abc"), "topics:abc");
        assert_eq!(relevance("u1", "https://x.test/a"), "relevance:u1:https://x.test/a");
        assert_eq!(summary(SummaryStyle::BulletPoints, None, "abc"), "summary:bullet_points:abc");
    }

    #[test]
    fn test_summary_key_tracks_custom_prompt() {
        let plain = summary(SummaryStyle::Brief, None, "abc");
        let budget = summary(SummaryStyle::Brief, Some("Mention the budget first."), "abc");
        let padded = summary(SummaryStyle::Brief, Some("  Mention the budget first.\n"), "abc");
        let other = summary(SummaryStyle::Brief, Some("Lead with the vote."), "abc");

        assert_eq!(summary(SummaryStyle::Brief, Some("   "), "abc"), plain);
        assert_ne!(budget, plain);
        assert_eq!(budget, padded);
        assert_ne!(budget, other);
        assert!(budget.starts_with("summary:brief:"));
        assert!(budget.ends_with(":abc"));
    }

    #[test]
    fn test_similarity_key_is_order_independent() {
        assert_eq!(similarity("aaa", "bbb"), "similarity:aaa:bbb");
        assert_eq!(similarity("bbb", "aaa"), "similarity:aaa:bbb");
    }
}
