use crate::article::Article;
use crate::prompt::common::{DONT_TELL_ME, JSON_ONLY};
use crate::util::excerpt;

/// Characters of content used as the article digest for semantic matching.
pub const RELEVANCE_DIGEST_CHARS: usize = 600;

pub fn semantic_relevance_system_prompt() -> String {
    format!(
        r#"You decide how relevant a news article is to a reader's interests when simple keyword matching was inconclusive.

Judge meaning, not spelling: synonyms, related concepts, and the subject matter the reader clearly cares about all count.

Return:
* "score" (0-30): 0 = unrelated, 10 = tangentially related, 20 = clearly related, 30 = squarely about the reader's interests.
* "reasoning": one sentence explaining the score.
{json_only}
{dont_tell_me}"#,
        json_only = JSON_ONLY,
        dont_tell_me = DONT_TELL_ME,
    )
}

/// Prompt with the article digest, its topics, and the reader's keywords.
pub fn semantic_relevance_prompt(article: &Article, topics: &[String], keywords: &[String]) -> String {
    let topics = if topics.is_empty() {
        "none extracted".to_string()
    } else {
        topics.join(", ")
    };

    format!(
        r#"## READER INTERESTS:
{keywords}

## ARTICLE:
Title: {title}
Topics: {topics}
Digest: {digest}

How relevant is this article to the reader's interests?"#,
        keywords = keywords.join(", "),
        title = article.title.trim(),
        topics = topics,
        digest = excerpt(&article.content, RELEVANCE_DIGEST_CHARS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_prompt_lists_keywords_and_topics() {
        let article = Article::new("Chip fabs expand", "TSMC is building...", "https://example.com/a");
        let prompt = semantic_relevance_prompt(
            &article,
            &["semiconductors".to_string()],
            &["hardware".to_string(), "taiwan".to_string()],
        );
        assert!(prompt.contains("hardware, taiwan"));
        assert!(prompt.contains("Topics: semiconductors"));
        assert!(prompt.contains("Title: Chip fabs expand"));
    }

    #[test]
    fn test_semantic_prompt_without_topics() {
        let article = Article::new("t", "c", "u");
        let prompt = semantic_relevance_prompt(&article, &[], &["k".to_string()]);
        assert!(prompt.contains("Topics: none extracted"));
    }
}
