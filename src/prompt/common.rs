use chrono::{DateTime, Local, Utc};

use crate::article::Article;
use crate::util::truncate_chars;

// Common text blocks for all prompts
pub const DONT_TELL_ME: &str = r#"
Important instructions for your responses:

1. Do not narrate or describe your actions.
2. Do not summarize or restate the instructions I've given you.
3. Do not preface your responses with phrases like "Here's a summary..." or "I will now..."
4. Do not acknowledge or confirm that you understand these instructions.
5. Avoid phrases like "As an AI language model..." or similar self-referential statements.
"#;

pub const JSON_ONLY: &str = r#"
Output rules:
* Return ONLY the JSON object. No markdown, no commentary before or after it.
* Every numeric field must be a plain number inside the stated range.
"#;

/// Utility function to get the current date in a human-readable format
pub fn current_date() -> String {
    let today = Local::now();
    format!(
        "{} {}, {}",
        today.format("%B"),
        today.format("%-d"),
        today.format("%Y")
    )
}

fn publication_line(published_at: Option<DateTime<Utc>>) -> String {
    match published_at {
        Some(date) => format!("Publication date: {}", date.format("%B %-d, %Y")),
        None => "Publication date: unknown".to_string(),
    }
}

/// Renders an article block for a prompt with its content cut to `max_chars`.
pub fn article_block(article: &Article, max_chars: usize) -> String {
    format!(
        r#"Title: {title}
URL: {url}
{publication}
----------
{content}
----------"#,
        title = article.title.trim(),
        url = article.source_url,
        publication = publication_line(article.published_at),
        content = truncate_chars(article.content.trim(), max_chars),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_block_truncates_content() {
        let article = Article::new("Headline", "x".repeat(50), "https://example.com/a");
        let block = article_block(&article, 10);
        assert!(block.contains("Title: Headline"));
        assert!(block.contains("URL: https://example.com/a"));
        assert!(block.contains("Publication date: unknown"));
        assert!(block.contains(&"x".repeat(10)));
        assert!(!block.contains(&"x".repeat(11)));
    }
}
