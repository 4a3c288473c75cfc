use crate::article::Article;
use crate::prompt::common::{article_block, DONT_TELL_ME, JSON_ONLY};

pub const TOPICS_CONTENT_CHARS: usize = 1500;

pub fn topics_system_prompt(max_topics: usize) -> String {
    format!(
        r#"You label news articles with the topics they are about.

Rules:
* Return at most {max_topics} topics in "topics", most central first.
* Each topic is a short noun phrase of one to three words, in lowercase (e.g. "climate policy", "semiconductors").
* Prefer specific subjects over generic ones like "news" or "world".
* Do not repeat a topic in different words.
{json_only}
{dont_tell_me}"#,
        max_topics = max_topics,
        json_only = JSON_ONLY,
        dont_tell_me = DONT_TELL_ME,
    )
}

pub fn topics_prompt(article: &Article) -> String {
    format!(
        "## ARTICLE (FOR TOPIC EXTRACTION):\n{}",
        article_block(article, TOPICS_CONTENT_CHARS)
    )
}
