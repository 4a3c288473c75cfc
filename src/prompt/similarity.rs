use crate::article::Article;
use crate::prompt::common::{DONT_TELL_ME, JSON_ONLY};
use crate::util::truncate_chars;

/// Characters of each article's content included in a pair comparison.
pub const SIMILARITY_CONTENT_CHARS: usize = 500;

pub fn similarity_system_prompt() -> String {
    format!(
        r#"You detect duplicate news coverage. Two articles are "similar" when they report on the same specific event, announcement, or story, even if written by different outlets with different wording.

Articles that merely share a broad subject (e.g. two unrelated stories about elections) are NOT similar.

Return:
* "confidence" (0.0-1.0): how sure you are that both articles cover the same story.
* "reasoning": one sentence naming the shared story, or why they differ.
{json_only}
{dont_tell_me}"#,
        json_only = JSON_ONLY,
        dont_tell_me = DONT_TELL_ME,
    )
}

pub fn similarity_prompt(first: &Article, second: &Article) -> String {
    format!(
        r#"## ARTICLE A
Title: {title_a}
{content_a}

## ARTICLE B
Title: {title_b}
{content_b}

Do these two articles cover the same story?"#,
        title_a = first.title.trim(),
        content_a = truncate_chars(first.content.trim(), SIMILARITY_CONTENT_CHARS),
        title_b = second.title.trim(),
        content_b = truncate_chars(second.content.trim(), SIMILARITY_CONTENT_CHARS),
    )
}
