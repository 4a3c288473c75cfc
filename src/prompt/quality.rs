use crate::article::Article;
use crate::prompt::common::{article_block, current_date, DONT_TELL_ME, JSON_ONLY};

/// Characters of article content sent for quality judgment.
pub const QUALITY_CONTENT_CHARS: usize = 2000;

/// System prompt for the AI half of quality scoring.
pub fn quality_system_prompt() -> String {
    format!(
        r#"You are an experienced news editor grading the quality of a single article.

Score three dimensions independently:
* writing_quality (0-20): clarity, structure, grammar, and readability.
* informativeness (0-20): concrete facts, data, and new information; penalize filler and clickbait.
* credibility (0-10): attributed sources, verifiable claims, balanced tone; penalize unsupported or sensational claims.

Add a one or two sentence "reasoning" naming the main strengths and weaknesses.

Today's date: {date}
{json_only}
{dont_tell_me}"#,
        date = current_date(),
        json_only = JSON_ONLY,
        dont_tell_me = DONT_TELL_ME,
    )
}

/// User prompt carrying the (truncated) article to grade.
pub fn quality_prompt(article: &Article) -> String {
    format!(
        r#"## ARTICLE (FOR QUALITY ASSESSMENT):
{article}

Grade ONLY the article above."#,
        article = article_block(article, QUALITY_CONTENT_CHARS),
    )
}
