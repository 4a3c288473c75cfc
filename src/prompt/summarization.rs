use crate::article::Article;
use crate::prompt::common::{article_block, DONT_TELL_ME, JSON_ONLY};
use crate::settings::SummaryStyle;

pub const SUMMARY_CONTENT_CHARS: usize = 6000;

fn style_instructions(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Brief => {
            r#"* "summary": two or three sentences (40-70 words) covering who, what, and why it matters.
* "key_points": up to three very short phrases."#
        }
        SummaryStyle::Detailed => {
            r#"* "summary": one or two paragraphs (120-200 words) covering the main event, the key facts and figures, context, and implications.
* "key_points": three to five short phrases."#
        }
        SummaryStyle::BulletPoints => {
            r#"* "key_points": three to six standalone bullet points, each a complete sentence with a concrete fact from the article.
* "summary": one sentence (under 30 words) stating the article's main point."#
        }
    }
}

/// System prompt for a summary in the requested style.
///
/// `custom_prompt` is appended verbatim; it has already been screened for
/// injection by the caller.
pub fn summary_system_prompt(style: SummaryStyle, custom_prompt: Option<&str>) -> String {
    let custom = match custom_prompt.map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("\nAdditional reader instructions:\n{}\n", extra),
        _ => String::new(),
    };

    format!(
        r#"You write summaries of news articles for a daily digest.

Write in clear, neutral English. Use only information from the article, never outside knowledge or speculation. Preserve names, numbers and dates exactly.

Fields:
{instructions}
* "reasoning": one sentence on what you chose to emphasize.
{custom}{json_only}
{dont_tell_me}"#,
        instructions = style_instructions(style),
        custom = custom,
        json_only = JSON_ONLY,
        dont_tell_me = DONT_TELL_ME,
    )
}

pub fn summary_prompt(article: &Article, topics: &[String]) -> String {
    let topics = if topics.is_empty() {
        String::new()
    } else {
        format!("Known topics: {}\n", topics.join(", "))
    };

    format!(
        "## ARTICLE (FOR SUMMARY):\n{topics}{article}",
        topics = topics,
        article = article_block(article, SUMMARY_CONTENT_CHARS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_prompt_is_appended() {
        let prompt = summary_system_prompt(SummaryStyle::Brief, Some("Focus on funding."));
        assert!(prompt.contains("Additional reader instructions:\nFocus on funding."));

        let prompt = summary_system_prompt(SummaryStyle::Brief, Some("   "));
        assert!(!prompt.contains("Additional reader instructions"));
    }

    #[test]
    fn test_style_changes_instructions() {
        let brief = summary_system_prompt(SummaryStyle::Brief, None);
        let bullets = summary_system_prompt(SummaryStyle::BulletPoints, None);
        assert_ne!(brief, bullets);
        assert!(bullets.contains("bullet points"));
    }
}
