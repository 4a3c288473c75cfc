/// Returns at most `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Leading excerpt of `text`, cut at a word boundary when one is close and
/// marked with an ellipsis when anything was dropped.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let truncated = truncate_chars(text, max_chars);
    if truncated.len() == text.len() {
        return truncated.to_string();
    }

    // Prefer ending on whitespace if that doesn't throw away most of the text.
    let cut = match truncated.rfind(char::is_whitespace) {
        Some(idx) if idx >= truncated.len() / 2 => &truncated[..idx],
        _ => truncated,
    };
    format!("{}...", cut.trim_end())
}

/// Strip markdown code fences some models wrap around JSON output.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        let text = "Hello 世界";
        assert_eq!(truncate_chars(text, 7), "Hello 世");
        assert_eq!(truncate_chars(text, 100), text);
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_excerpt_short_text_is_untouched() {
        assert_eq!(excerpt("  short text  ", 300), "short text");
    }

    #[test]
    fn test_excerpt_cuts_on_whitespace() {
        let text = "alpha beta gamma delta epsilon";
        assert_eq!(excerpt(text, 13), "alpha beta...");
    }

    #[test]
    fn test_excerpt_without_whitespace() {
        assert_eq!(excerpt("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("{}"), "{}");
    }
}
