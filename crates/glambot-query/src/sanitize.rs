//! Input sanitization.
//!
//! Applied before any other processing: strip script blocks, strip remaining
//! HTML tags, drop a denylist of SQL keywords (best-effort, not a substitute
//! for parameterized queries elsewhere), and cap length at 1000 characters.

use regex::Regex;
use std::sync::LazyLock;

const MAX_MESSAGE_CHARS: usize = 1000;

static SCRIPT_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("script pattern")
});

static HTML_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

static SQL_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|EXECUTE)\b")
        .expect("sql pattern")
});

/// Sanitize one inbound message. Pure; returns the cleaned text.
pub fn sanitize(input: &str) -> String {
    let cleaned = SCRIPT_BLOCKS.replace_all(input, "");
    let cleaned = HTML_TAGS.replace_all(&cleaned, "");
    let cleaned = SQL_KEYWORDS.replace_all(&cleaned, "");

    let truncated: String = cleaned.chars().take(MAX_MESSAGE_CHARS).collect();
    truncated.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script_blocks() {
        let out = sanitize("hello <script>alert('x')</script>world");
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_strips_html_tags() {
        assert_eq!(sanitize("<b>price</b> of haircut"), "price of haircut");
    }

    #[test]
    fn test_strips_sql_keywords() {
        let out = sanitize("DROP TABLE users; what is the price");
        assert!(!out.to_lowercase().contains("drop"));
        assert!(out.contains("price"));
    }

    #[test]
    fn test_truncates_to_limit() {
        let long = "a".repeat(5000);
        assert_eq!(sanitize(&long).chars().count(), 1000);
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("  kya price hai  "), "kya price hai");
    }
}
