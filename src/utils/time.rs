//! Time and text helpers used when deriving and rendering records

use chrono::{Local, TimeZone, Utc};

/// Current Unix timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render Unix milliseconds in local time, e.g. `2024-01-01 12:00:00`
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{}ms", millis),
    }
}

/// Shorten content for display
///
/// Empty content renders as `[No content]`. Longer content is cut at
/// `max_chars` characters (never inside a UTF-8 sequence) and gets `...`.
pub fn truncate(content: &str, max_chars: usize) -> String {
    if content.is_empty() {
        return "[No content]".to_string();
    }
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("", 10), "[No content]");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 4), "héll...");
        assert_eq!(truncate("🦀🦀🦀", 2), "🦀🦀...");
    }

    #[test]
    fn test_format_timestamp_shape() {
        let rendered = format_timestamp(1_700_000_000_000);
        assert_eq!(rendered.len(), "2023-11-14 22:13:20".len());
        assert!(rendered.starts_with("2023-11-1"));
    }

    #[test]
    fn test_now_millis_is_recent() {
        assert!(now_millis() > 1_700_000_000_000);
    }
}
