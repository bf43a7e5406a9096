use chrono::{Local, TimeZone};

/// Decodes a raw substring captured out of a JSON blob (`\uXXXX`, `\n`, ...).
/// Falls back to the input when it is not a valid JSON string body.
pub fn unescape_json_fragment(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string())
}

/// Formats a Unix timestamp as local `YYYY-MM-DD HH:MM:SS`. Zero yields an empty string.
pub fn format_timestamp(secs: i64) -> String {
    if secs <= 0 {
        return String::new();
    }

    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}
