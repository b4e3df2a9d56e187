//! Field normalizers applied to every piece of client input before it is
//! validated or stored. None of these panic; a value that cannot be
//! normalized comes back as `None` (or an empty string for free text).

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use validator::ValidateEmail;

fn script_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>")
            .expect("script block pattern is valid")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)</?[A-Za-z!][^<>]*>").expect("tag pattern is valid")
    })
}

fn date_shape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"))
}

fn strip_markup(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let without_scripts = script_block_pattern().replace_all(trimmed, "");
    tag_pattern().replace_all(&without_scripts, "").into_owned()
}

fn escape_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Trims and removes all markup. Stray angle brackets that are not part of a
/// tag are escaped so they can never be reassembled into one.
pub fn sanitize_string(input: &str) -> String {
    escape_brackets(&strip_markup(input))
}

/// Caps the visible text at `max_chars`. The cut happens before escaping so
/// an entity is never split.
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let stripped = strip_markup(input);
    let capped: String = stripped.chars().take(max_chars).collect();
    escape_brackets(&capped)
}

pub fn sanitize_email(input: &str) -> Option<String> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() || !normalized.validate_email() {
        return None;
    }
    Some(normalized)
}

/// Keeps digits and a single leading `+`; 10 to 15 digits.
pub fn sanitize_phone(input: &str) -> Option<String> {
    let kept: String = input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    let digits: String = kept.chars().filter(|c| c.is_ascii_digit()).collect();
    if !(10..=15).contains(&digits.len()) {
        return None;
    }
    if kept.contains('+') {
        Some(format!("+{}", digits))
    } else {
        Some(digits)
    }
}

fn keep_chars(input: &str, max_len: usize, allowed: impl Fn(char) -> bool) -> Option<String> {
    let kept: String = input.trim().chars().filter(|c| allowed(*c)).collect();
    if kept.is_empty() || kept.chars().count() > max_len {
        None
    } else {
        Some(kept)
    }
}

pub fn sanitize_enrollment_no(input: &str) -> Option<String> {
    keep_chars(input, 50, |c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn sanitize_application_no(input: &str) -> Option<String> {
    keep_chars(input, 30, |c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn sanitize_username(input: &str) -> Option<String> {
    keep_chars(input, 100, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '@' | '.')
    })
}

/// Strict `YYYY-MM-DD`; rejects impossible calendar dates such as `2024-02-30`.
pub fn sanitize_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if !date_shape_pattern().is_match(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Parses the leading integer of `input` (`"12abc"` is 12) and keeps it only
/// when positive.
pub fn sanitize_id(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let parsed: i64 = digits.parse().ok()?;
    let value = sign * parsed;
    (value > 0).then_some(value)
}

/// JSON bodies carry IDs either as numbers or as strings.
pub fn sanitize_id_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
            .filter(|id| *id > 0),
        serde_json::Value::String(raw) => sanitize_id(raw),
        _ => None,
    }
}

pub fn sanitize_enum(input: &str, allowed: &[&str]) -> Option<String> {
    let trimmed = input.trim();
    allowed
        .iter()
        .find(|candidate| **candidate == trimmed)
        .map(|candidate| candidate.to_string())
}

pub fn sanitize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let parsed = url::Url::parse(trimmed).ok()?;
    let scheme_ok = matches!(parsed.scheme(), "http" | "https");
    if scheme_ok && parsed.host_str().is_some() {
        Some(trimmed.to_string())
    } else {
        None
    }
}
