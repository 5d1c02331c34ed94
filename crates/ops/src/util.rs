//! Formatting and validation helpers shared by the operation handlers.

use std::sync::OnceLock;

use regex::Regex;

/// Render a price in cents as a dollar string, e.g. `1299` -> `"$12.99"`.
pub fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}

/// Convert a dollar amount to cents, rounding half away from zero.
pub fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Check an `HH:MM-HH:MM` range string (24-hour clock, both sides zero-padded).
pub fn validate_hours(hours: &str) -> bool {
    static HOURS_RE: OnceLock<Regex> = OnceLock::new();
    let re = HOURS_RE.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):[0-5]\d-([01]\d|2[0-3]):[0-5]\d$").unwrap()
    });
    re.is_match(hours.trim())
}

/// Uppercase the first letter, lowercase the rest ("monday" -> "Monday").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
