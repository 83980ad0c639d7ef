//! Formatting helpers for presentation code.

use chrono::{DateTime, NaiveDate, Utc};
use newsdesk_shared::User;
use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;

const WORDS_PER_MINUTE: usize = 200;

/// Palette for generated avatars.
pub const AVATAR_COLORS: &[&str] = &[
    "#667eea", "#764ba2", "#f093fb", "#f5576c", "#4facfe", "#00f2fe", "#43e97b", "#38f9d7",
    "#fa709a", "#fee140", "#a8edea", "#fed6e3",
];

/// Render an API timestamp as `dd.MM.yyyy HH:mm` (UTC).
///
/// Plain `YYYY-MM-DD` dates render at midnight; anything unparsable is
/// returned unchanged.
pub fn format_date(value: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.with_timezone(&Utc).format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%d.%m.%Y 00:00").to_string();
    }
    value.to_string()
}

/// `Less than a minute`, `1 minute` or `N minutes`.
pub fn format_reading_time(minutes: u32) -> String {
    match minutes {
        0 => "Less than a minute".to_string(),
        1 => "1 minute".to_string(),
        n => format!("{n} minutes"),
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Random entry of [`AVATAR_COLORS`].
pub fn random_color() -> &'static str {
    AVATAR_COLORS.choose(&mut rand::thread_rng()).copied().unwrap_or("#667eea")
}

/// Up to two uppercase initials; `U` for an empty name.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

/// Group digits in threes: `1234567` → `1,234,567`.
pub fn format_number(number: i64) -> String {
    let digits = number.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if number < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Absolute URL for a media path served by the content API.
pub fn image_url(base_url: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|path| !path.is_empty())?;
    if path.starts_with("http") {
        return Some(path.to_string());
    }
    Some(format!("{}{}", base_url.trim_end_matches('/'), path))
}

/// Exact role-name check, unlike the broader editor/admin predicates.
pub fn check_user_role(user: Option<&User>, role: &str) -> bool {
    user.and_then(|user| user.role.as_ref()).is_some_and(|r| r.name == role)
}

/// URL slug: lowercase ASCII words joined by single hyphens.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_separator = false;
    for ch in title.to_lowercase().chars() {
        if ch.is_whitespace() || ch == '-' {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch);
            in_separator = false;
        }
    }
    slug
}

/// Minutes to read `content` at 200 words per minute, rounded up.
pub fn calculate_reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count().max(1);
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

/// Parse `raw` as JSON, returning `default` on any error.
pub fn safe_parse_json<T: DeserializeOwned>(raw: &str, default: T) -> T {
    serde_json::from_str(raw).unwrap_or(default)
}
