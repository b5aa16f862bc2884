use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime};

/// Shown when a timestamp does not parse; screens render it as-is rather than
/// erroring out of the whole card.
pub const DATE_PLACEHOLDER: &str = "6 May 2022";

const EMPTY_CHANNEL_LABEL: &str = "EVENT";

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn first_line(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Collapses whitespace, then cuts to `max_chars` characters, ellipsis
/// included. Counts characters, not bytes: titles here are mostly Cyrillic.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let cleaned = clean_text(text);
    if cleaned.chars().count() <= max_chars {
        return cleaned;
    }
    let keep = max_chars.saturating_sub(1);
    let cut: String = cleaned.chars().take(keep).collect();
    format!("{}…", cut.trim_end())
}

/// Renders day, abbreviated month, and year in the given locale, e.g.
/// "6 May 2022" for `en_GB`. Accepts RFC 3339, naive datetimes, and bare
/// dates; anything else gets the placeholder.
pub fn format_event_date(iso: &str, locale: Locale) -> String {
    match parse_event_date(iso) {
        Some(date) => date.format_localized("%-d %b %Y", locale).to_string(),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

fn parse_event_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Display form of a channel handle: leading `@` dropped, uppercased, cut to
/// `max_chars` characters.
pub fn channel_label(channel: &str, max_chars: usize) -> String {
    let stripped = channel.strip_prefix('@').unwrap_or(channel);
    let label: String = stripped.to_uppercase().chars().take(max_chars).collect();
    if label.is_empty() {
        EMPTY_CHANNEL_LABEL.to_string()
    } else {
        label
    }
}
