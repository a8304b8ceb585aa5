//! Display formatting for server values
//!
//! The catalog sends dates as ISO 8601 strings, either plain dates
//! (`2024-01-01`) or RFC 3339 timestamps. Values that parse neither way are
//! shown as they came.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const DATE_FORMAT: &str = "%d.%m.%Y";
const DATE_TIME_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Longest title shown on a card, in characters.
pub const MAX_TITLE_CHARS: usize = 64;

/// `dd.mm.yyyy` in local time.
pub fn date(raw: &str) -> String {
    date_in(raw, &Local)
}

/// `dd.mm.yyyy, HH:MM:SS` in local time.
pub fn date_time(raw: &str) -> String {
    date_time_in(raw, &Local)
}

pub fn date_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(DATE_FORMAT).to_string();
    }
    match parse_timestamp(raw, tz) {
        Some(timestamp) => timestamp.format(DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

pub fn date_time_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let raw = raw.trim();
    match parse_timestamp(raw, tz) {
        Some(timestamp) => timestamp.format(DATE_TIME_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// RFC 3339 converted into `tz`; timestamps without an offset are taken
/// as already being in `tz`.
fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(tz));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Items joined with `", "`.
pub fn list(items: &[String]) -> String {
    items.join(", ")
}

/// Cut a title to [`MAX_TITLE_CHARS`], marking the cut with an ellipsis.
pub fn title(text: &str) -> String {
    match text.char_indices().nth(MAX_TITLE_CHARS) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    // =============================================================
    // Dates
    // =============================================================

    #[test]
    fn test_plain_date() {
        assert_eq!(date("2024-01-01"), "01.01.2024");
    }

    #[test]
    fn test_timestamp_date_uses_timezone() {
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(date_in("2024-05-01T22:30:00Z", &Utc), "01.05.2024");
        assert_eq!(date_in("2024-05-01T22:30:00Z", &moscow), "02.05.2024");
    }

    #[test]
    fn test_date_time() {
        assert_eq!(
            date_time_in("2025-01-01T08:05:09.120Z", &Utc),
            "01.01.2025, 08:05:09"
        );
        assert_eq!(
            date_time_in("2025-01-01T08:05:09", &Utc),
            "01.01.2025, 08:05:09"
        );
    }

    #[test]
    fn test_unparseable_shown_verbatim() {
        assert_eq!(date("soon"), "soon");
        assert_eq!(date_time(" later "), "later");
    }

    // =============================================================
    // Text
    // =============================================================

    #[test]
    fn test_list() {
        assert_eq!(list(&["ios".to_string(), "web".to_string()]), "ios, web");
        assert_eq!(list(&[]), "");
    }

    #[test]
    fn test_title_cap() {
        assert_eq!(title("Bounce"), "Bounce");
        let long = "я".repeat(70);
        let capped = title(&long);
        assert_eq!(capped.chars().count(), MAX_TITLE_CHARS + 1);
        assert!(capped.ends_with('…'));
    }
}
