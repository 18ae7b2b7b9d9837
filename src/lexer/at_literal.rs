//! Classifies the word following an `@` into one of Parsley's four
//! `@`-literal families (spec §4.1, §6.2): path, url, datetime, duration.
//! `scan_at_literal`/`scan_at_template` in `mod.rs` scan the raw text first
//! (lexing doesn't need to know the family to find the token's extent) and
//! only ask `classify` to pick a `TokenKind` afterward.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `YYYY-MM-DD`, optionally followed by a `T`/space-separated time
/// (capture group 1) with optional seconds and offset/`Z`. `make_datetime`
/// uses `caps.get(1).is_none()` to tell a bare date from a full datetime.
pub static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2})?(Z|[+-]\d{2}:\d{2})?)?$").unwrap());

/// Matches a bare `HH:MM` or `HH:MM:SS` time-of-day literal.
pub static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").unwrap());

/// Matches a duration literal's unit shorthand (`1h30m`, `-2w`, ...), the
/// same unit set `builtins::duration::make_duration` parses.
static DURATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?(\d+(y|mo|w|d|h|m|s))+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtFamily {
    Path,
    Url,
    Datetime,
    Duration,
}

/// A character that can appear inside an `@`-literal's contiguous word —
/// covers path segments, URL authority/query/fragment syntax, and
/// datetime/duration digits and separators all at once, since the lexer
/// scans the whole word before it knows which family it belongs to.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '/' | '-' | '_' | ':' | '~' | '?' | '&' | '=' | '%' | '#' | '+' | '@')
}

pub fn classify(word: &str) -> AtFamily {
    if word.contains("://") {
        AtFamily::Url
    } else if DATE_RE.is_match(word) || TIME_RE.is_match(word) {
        AtFamily::Datetime
    } else if DURATION_RE.is_match(word) {
        AtFamily::Duration
    } else {
        AtFamily::Path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_a_bare_date() {
        assert_eq!(classify("2024-01-01"), AtFamily::Datetime);
    }

    #[test]
    fn classifies_a_full_datetime() {
        assert_eq!(classify("2024-01-01T14:30:00"), AtFamily::Datetime);
    }

    #[test]
    fn classifies_a_bare_time() {
        assert_eq!(classify("14:30"), AtFamily::Datetime);
    }

    #[test]
    fn classifies_a_url_by_scheme_separator() {
        assert_eq!(classify("https://example.com"), AtFamily::Url);
    }

    #[test]
    fn classifies_a_duration() {
        assert_eq!(classify("1h30m"), AtFamily::Duration);
    }

    #[test]
    fn classifies_anything_else_as_a_path() {
        assert_eq!(classify("./rel"), AtFamily::Path);
        assert_eq!(classify("/abs/path"), AtFamily::Path);
    }

    #[test]
    fn date_re_group_one_distinguishes_date_only_from_full_datetime() {
        assert!(DATE_RE.captures("2024-01-01").unwrap().get(1).is_none());
        assert!(DATE_RE.captures("2024-01-01T14:30:00").unwrap().get(1).is_some());
    }
}
