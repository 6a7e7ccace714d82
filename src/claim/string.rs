use std::fmt;

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Inclusive bounds on a string's length, counted in Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringRange {
    pub min: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl StringRange {
    pub const ANY: StringRange = StringRange { min: 0, max: None };

    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn contains(&self, s: &str) -> bool {
        let len = s.chars().count();
        self.min <= len && self.max.is_none_or(|max| len <= max)
    }
}

impl fmt::Display for StringRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{} <= length <= {max}", self.min),
            None => write!(f, "{} <= length", self.min),
        }
    }
}

/// Lexical formats a string claim can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StringFormat {
    Uuid,
    DateString,
}

static UUID_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid pattern is valid")
});

impl StringFormat {
    pub fn matches(&self, s: &str) -> bool {
        match self {
            StringFormat::Uuid => UUID_RX.is_match(s),
            // RFC 3339 timestamp, or a bare calendar date
            StringFormat::DateString => {
                DateTime::parse_from_rfc3339(s).is_ok()
                    || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
            }
        }
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StringFormat::Uuid => "uuid",
            StringFormat::DateString => "date string",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_chars_not_bytes() {
        let r = StringRange::new(1, 3);
        assert!(r.contains("héé"));
        assert!(!r.contains(""));
        assert!(!r.contains("abcd"));
        assert!(StringRange::ANY.contains(""));
    }

    #[test]
    fn uuid_format() {
        assert!(StringFormat::Uuid.matches("123e4567-e89b-12d3-a456-426614174000"));
        assert!(StringFormat::Uuid.matches("123E4567-E89B-12D3-A456-426614174000"));
        assert!(!StringFormat::Uuid.matches("123e4567e89b12d3a456426614174000"));
        assert!(!StringFormat::Uuid.matches("not-a-uuid"));
    }

    #[test]
    fn date_string_format() {
        assert!(StringFormat::DateString.matches("2024-02-29"));
        assert!(StringFormat::DateString.matches("2024-02-29T12:30:00Z"));
        assert!(StringFormat::DateString.matches("2024-02-29T12:30:00.5+02:00"));
        assert!(!StringFormat::DateString.matches("2023-02-29"));
        assert!(!StringFormat::DateString.matches("yesterday"));
    }
}
