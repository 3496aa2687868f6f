use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::errors::CoreError;

/// A calendar month, the bucket every record and goal is keyed by.
///
/// Renders as the year-month key `"YYYY-MM"`. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a month from its parts. Years are limited to four digits so the
    /// key stays `"YYYY-MM"`.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(CoreError::InvalidMonth(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`. Dates outside years 0000..=9999 saturate
    /// to `0000-01` or `9999-12`.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.year() {
            year if year < 0 => Self { year: 0, month: 1 },
            year if year > 9999 => Self { year: 9999, month: 12 },
            year => Self {
                year,
                month: date.month(),
            },
        }
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Step back `n` months, rolling over year boundaries.
    /// Returns `None` when the result would fall before `0000-01`.
    pub fn checked_sub_months(self, n: u32) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) - i64::from(n);
        if index < 0 {
            return None;
        }
        Some(Self {
            year: (index / 12) as i32,
            month: (index % 12) as u32 + 1,
        })
    }

    /// The month before this one (`2026-01` → `2025-12`).
    pub fn pred(self) -> Option<Self> {
        self.checked_sub_months(1)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    /// Accepts exactly `"YYYY-MM"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidMonth(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let digits = |part: &[u8]| part.iter().all(u8::is_ascii_digit);
        if !digits(&bytes[..4]) || !digits(&bytes[5..]) {
            return Err(invalid());
        }
        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The month a record date string falls in, if the date starts with a valid
/// `"YYYY-MM"` prefix. Anything after the prefix is ignored.
pub fn month_of(date: &str) -> Option<YearMonth> {
    date.get(..7)?.parse().ok()
}

/// Year-month key of a date string: `"2026-02-24"` → `"2026-02"`.
///
/// Short or malformed dates yield an empty string, which matches no month.
pub fn month_key(date: &str) -> String {
    month_of(date).map(|m| m.to_string()).unwrap_or_default()
}
