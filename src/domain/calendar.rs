// Calendar domain model - Day keys and inclusive date ranges
use crate::domain::error::ViewerError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day, rendered as an ISO-8601 date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> String {
        format!("{:04}", self.0.year())
    }

    pub fn month(&self) -> String {
        format!("{:02}", self.0.month())
    }

    pub fn day(&self) -> String {
        format!("{:02}", self.0.day())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|_| ViewerError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for DayKey {
    type Error = ViewerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

/// Inclusive range of calendar days. An inverted range (start after end)
/// is allowed and simply expands to no days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DayKey,
    pub end: DayKey,
}

impl DateRange {
    pub fn new(start: DayKey, end: DayKey) -> Self {
        Self { start, end }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ViewerError> {
        Ok(Self::new(start.parse()?, end.parse()?))
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Ascending day keys from start through end. Each call starts a fresh iterator.
    pub fn days(&self) -> Days {
        Days {
            next: (!self.is_inverted()).then_some(self.start.date()),
            end: self.end.date(),
        }
    }
}

/// Lazy iterator over the days of a `DateRange`.
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = DayKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        // succ_opt only fails at NaiveDate::MAX, which also ends the range
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(DayKey(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) => (self.end - next).num_days() as usize + 1,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Days {}
