use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const ISO_FORMAT: &str = "%Y-%m-%d";
const LEGACY_FORMAT: &str = "%m/%d/%Y";

/// Formats a date the way every persisted artifact stores it: `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD`, falling back to the `M/D/YYYY` form older exports used.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, ISO_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, LEGACY_FORMAT))
        .ok()
}

/// Months in which games are played. Days outside these months are never fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    in_season_months: BTreeSet<u32>,
}

impl Default for Season {
    fn default() -> Self {
        Self::from_months([11, 12, 1, 2, 3, 4])
    }
}

impl Season {
    /// Builds a season from month numbers (1 = January). Out-of-range values are ignored.
    pub fn from_months(months: impl IntoIterator<Item = u32>) -> Self {
        Self {
            in_season_months: months.into_iter().filter(|m| (1..=12).contains(m)).collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.in_season_months.contains(&date.month())
    }

    pub fn months(&self) -> impl Iterator<Item = u32> + '_ {
        self.in_season_months.iter().copied()
    }
}

/// Completion status of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "games", rename_all = "kebab-case")]
pub enum DayStatus {
    Unprocessed,
    CompletedWithGames(usize),
    CompletedEmpty,
    Failed,
}

impl DayStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, DayStatus::CompletedWithGames(_) | DayStatus::CompletedEmpty)
    }
}

/// A day of the requested range together with its season membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_season: bool,
    pub status: DayStatus,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, season: &Season) -> Self {
        Self {
            date,
            in_season: season.contains(date),
            status: DayStatus::Unprocessed,
        }
    }
}

/// Inclusive, ascending iterator over `[start, end]`.
#[derive(Debug, Clone)]
pub struct DayRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(current)
    }
}
