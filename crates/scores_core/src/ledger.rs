use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::calendar::{format_date, parse_date};

/// Substrings that mark a ledger line as a failure during reconciliation.
pub const FAILURE_MARKERS: &[&str] = &["Failed to load", "Failed to persist", "❌"];

const SCRAPED_SUFFIX: &str = " games scraped";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// The day completed; zero games means a confirmed-empty day.
    Scraped { games: usize },
    Failed { reason: String },
}

impl LedgerOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, LedgerOutcome::Failed { .. })
    }
}

/// One line of the progress ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub outcome: LedgerOutcome,
}

impl LedgerEntry {
    pub fn new(date: NaiveDate, outcome: LedgerOutcome) -> Self {
        Self { date, outcome }
    }

    /// `2021-11-09: 12 games scraped` or `2021-11-09: Failed to load scoreboard (...)`.
    pub fn to_line(&self) -> String {
        let date = format_date(self.date);
        match &self.outcome {
            LedgerOutcome::Scraped { games } => format!("{date}: {games}{SCRAPED_SUFFIX}"),
            LedgerOutcome::Failed { reason } => format!("{date}: {reason}"),
        }
    }

    /// Parses a ledger line. The date may be wrapped in brackets (`[2021-11-09]`).
    /// Anything after the date that is not a games count is treated as a failure.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (head, rest) = line.trim().split_once(':')?;
        let date = parse_date(head.trim_matches(|c| c == '[' || c == ']' || c == ' '))?;
        let rest = rest.trim();
        let outcome = match rest
            .strip_suffix(SCRAPED_SUFFIX)
            .and_then(|count| count.trim().parse::<usize>().ok())
        {
            Some(games) => LedgerOutcome::Scraped { games },
            None => LedgerOutcome::Failed {
                reason: rest.to_string(),
            },
        };
        Some(Self { date, outcome })
    }

    /// Zero-game days and explicit failure markers both qualify for a re-scrape.
    pub fn needs_rescrape(&self) -> bool {
        match &self.outcome {
            LedgerOutcome::Scraped { games } => *games == 0,
            LedgerOutcome::Failed { reason } => {
                FAILURE_MARKERS.iter().any(|marker| reason.contains(marker))
            }
        }
    }
}

/// Dates with at least one non-failure entry. Safe to skip on resume.
pub fn completed_dates<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> BTreeSet<NaiveDate> {
    entries
        .into_iter()
        .filter(|entry| !entry.outcome.is_failure())
        .map(|entry| entry.date)
        .collect()
}

/// Scans raw ledger lines for failure markers and returns the affected dates,
/// sorted and unique. A date whose latest entry recorded games is excluded,
/// since a later re-scrape already recovered it.
pub fn reconcile_failed_dates<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<NaiveDate> {
    let mut flagged = BTreeSet::new();
    let mut latest: BTreeMap<NaiveDate, LedgerEntry> = BTreeMap::new();
    for line in lines {
        let Some(entry) = LedgerEntry::parse_line(line) else {
            continue;
        };
        if entry.needs_rescrape() {
            flagged.insert(entry.date);
        }
        latest.insert(entry.date, entry);
    }
    flagged
        .into_iter()
        .filter(|date| {
            !matches!(
                latest.get(date).map(|e| &e.outcome),
                Some(LedgerOutcome::Scraped { games }) if *games > 0
            )
        })
        .collect()
}
