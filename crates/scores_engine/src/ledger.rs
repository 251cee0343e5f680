use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use scores_core::{completed_dates, reconcile_failed_dates, LedgerEntry, LedgerOutcome};
use thiserror::Error;

use crate::persist::{ensure_parent_dir, PersistError};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Append-only text log of processed days, one line per outcome.
///
/// The in-memory view is updated before the file write, so a failed write
/// still counts for the current process. Only the next run loses it.
#[derive(Debug)]
pub struct ProgressLedger {
    path: PathBuf,
    entries: Vec<LedgerEntry>,
    completed: BTreeSet<NaiveDate>,
}

impl ProgressLedger {
    /// Loads an existing ledger. A missing file is an empty ledger.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let entries: Vec<LedgerEntry> = read_lines(&path)?
            .iter()
            .filter_map(|line| LedgerEntry::parse_line(line))
            .collect();
        let completed = completed_dates(&entries);
        Ok(Self {
            path,
            entries,
            completed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.completed.contains(&date)
    }

    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.entries.iter().any(|entry| entry.date == date)
    }

    pub fn record_outcome(
        &mut self,
        date: NaiveDate,
        outcome: LedgerOutcome,
    ) -> Result<(), LedgerError> {
        let entry = LedgerEntry::new(date, outcome);
        if !entry.outcome.is_failure() {
            self.completed.insert(date);
        }
        let line = entry.to_line();
        self.entries.push(entry);

        ensure_parent_dir(&self.path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        writeln!(file, "{line}").map_err(|source| self.io_error(source))?;
        file.flush().map_err(|source| self.io_error(source))
    }

    /// Dates whose ledger lines carry a failure marker, read fresh from disk.
    pub fn failed_dates(&self) -> Result<Vec<NaiveDate>, LedgerError> {
        let lines = read_lines(&self.path)?;
        Ok(reconcile_failed_dates(lines.iter().map(String::as_str)))
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, LedgerError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_owned).collect()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(LedgerError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
