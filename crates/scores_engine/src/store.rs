use std::collections::{BTreeSet, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use scores_core::{format_date, parse_date, DedupKey, GameRecord};
use scores_logging::scrape_debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{ensure_parent_dir, PersistError};

pub const HEADER: [&str; 8] = [
    "date", "home_team", "away_team", "home", "away", "total", "margin", "ot",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Serialize)]
struct RowOut<'a> {
    date: String,
    home_team: &'a str,
    away_team: &'a str,
    home: u32,
    away: u32,
    total: u64,
    margin: i64,
    ot: u8,
}

impl<'a> From<&'a GameRecord> for RowOut<'a> {
    fn from(record: &'a GameRecord) -> Self {
        Self {
            date: format_date(record.date()),
            home_team: record.home_team(),
            away_team: record.away_team(),
            home: record.home(),
            away: record.away(),
            total: record.total(),
            margin: record.margin(),
            ot: u8::from(record.overtime()),
        }
    }
}

/// Stored `total`/`margin` are ignored on read; records recompute them.
#[derive(Debug, Deserialize)]
struct RowIn {
    date: String,
    home_team: String,
    away_team: String,
    home: u32,
    away: u32,
    #[serde(default)]
    ot: String,
}

impl RowIn {
    fn into_record(self) -> Option<GameRecord> {
        let date = parse_date(&self.date)?;
        let ot = matches!(self.ot.trim(), "1" | "true" | "True" | "TRUE");
        GameRecord::new(date, &self.home_team, &self.away_team, self.home, self.away, ot).ok()
    }
}

/// Append-only CSV of game records.
///
/// Each append is serialized in memory and written with a single `write_all`
/// followed by `sync_data`, so external readers only ever see whole rows.
#[derive(Debug, Clone)]
pub struct OutputStore {
    path: PathBuf,
}

impl OutputStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends records, writing the header first if the file is new or empty.
    pub fn append(&self, records: &[GameRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        ensure_parent_dir(&self.path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut buffer = Vec::new();
        let len = file.metadata()?.len();
        if len == 0 {
            buffer.extend_from_slice(HEADER.join(",").as_bytes());
            buffer.push(b'\n');
        } else if !ends_with_newline(&mut file)? {
            // A previous writer died mid-row; start on a fresh line.
            buffer.push(b'\n');
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(buffer);
        for record in records {
            writer.serialize(RowOut::from(record))?;
        }
        let buffer = writer.into_inner().map_err(|err| err.into_error())?;

        file.write_all(&buffer)?;
        file.sync_data()?;
        Ok(records.len())
    }

    /// Every readable record. Malformed rows are skipped.
    pub fn read_all(&self) -> Result<Vec<GameRecord>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<RowIn>().enumerate() {
            match row.ok().and_then(RowIn::into_record) {
                Some(record) => records.push(record),
                None => scrape_debug!("Skipping unreadable row {} in {:?}", idx + 2, self.path),
            }
        }
        Ok(records)
    }

    /// Dates that already have at least one stored row.
    pub fn existing_dates(&self) -> Result<BTreeSet<NaiveDate>, StoreError> {
        Ok(self.read_all()?.iter().map(GameRecord::date).collect())
    }

    pub fn existing_keys(&self) -> Result<HashSet<DedupKey>, StoreError> {
        Ok(self.read_all()?.iter().map(GameRecord::key).collect())
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
