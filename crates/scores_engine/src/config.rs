use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use scores_core::Season;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::FetchSettings;
use crate::pacing::{PacingPolicy, RetryPolicy};
use crate::{FailureKind, FetchError};

pub const DEFAULT_BASE_URL: &str = "https://www.sports-reference.com";
pub const OUTPUT_FILENAME: &str = "scores_clean.csv";
pub const LEDGER_FILENAME: &str = "scrape_log.txt";

/// Which persisted artifact decides that a day is already done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResumeSource {
    /// Only the progress ledger.
    #[default]
    Ledger,
    /// Any date with at least one stored row.
    OutputRows,
    /// The ledger decides every date it has an entry for; stored rows decide the rest.
    LedgerThenOutputRows,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    pub fetch: FetchSettings,
    pub retry: RetryPolicy,
    pub pacing: PacingPolicy,
    pub season: Season,
    pub output_path: PathBuf,
    pub ledger_path: PathBuf,
    pub resume: ResumeSource,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch: FetchSettings::default(),
            retry: RetryPolicy::default(),
            pacing: PacingPolicy::default(),
            season: Season::default(),
            output_path: output_dir.join(OUTPUT_FILENAME),
            ledger_path: output_dir.join(LEDGER_FILENAME),
            resume: ResumeSource::default(),
        }
    }

    /// `<base>/cbb/boxscores/?month=M&day=D&year=Y`
    pub fn scoreboard_url(&self, date: NaiveDate) -> Result<String, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .and_then(|base| base.join("/cbb/boxscores/"))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("month", &date.month().to_string())
            .append_pair("day", &date.day().to_string())
            .append_pair("year", &date.year().to_string());
        Ok(url.into())
    }
}
