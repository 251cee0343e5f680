use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use scores_core::{
    dedupe_day, drop_existing, format_date, DayEvent, DayPhase, DayRange, DayStatus, DayTracker,
    DedupKey, LedgerOutcome,
};
use scores_logging::{
    clear_current_day, scrape_debug, scrape_error, scrape_info, scrape_warn, set_current_day,
};
use serde::Serialize;
use thiserror::Error;

use crate::client::RequestClient;
use crate::config::{EngineConfig, ResumeSource};
use crate::extract::ExtractionPipeline;
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::ledger::{LedgerError, ProgressLedger};
use crate::pacing::{Pause, PauseKind, TokioPause};
use crate::store::OutputStore;
use crate::FetchError;

/// Consecutive ledger write failures after which the warning becomes an error.
const LEDGER_FAILURE_ESCALATION: u32 = 3;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not load progress ledger: {0}")]
    Ledger(#[from] LedgerError),
    #[error("could not build HTTP client: {0}")]
    Client(#[from] FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub days: Vec<DayReport>,
    pub skipped_off_season: usize,
    pub skipped_completed: usize,
    pub games_written: usize,
    /// Distinct blocks rejected on each day's final fetch. An empty-day retry
    /// replaces the first fetch's count rather than adding to it.
    pub rejected_candidates: usize,
    pub ledger_write_failures: usize,
}

impl RunSummary {
    pub fn status_of(&self, date: NaiveDate) -> Option<DayStatus> {
        self.days
            .iter()
            .rev()
            .find(|report| report.date == date)
            .map(|report| report.status)
    }

    pub fn days_failed(&self) -> usize {
        self.count(|status| status == DayStatus::Failed)
    }

    pub fn days_empty(&self) -> usize {
        self.count(|status| status == DayStatus::CompletedEmpty)
    }

    pub fn days_with_games(&self) -> usize {
        self.count(|status| matches!(status, DayStatus::CompletedWithGames(_)))
    }

    fn count(&self, pred: impl Fn(DayStatus) -> bool) -> usize {
        self.days.iter().filter(|report| pred(report.status)).count()
    }
}

/// Drives the day-by-day loop. One instance owns one store/ledger pair and
/// processes strictly one day, and one request, at a time.
pub struct Orchestrator {
    config: EngineConfig,
    client: RequestClient,
    pipeline: ExtractionPipeline,
    store: OutputStore,
    ledger: ProgressLedger,
    pause: Arc<dyn Pause>,
    consecutive_ledger_failures: u32,
}

impl Orchestrator {
    pub fn new(
        config: EngineConfig,
        fetcher: Arc<dyn Fetcher>,
        pause: Arc<dyn Pause>,
    ) -> Result<Self, EngineError> {
        let ledger = ProgressLedger::open(config.ledger_path.clone())?;
        let store = OutputStore::new(config.output_path.clone());
        let client = RequestClient::new(
            fetcher,
            pause.clone(),
            config.retry.clone(),
            config.pacing.after_success,
        );
        Ok(Self {
            config,
            client,
            pipeline: ExtractionPipeline::default(),
            store,
            ledger,
            pause,
            consecutive_ledger_failures: 0,
        })
    }

    /// Real network and real sleeps.
    pub fn with_defaults(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone())?);
        Self::new(config, fetcher, Arc::new(TokioPause))
    }

    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    /// Processes every in-season day of `[start, end]` not already completed.
    pub async fn run_range(&mut self, start: NaiveDate, end: NaiveDate) -> RunSummary {
        let mut summary = RunSummary::default();
        let stored_dates = self.stored_dates_for_resume();
        scrape_info!(
            "Starting range {} -> {} ({} days)",
            format_date(start),
            format_date(end),
            DayRange::new(start, end).count()
        );

        for date in DayRange::new(start, end) {
            if !self.config.season.contains(date) {
                summary.skipped_off_season += 1;
                continue;
            }
            if self.is_done(date, &stored_dates) {
                scrape_debug!("{} already completed; skipping", format_date(date));
                summary.skipped_completed += 1;
                continue;
            }

            set_current_day(format_date(date));
            let status = self.process_day(date, None, &mut summary).await;
            summary.days.push(DayReport { date, status });

            if date < end {
                let wait = self.config.pacing.between_days.sample();
                scrape_info!("Sleeping {:.1}s before next day", wait.as_secs_f64());
                self.pause.pause(PauseKind::BetweenDays, wait).await;
            }
            clear_current_day();
        }

        self.log_summary("Range", &summary);
        summary
    }

    /// Re-scrapes every date the ledger reconciliation flags as failed or empty.
    pub async fn rescrape_failed(&mut self) -> RunSummary {
        match self.ledger.failed_dates() {
            Ok(dates) if dates.is_empty() => {
                scrape_info!("No failed days found");
                RunSummary::default()
            }
            Ok(dates) => {
                scrape_info!("Re-scraping {} missed days", dates.len());
                self.rescrape_dates(&dates).await
            }
            Err(err) => {
                scrape_error!("Could not read ledger for reconciliation: {}", err);
                RunSummary::default()
            }
        }
    }

    /// Fetch, extract, dedupe and persist only the given dates, dropping games
    /// already present in the output store.
    pub async fn rescrape_dates(&mut self, dates: &[NaiveDate]) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut existing = match self.store.existing_keys() {
            Ok(keys) => keys,
            Err(err) => {
                scrape_warn!(
                    "Could not read {:?} for cross-dataset dedup: {}",
                    self.store.path(),
                    err
                );
                HashSet::new()
            }
        };

        for &date in dates {
            set_current_day(format_date(date));
            let status = self.process_day(date, Some(&mut existing), &mut summary).await;
            summary.days.push(DayReport { date, status });
            clear_current_day();
        }

        self.log_summary("Re-scrape", &summary);
        summary
    }

    async fn process_day(
        &mut self,
        date: NaiveDate,
        existing: Option<&mut HashSet<DedupKey>>,
        summary: &mut RunSummary,
    ) -> DayStatus {
        let mut tracker = DayTracker::new();
        let mut records = Vec::new();
        let mut rejected = 0;
        let mut failure: Option<String> = None;

        match self.config.scoreboard_url(date) {
            Ok(url) => loop {
                advance(&mut tracker, DayEvent::FetchStarted);
                scrape_info!("Fetching {}", url);
                let page = match self.client.get(&url).await {
                    Ok(page) => page,
                    Err(err) => {
                        scrape_warn!("Failed to load scoreboard: {}", err);
                        advance(&mut tracker, DayEvent::FetchFailed);
                        failure = Some(format!("Failed to load scoreboard ({err})"));
                        break;
                    }
                };
                advance(&mut tracker, DayEvent::FetchSucceeded);

                let result = self.pipeline.extract(&page.html, date);
                rejected = result.rejected;
                records = dedupe_day(result.records);
                scrape_info!(
                    "Kept {} games, rejected {} candidates ({})",
                    records.len(),
                    result.rejected,
                    result.strategy.map_or("no format matched", |s| s.name())
                );
                advance(&mut tracker, DayEvent::Extracted { games: records.len() });

                if tracker.can_retry_empty() {
                    scrape_info!("No games found; retrying once");
                    continue;
                }
                break;
            },
            Err(err) => {
                advance(&mut tracker, DayEvent::FetchStarted);
                advance(&mut tracker, DayEvent::FetchFailed);
                failure = Some(format!("Failed to load scoreboard ({err})"));
            }
        }

        summary.rejected_candidates += rejected;

        if let DayPhase::Populated { games } = tracker.phase() {
            let to_write = match existing.as_deref() {
                Some(keys) => drop_existing(records.clone(), keys),
                None => records.clone(),
            };
            match self.store.append(&to_write) {
                Ok(written) => {
                    summary.games_written += written;
                    if let Some(keys) = existing {
                        keys.extend(to_write.iter().map(|record| record.key()));
                    }
                    scrape_info!("{} games scraped, {} new rows written", games, written);
                }
                Err(err) => {
                    scrape_warn!("Could not append to {:?}: {}", self.store.path(), err);
                    advance(&mut tracker, DayEvent::PersistFailed);
                    failure = Some(format!("Failed to persist rows ({err})"));
                }
            }
        }

        let outcome = match (tracker.phase(), failure) {
            (_, Some(reason)) => LedgerOutcome::Failed { reason },
            (DayPhase::Populated { games }, None) => LedgerOutcome::Scraped { games },
            _ => LedgerOutcome::Scraped { games: 0 },
        };
        advance(&mut tracker, DayEvent::Logged);
        self.record_outcome(date, outcome, summary);
        tracker.status()
    }

    fn record_outcome(&mut self, date: NaiveDate, outcome: LedgerOutcome, summary: &mut RunSummary) {
        match self.ledger.record_outcome(date, outcome) {
            Ok(()) => self.consecutive_ledger_failures = 0,
            Err(err) => {
                self.consecutive_ledger_failures += 1;
                summary.ledger_write_failures += 1;
                if self.consecutive_ledger_failures >= LEDGER_FAILURE_ESCALATION {
                    scrape_error!(
                        "Ledger write failed {} times in a row; resume accuracy is degraded: {}",
                        self.consecutive_ledger_failures,
                        err
                    );
                } else {
                    scrape_warn!("Could not write ledger entry (file locked?): {}", err);
                }
            }
        }
    }

    fn stored_dates_for_resume(&self) -> BTreeSet<NaiveDate> {
        if self.config.resume == ResumeSource::Ledger {
            return BTreeSet::new();
        }
        self.store.existing_dates().unwrap_or_else(|err| {
            scrape_warn!("Could not read stored dates from {:?}: {}", self.store.path(), err);
            BTreeSet::new()
        })
    }

    fn is_done(&self, date: NaiveDate, stored_dates: &BTreeSet<NaiveDate>) -> bool {
        match self.config.resume {
            ResumeSource::Ledger => self.ledger.is_completed(date),
            ResumeSource::OutputRows => stored_dates.contains(&date),
            ResumeSource::LedgerThenOutputRows if self.ledger.has_entry(date) => {
                self.ledger.is_completed(date)
            }
            ResumeSource::LedgerThenOutputRows => stored_dates.contains(&date),
        }
    }

    fn log_summary(&self, label: &str, summary: &RunSummary) {
        scrape_info!(
            "{} done: {} days with games, {} empty, {} failed, {} rows written, {} skipped as completed",
            label,
            summary.days_with_games(),
            summary.days_empty(),
            summary.days_failed(),
            summary.games_written,
            summary.skipped_completed
        );
        if summary.ledger_write_failures > 0 {
            scrape_error!(
                "{} ledger writes failed; the next run may re-fetch those days",
                summary.ledger_write_failures
            );
        }
    }
}

fn advance(tracker: &mut DayTracker, event: DayEvent) {
    match tracker.apply(event) {
        Ok(phase) => scrape_debug!("{:?} -> {:?}", event, phase),
        Err(err) => scrape_error!("{}", err),
    }
}
