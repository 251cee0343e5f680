//! Score scraper core: pure domain model, dedup rules, ledger codec and the
//! per-day state machine. Nothing in this crate performs IO.
mod calendar;
mod day;
mod dedup;
mod game;
mod ledger;

pub use calendar::{format_date, parse_date, CalendarDay, DayRange, DayStatus, Season};
pub use day::{DayEvent, DayPhase, DayTracker, TransitionError};
pub use dedup::{dedupe_day, drop_existing};
pub use game::{DedupKey, GameRecord, RawCandidate, RecordRejection};
pub use ledger::{
    completed_dates, reconcile_failed_dates, LedgerEntry, LedgerOutcome, FAILURE_MARKERS,
};
