use thiserror::Error;

use crate::DayStatus;

/// Where a calendar day is in its pipeline.
///
/// `Pending -> Fetching -> Extracting -> (Empty | Populated) -> Logged`, or
/// `Pending -> Fetching -> FetchFailed -> Logged(Failed)`. An `Empty` day may
/// go back to `Fetching` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Pending,
    Fetching,
    Extracting,
    Empty,
    Populated { games: usize },
    FetchFailed,
    Logged(DayStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEvent {
    FetchStarted,
    FetchSucceeded,
    FetchFailed,
    Extracted { games: usize },
    /// Rows could not be appended to the output store.
    PersistFailed,
    Logged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid day transition: {event:?} while {phase:?}")]
pub struct TransitionError {
    pub phase: DayPhase,
    pub event: DayEvent,
}

/// Pure per-day state machine driven by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTracker {
    phase: DayPhase,
    fetches: u8,
    persist_failed: bool,
}

impl Default for DayTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DayTracker {
    /// Fetch attempts allowed per day: the first one plus the single empty-day retry.
    pub const MAX_FETCHES: u8 = 2;

    pub fn new() -> Self {
        Self {
            phase: DayPhase::Pending,
            fetches: 0,
            persist_failed: false,
        }
    }

    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    /// True once an empty extraction may still be retried.
    pub fn can_retry_empty(&self) -> bool {
        self.phase == DayPhase::Empty && self.fetches < Self::MAX_FETCHES
    }

    pub fn apply(&mut self, event: DayEvent) -> Result<DayPhase, TransitionError> {
        let next = match (self.phase, event) {
            (DayPhase::Pending, DayEvent::FetchStarted) => DayPhase::Fetching,
            (DayPhase::Empty, DayEvent::FetchStarted) if self.fetches < Self::MAX_FETCHES => {
                DayPhase::Fetching
            }
            (DayPhase::Fetching, DayEvent::FetchSucceeded) => DayPhase::Extracting,
            (DayPhase::Fetching, DayEvent::FetchFailed) => DayPhase::FetchFailed,
            (DayPhase::Extracting, DayEvent::Extracted { games: 0 }) => DayPhase::Empty,
            (DayPhase::Extracting, DayEvent::Extracted { games }) => DayPhase::Populated { games },
            (DayPhase::Populated { .. }, DayEvent::PersistFailed) => {
                self.persist_failed = true;
                self.phase
            }
            (DayPhase::Empty, DayEvent::Logged) => DayPhase::Logged(DayStatus::CompletedEmpty),
            (DayPhase::Populated { .. }, DayEvent::Logged) if self.persist_failed => {
                DayPhase::Logged(DayStatus::Failed)
            }
            (DayPhase::Populated { games }, DayEvent::Logged) => {
                DayPhase::Logged(DayStatus::CompletedWithGames(games))
            }
            (DayPhase::FetchFailed, DayEvent::Logged) => DayPhase::Logged(DayStatus::Failed),
            (phase, event) => return Err(TransitionError { phase, event }),
        };
        if event == DayEvent::FetchStarted {
            self.fetches += 1;
        }
        self.phase = next;
        Ok(next)
    }

    /// Final status once logged, `Unprocessed` before that.
    pub fn status(&self) -> DayStatus {
        match self.phase {
            DayPhase::Logged(status) => status,
            _ => DayStatus::Unprocessed,
        }
    }
}
