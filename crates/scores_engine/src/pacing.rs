use std::time::Duration;

use rand::Rng;

/// Why the flow of control is being suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseKind {
    /// Exponential wait after a retryable HTTP status (429 by default).
    Backoff,
    /// Fixed wait after a transport error or timeout.
    RetryDelay,
    /// Mandatory pause after every successful fetch.
    RequestPacing,
    /// Randomized pause between two calendar days of a range run.
    BetweenDays,
}

/// Suspends the scraper. The only suspension points in the pipeline go through here.
#[async_trait::async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, kind: PauseKind, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPause;

#[async_trait::async_trait]
impl Pause for TokioPause {
    async fn pause(&self, _kind: PauseKind, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Inclusive random duration range. `min == max` gives a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterRange {
    pub min: Duration,
    pub max: Duration,
}

impl JitterRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn fixed(duration: Duration) -> Self {
        Self::new(duration, duration)
    }

    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// Retry budget and backoff shape used by every fetch call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter: JitterRange,
    /// Statuses retried with exponential backoff. All other non-2xx statuses are terminal.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(8),
            jitter: JitterRange::new(Duration::from_secs(1), Duration::from_secs(3)),
            retryable_statuses: vec![429],
        }
    }
}

impl RetryPolicy {
    /// `base_delay * 2^attempt + jitter`, with `attempt` counted from zero.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor) + self.jitter.sample()
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }
}

/// Steady-state pacing, independent of any retry history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingPolicy {
    pub after_success: Duration,
    pub between_days: JitterRange,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            after_success: Duration::from_millis(3_100),
            between_days: JitterRange::new(Duration::from_secs(60), Duration::from_secs(90)),
        }
    }
}
