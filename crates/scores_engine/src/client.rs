use std::sync::Arc;
use std::time::Duration;

use scores_logging::{scrape_error, scrape_warn};

use crate::decode::{decode_page, DecodedPage};
use crate::fetch::Fetcher;
use crate::pacing::{Pause, PauseKind, RetryPolicy};
use crate::{FailureKind, FetchError};

/// Fetches pages with retry/backoff and the mandatory post-success pause.
///
/// - Retryable statuses wait `base_delay * 2^attempt + jitter`.
/// - Transport errors and timeouts wait a fixed `base_delay`.
/// - Any other failure is returned immediately.
pub struct RequestClient {
    fetcher: Arc<dyn Fetcher>,
    pause: Arc<dyn Pause>,
    policy: RetryPolicy,
    after_success: Duration,
}

impl RequestClient {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        pause: Arc<dyn Pause>,
        policy: RetryPolicy,
        after_success: Duration,
    ) -> Self {
        Self {
            fetcher,
            pause,
            policy,
            after_success,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn get(&self, url: &str) -> Result<DecodedPage, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<FetchError> = None;

        for attempt in 0..max_attempts {
            let err = match self.fetcher.fetch(url).await {
                Ok(output) => {
                    self.pause
                        .pause(PauseKind::RequestPacing, self.after_success)
                        .await;
                    return decode_page(&output);
                }
                Err(err) => err,
            };

            let wait = match &err.kind {
                FailureKind::HttpStatus(code) if self.policy.is_retryable_status(*code) => {
                    (PauseKind::Backoff, self.policy.backoff_for(attempt))
                }
                kind if kind.is_transient() => (PauseKind::RetryDelay, self.policy.base_delay),
                _ => {
                    scrape_warn!("Request to {} failed terminally: {}", url, err);
                    return Err(err);
                }
            };

            let has_budget = attempt + 1 < max_attempts;
            if has_budget {
                scrape_warn!(
                    "Attempt {}/{} for {} failed ({}); waiting {:.1}s",
                    attempt + 1,
                    max_attempts,
                    url,
                    err,
                    wait.1.as_secs_f64()
                );
                self.pause.pause(wait.0, wait.1).await;
            } else {
                scrape_warn!(
                    "Attempt {}/{} for {} failed ({})",
                    attempt + 1,
                    max_attempts,
                    url,
                    err
                );
            }
            last_error = Some(err);
        }

        let cause = last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "no attempts made".to_string());
        scrape_error!("Gave up after {} attempts on {}", max_attempts, url);
        Err(FetchError::new(
            FailureKind::RetriesExhausted {
                attempts: max_attempts,
            },
            cause,
        ))
    }
}
