//! Waits for an asynchronous Haven OnDemand job to reach a terminal status.
//!
//! The first status check is immediate. Later checks back off exponentially
//! from `initial_delay` up to `max_delay`, and the whole wait is bounded by
//! `max_wait`. Dropping the returned future stops polling.

use std::time::Duration;

use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::models::job::{JobId, JobStatusResponse};
use crate::services::hod::{HodError, JobApi};

/// Shortest wait allowed between two status checks of the same job.
pub const MIN_POLL_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_wait: Duration,
    /// Consecutive transient failures retried before giving up.
    pub max_retries: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            max_wait: Duration::from_secs(120),
            max_retries: 3,
        }
    }
}

impl PollPolicy {
    /// Raise `initial_delay` to [`MIN_POLL_DELAY`] and keep `max_delay` at or
    /// above it, so the loop always sleeps between checks.
    pub fn normalized(mut self) -> Self {
        self.initial_delay = self.initial_delay.max(MIN_POLL_DELAY);
        self.max_delay = self.max_delay.max(self.initial_delay);
        self
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

/// Poll `job_id` until its status is `finished` or `failed` and return that
/// final response. A `failed` job is not an error here.
pub async fn wait_for_job(
    api: &dyn JobApi,
    job_id: &JobId,
    policy: &PollPolicy,
) -> Result<JobStatusResponse, PollError> {
    let policy = policy.clone().normalized();
    let started = Instant::now();
    let deadline = started + policy.max_wait;
    let mut delay = policy.initial_delay;
    let mut attempts: u32 = 0;
    let mut failures: u32 = 0;

    let timed_out = |attempts: u32| PollError::Timeout {
        job_id: job_id.clone(),
        waited: started.elapsed(),
        attempts,
    };

    loop {
        attempts += 1;
        metrics::counter!("poll_attempts_total").increment(1);

        let outcome = match timeout_at(deadline, api.job_status(job_id)).await {
            Ok(outcome) => outcome,
            Err(_) => return Err(timed_out(attempts)),
        };

        match outcome {
            Ok(response) if response.status.is_terminal() => {
                info!(
                    job_id = %job_id,
                    status = %response.status,
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Job reached terminal status"
                );
                return Ok(response);
            }
            Ok(response) => {
                failures = 0;
                debug!(job_id = %job_id, status = %response.status, attempts, "Job still running");
            }
            Err(e) if e.is_transient() && failures < policy.max_retries => {
                failures += 1;
                warn!(job_id = %job_id, error = %e, failures, "Status check failed, retrying");
            }
            Err(e) if e.is_transient() => {
                return Err(PollError::Network {
                    job_id: job_id.clone(),
                    attempts: failures + 1,
                    source: e,
                });
            }
            Err(e) => {
                return Err(PollError::Rejected {
                    job_id: job_id.clone(),
                    source: e,
                });
            }
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(job_id = %job_id, attempts, "Gave up waiting for job");
            return Err(timed_out(attempts));
        }

        sleep(delay.min(deadline - now)).await;
        delay = policy.next_delay(delay);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Job {job_id} did not finish within {waited:?} ({attempts} status checks)")]
    Timeout {
        job_id: JobId,
        waited: Duration,
        attempts: u32,
    },

    #[error("Status check for job {job_id} failed {attempts} times in a row: {source}")]
    Network {
        job_id: JobId,
        attempts: u32,
        #[source]
        source: HodError,
    },

    #[error("Status check for job {job_id} was rejected: {source}")]
    Rejected {
        job_id: JobId,
        #[source]
        source: HodError,
    },
}
