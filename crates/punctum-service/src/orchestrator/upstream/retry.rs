use std::time::Duration;

use rand::Rng;

use super::outcome::AttemptOutcome;

const JITTER_MAX_MS: u64 = 300;

/// Retry knobs for one run. `retry_cap` counts retries, so a candidate sees
/// at most `1 + retry_cap` attempts.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RetryTuning {
    pub(crate) retry_cap: u32,
    pub(crate) backoff_base: Duration,
    pub(crate) backoff_max: Duration,
}

impl Default for RetryTuning {
    fn default() -> Self {
        Self {
            retry_cap: 2,
            backoff_base: Duration::from_millis(1_000),
            backoff_max: Duration::from_millis(2_000),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RetryDecision {
    Done,
    RetrySame,
    NextCandidate,
}

/// The decision table driving the per-candidate loop. Pure so it can be
/// exercised without any network machinery.
pub(crate) fn decide(attempt: u32, outcome: &AttemptOutcome, tuning: &RetryTuning) -> RetryDecision {
    match outcome {
        AttemptOutcome::Success { .. } => RetryDecision::Done,
        AttemptOutcome::Retryable { .. } => {
            if attempt < tuning.retry_cap {
                RetryDecision::RetrySame
            } else {
                RetryDecision::NextCandidate
            }
        }
        AttemptOutcome::Fatal { .. } => RetryDecision::NextCandidate,
    }
}

/// Linear backoff capped by `backoff_max`, plus random jitter so that
/// concurrent runs do not re-hit a rate-limited provider in lockstep.
pub(crate) fn backoff_delay(attempt: u32, tuning: &RetryTuning) -> Duration {
    let scaled = tuning
        .backoff_base
        .saturating_mul(attempt.saturating_add(1))
        .min(tuning.backoff_max);
    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MS);
    scaled + Duration::from_millis(jitter)
}
