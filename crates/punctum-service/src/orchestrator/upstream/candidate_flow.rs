use std::time::Duration;

use punctum_core::candidate::ModelCandidate;

use super::super::execution_context::RunContext;
use super::outcome::AttemptOutcome;
use super::retry::{self, RetryDecision, RetryTuning};

pub(super) enum CandidateFlowResult {
    Completed { content: String, model: String },
    Exhausted,
}

/// Drive one candidate until success or its retry budget runs out. The
/// attempt function performs the actual provider call; the pause closure
/// sleeps between retries (tests pass a no-op).
pub(super) fn drive_candidate<A, P>(
    candidate: &ModelCandidate,
    idx: usize,
    total: usize,
    ctx: &mut RunContext,
    tuning: &RetryTuning,
    attempt_fn: &mut A,
    pause: &mut P,
) -> CandidateFlowResult
where
    A: FnMut(&ModelCandidate, u32) -> AttemptOutcome,
    P: FnMut(Duration),
{
    let mut attempt = 0u32;
    loop {
        ctx.candidate_start(idx, total, &candidate.id, attempt);
        let outcome = attempt_fn(candidate, attempt);
        match retry::decide(attempt, &outcome, tuning) {
            RetryDecision::Done => {
                let AttemptOutcome::Success { content, model } = outcome else {
                    // decide 只会在 Success 时给出 Done
                    return CandidateFlowResult::Exhausted;
                };
                ctx.success(&model);
                return CandidateFlowResult::Completed { content, model };
            }
            RetryDecision::RetrySame => {
                ctx.attempt_failure(&candidate.id, &outcome);
                let delay = retry::backoff_delay(attempt, tuning);
                ctx.retry_wait(&candidate.id, delay);
                pause(delay);
                attempt += 1;
            }
            RetryDecision::NextCandidate => {
                ctx.attempt_failure(&candidate.id, &outcome);
                ctx.switching_model();
                return CandidateFlowResult::Exhausted;
            }
        }
    }
}
