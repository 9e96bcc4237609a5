use std::time::Duration;

use punctum_core::candidate::ModelCandidate;

use super::super::execution_context::RunContext;
use super::candidate_flow::{drive_candidate, CandidateFlowResult};
use super::outcome::AttemptOutcome;
use super::retry::RetryTuning;

/// Every candidate in the list burned through its retry budget without a
/// single accepted response. Distinct from "succeeded on a degraded model",
/// which the cascade must not treat as a failure.
#[derive(Debug)]
pub(crate) struct ListExhausted {
    pub(crate) total: usize,
}

#[derive(Debug)]
pub(crate) struct RoutedContent {
    pub(crate) content: String,
    pub(crate) model: String,
}

/// Walk the candidate list in declaration order; first success wins and
/// later candidates are never contacted. The list itself is never mutated,
/// only the cursor advances.
pub(crate) fn run_candidate_list<A, P>(
    candidates: &[ModelCandidate],
    ctx: &mut RunContext,
    tuning: &RetryTuning,
    attempt_fn: &mut A,
    pause: &mut P,
) -> Result<RoutedContent, ListExhausted>
where
    A: FnMut(&ModelCandidate, u32) -> AttemptOutcome,
    P: FnMut(Duration),
{
    let total = candidates.len();
    for (idx, candidate) in candidates.iter().enumerate() {
        match drive_candidate(candidate, idx, total, ctx, tuning, attempt_fn, pause) {
            CandidateFlowResult::Completed { content, model } => {
                return Ok(RoutedContent { content, model });
            }
            CandidateFlowResult::Exhausted => continue,
        }
    }
    ctx.list_exhausted(total);
    Err(ListExhausted { total })
}
