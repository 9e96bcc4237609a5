pub(super) use super::candidates::{cascade_strategies, CandidateSets};
pub(super) use super::execution_context::RunContext;
pub(super) use super::upstream::cascade::{run_cascade_with, CascadeOutcome};
pub(super) use super::upstream::outcome::AttemptOutcome;
pub(super) use super::upstream::retry::RetryTuning;
pub(super) use super::upstream::router::run_candidate_list;
pub(super) use punctum_core::candidate::{ModelCandidate, RoutingMode, Strategy, TaskKind};
pub(super) use std::collections::VecDeque;
pub(super) use std::time::Duration;

mod cascade_rules;
mod retry_rules;
mod routing_paths;

pub(super) fn quick_tuning() -> RetryTuning {
    RetryTuning {
        retry_cap: 2,
        backoff_base: Duration::from_millis(1),
        backoff_max: Duration::from_millis(2),
    }
}

pub(super) fn test_ctx() -> RunContext {
    RunContext::new(TaskKind::Keywords, RoutingMode::Free, 1)
}

pub(super) fn free_candidates(ids: &[&str]) -> Vec<ModelCandidate> {
    ids.iter()
        .map(|id| ModelCandidate::new(*id, Strategy::Free))
        .collect()
}

pub(super) fn sets(free: &[&str], auto: &[&str], paid: &[&str]) -> CandidateSets {
    CandidateSets {
        text_free: free_candidates(free),
        vision_free: free_candidates(free),
        auto: auto
            .iter()
            .map(|id| ModelCandidate::new(*id, Strategy::Auto))
            .collect(),
        paid: paid
            .iter()
            .map(|id| ModelCandidate::new(*id, Strategy::Paid))
            .collect(),
    }
}

pub(super) fn success(model: &str) -> AttemptOutcome {
    AttemptOutcome::Success {
        content: "Fractured, Solitude, Decay".to_string(),
        model: model.to_string(),
    }
}

pub(super) fn rate_limited() -> AttemptOutcome {
    AttemptOutcome::retryable("Status 429 (rate limited)")
}

pub(super) fn bad_key() -> AttemptOutcome {
    AttemptOutcome::fatal("Status 401 (missing credential)")
}

/// Scripted provider: hands out pre-baked outcomes in order and records
/// which candidate and retry number each attempt went to.
pub(super) struct ScriptedAttempts {
    queue: VecDeque<AttemptOutcome>,
    pub(super) seen: Vec<(String, u32)>,
}

impl ScriptedAttempts {
    pub(super) fn new(outcomes: Vec<AttemptOutcome>) -> Self {
        Self {
            queue: outcomes.into(),
            seen: Vec::new(),
        }
    }

    pub(super) fn attempt(&mut self, candidate: &ModelCandidate, retry: u32) -> AttemptOutcome {
        self.seen.push((candidate.id.clone(), retry));
        self.queue.pop_front().expect("script ran out of outcomes")
    }
}
