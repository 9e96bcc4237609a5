use std::thread;
use std::time::Duration;

use punctum_core::candidate::{ModelCandidate, RoutingMode, Strategy, TaskKind};
use serde_json::Value;

use super::super::candidates::{cascade_strategies, CandidateSets};
use super::super::execution_context::RunContext;
use super::super::runtime_config::{orchestrator_config, upstream_client};
use super::outcome::AttemptOutcome;
use super::retry::RetryTuning;
use super::router::{run_candidate_list, RoutedContent};
use super::{transport, vendor_fallback};

pub(crate) enum CascadeOutcome {
    Routed { content: String, model: String },
    VendorKeywords { keywords: Vec<String>, model: String },
    Exhausted,
}

/// Walk the strategies for the requested mode, then the vendor classifier
/// for keyword tasks. Never errors: exhaustion is an ordinary outcome the
/// caller converts into a sentinel payload.
pub(crate) fn run_cascade_with<A, P, V>(
    mode: RoutingMode,
    kind: TaskKind,
    sets: &CandidateSets,
    ctx: &mut RunContext,
    tuning: &RetryTuning,
    attempt_fn: &mut A,
    pause: &mut P,
    vendor_fn: &mut V,
) -> CascadeOutcome
where
    A: FnMut(&ModelCandidate, u32) -> AttemptOutcome,
    P: FnMut(Duration),
    V: FnMut(&mut RunContext) -> Option<(Vec<String>, String)>,
{
    let mut previous: Option<Strategy> = None;
    for strategy in cascade_strategies(mode) {
        let list = sets.list_for(*strategy, kind);
        if list.is_empty() {
            continue;
        }
        if let Some(prev) = previous {
            ctx.strategy_switch(prev, *strategy);
        }
        previous = Some(*strategy);
        match run_candidate_list(list, ctx, tuning, attempt_fn, pause) {
            Ok(RoutedContent { content, model }) => {
                return CascadeOutcome::Routed { content, model };
            }
            Err(exhausted) => {
                log::debug!(
                    "strategy {} exhausted after {} candidates",
                    strategy.as_str(),
                    exhausted.total
                );
                continue;
            }
        }
    }

    if kind == TaskKind::Keywords {
        if let Some((keywords, model)) = vendor_fn(ctx) {
            return CascadeOutcome::VendorKeywords { keywords, model };
        }
    }
    CascadeOutcome::Exhausted
}

/// Production entry: real transport, real sleeps, shared client/config.
pub(crate) fn run_inference(
    mode: RoutingMode,
    kind: TaskKind,
    messages: &Value,
    comments: Option<&[String]>,
    ctx: &mut RunContext,
) -> CascadeOutcome {
    let config = orchestrator_config();
    let client = upstream_client();
    run_cascade_with(
        mode,
        kind,
        &config.candidates,
        ctx,
        &config.retry,
        &mut |candidate, _attempt| transport::execute_attempt(client, config, candidate, messages),
        &mut |delay| thread::sleep(delay),
        &mut |ctx| {
            let comments = comments?;
            if comments.is_empty() {
                return None;
            }
            ctx.vendor_attempt(&config.vendor.endpoint);
            match vendor_fallback::classify_comments(client, &config.vendor, comments) {
                Ok(keywords) => {
                    ctx.vendor_success(&config.vendor.model_label);
                    Some((keywords, config.vendor.model_label.clone()))
                }
                Err(detail) => {
                    ctx.vendor_failure(&detail);
                    None
                }
            }
        },
    )
}
