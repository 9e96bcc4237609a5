use std::time::{Duration, Instant};

use punctum_core::candidate::{RoutingMode, Strategy, TaskKind};
use punctum_core::execution::ExecutionLog;

use super::trace_log;
use super::upstream::outcome::AttemptOutcome;

/// Per-run state: the caller-visible execution log plus the trace id that
/// ties the run's lines together in the trace file. One instance per
/// request, never shared.
pub(super) struct RunContext {
    trace_id: String,
    log: ExecutionLog,
    started: Instant,
}

impl RunContext {
    pub(super) fn new(task: TaskKind, mode: RoutingMode, input_count: usize) -> Self {
        let trace_id = trace_log::next_trace_id();
        trace_log::log_request_start(&trace_id, task.as_str(), mode.as_str(), input_count);
        Self {
            trace_id,
            log: ExecutionLog::new(),
            started: Instant::now(),
        }
    }

    pub(super) fn candidate_start(&mut self, idx: usize, total: usize, model: &str, retry: u32) {
        let attempt_label = if retry > 0 {
            format!(" (Retry {retry})")
        } else {
            String::new()
        };
        self.log.push(format!(
            "Attempting model {}/{}: {}{}",
            idx + 1,
            total,
            model,
            attempt_label
        ));
        trace_log::log_candidate_start(&self.trace_id, idx, total, model, retry);
    }

    pub(super) fn attempt_failure(&mut self, model: &str, outcome: &AttemptOutcome) {
        let (kind, detail) = match outcome {
            AttemptOutcome::Retryable { detail } => ("retryable", detail.as_str()),
            AttemptOutcome::Fatal { detail } => ("fatal", detail.as_str()),
            AttemptOutcome::Success { .. } => ("success", ""),
        };
        self.log.push(format!("[FAILURE] {model}: {detail}"));
        trace_log::log_attempt_result(&self.trace_id, model, kind, detail);
    }

    pub(super) fn retry_wait(&mut self, model: &str, delay: Duration) {
        self.log.push(format!(
            "Self-healing: Retrying {} in {:.1}s...",
            model,
            delay.as_secs_f64()
        ));
    }

    pub(super) fn switching_model(&mut self) {
        self.log.push("Switching to fallback model...");
    }

    pub(super) fn success(&mut self, model: &str) {
        self.log.push(format!("Success with {model}!"));
        trace_log::log_attempt_result(&self.trace_id, model, "success", "-");
    }

    pub(super) fn list_exhausted(&mut self, total: usize) {
        self.log.push(format!("[Error] All {total} models exhausted."));
    }

    pub(super) fn strategy_switch(&mut self, from: Strategy, to: Strategy) {
        self.log.push(format!(
            "[Cascade] Strategy '{}' exhausted; switching to '{}'...",
            from.as_str(),
            to.as_str()
        ));
        trace_log::log_strategy_switch(&self.trace_id, from.as_str(), to.as_str());
    }

    pub(super) fn vendor_attempt(&mut self, endpoint: &str) {
        self.log
            .push("[Cascade] All strategies exhausted; falling back to emotion classifier...");
        trace_log::log_vendor_fallback(&self.trace_id, endpoint);
    }

    pub(super) fn vendor_failure(&mut self, detail: &str) {
        self.log.push(format!("[Vendor] Classifier failed: {detail}"));
        trace_log::log_attempt_result(&self.trace_id, "vendor-classifier", "fatal", detail);
    }

    pub(super) fn vendor_success(&mut self, model: &str) {
        self.log.push(format!("Success with {model}!"));
        trace_log::log_attempt_result(&self.trace_id, model, "success", "-");
    }

    pub(super) fn finish(&self, model: &str, outcome: &str) {
        trace_log::log_request_final(
            &self.trace_id,
            model,
            outcome,
            self.started.elapsed().as_millis(),
        );
    }

    #[cfg(test)]
    pub(super) fn lines(&self) -> &[String] {
        self.log.lines()
    }

    pub(super) fn into_lines(self) -> Vec<String> {
        self.log.into_lines()
    }
}
