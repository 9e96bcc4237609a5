mod candidates;
mod entry;
mod execution_context;
mod local_validation;
mod runtime_config;
mod trace_log;
mod upstream;

pub(crate) use entry::{handle_analyze_consensus, handle_analyze_vision, handle_extract_emotions};
pub(crate) use runtime_config::orchestrator_config;

#[cfg(test)]
mod availability_tests;
