use punctum_core::candidate::{ModelCandidate, RoutingMode, Strategy, TaskKind};

use super::runtime_config::env_opt_string;

const ENV_FREE_TEXT_MODELS: &str = "PUNCTUM_FREE_TEXT_MODELS";
const ENV_FREE_VISION_MODELS: &str = "PUNCTUM_FREE_VISION_MODELS";
const ENV_AUTO_MODELS: &str = "PUNCTUM_AUTO_MODELS";
const ENV_PAID_MODELS: &str = "PUNCTUM_PAID_MODELS";

// Ordering within each list is the try order; first listed is first tried.
const DEFAULT_FREE_TEXT_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-lite-preview-02-05:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
    "google/gemma-3-27b-it:free",
];
const DEFAULT_FREE_VISION_MODELS: &[&str] = &[
    "nvidia/nemotron-nano-12b-v2-vl:free",
    "google/gemma-3-27b-it:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
];
const DEFAULT_AUTO_MODELS: &[&str] = &["openrouter/free"];
const DEFAULT_PAID_MODELS: &[&str] = &[
    "openai/gpt-4o-mini",
    "anthropic/claude-3.5-haiku",
    "google/gemini-flash-1.5",
];

const FREE_CASCADE: &[Strategy] = &[Strategy::Free, Strategy::Auto, Strategy::Paid];
const PAID_CASCADE: &[Strategy] = &[Strategy::Auto, Strategy::Paid];

/// Ordered candidate lists per strategy tier, fixed at construction.
pub(crate) struct CandidateSets {
    pub(crate) text_free: Vec<ModelCandidate>,
    pub(crate) vision_free: Vec<ModelCandidate>,
    pub(crate) auto: Vec<ModelCandidate>,
    pub(crate) paid: Vec<ModelCandidate>,
}

impl CandidateSets {
    pub(crate) fn defaults() -> Self {
        Self {
            text_free: build_list(DEFAULT_FREE_TEXT_MODELS, Strategy::Free),
            vision_free: build_list(DEFAULT_FREE_VISION_MODELS, Strategy::Free),
            auto: build_list(DEFAULT_AUTO_MODELS, Strategy::Auto),
            paid: build_list(DEFAULT_PAID_MODELS, Strategy::Paid),
        }
    }

    pub(crate) fn from_env() -> Self {
        let defaults = Self::defaults();
        Self {
            text_free: env_list(ENV_FREE_TEXT_MODELS, Strategy::Free)
                .unwrap_or(defaults.text_free),
            vision_free: env_list(ENV_FREE_VISION_MODELS, Strategy::Free)
                .unwrap_or(defaults.vision_free),
            auto: env_list(ENV_AUTO_MODELS, Strategy::Auto).unwrap_or(defaults.auto),
            paid: env_list(ENV_PAID_MODELS, Strategy::Paid).unwrap_or(defaults.paid),
        }
    }

    pub(crate) fn list_for(&self, strategy: Strategy, kind: TaskKind) -> &[ModelCandidate] {
        match strategy {
            Strategy::Free if kind.needs_vision() => &self.vision_free,
            Strategy::Free => &self.text_free,
            Strategy::Auto => &self.auto,
            Strategy::Paid => &self.paid,
        }
    }
}

/// 付费档先让供应商自动路由，免费档从零成本列表开始逐级升级。
pub(crate) fn cascade_strategies(mode: RoutingMode) -> &'static [Strategy] {
    match mode {
        RoutingMode::Free => FREE_CASCADE,
        RoutingMode::Paid => PAID_CASCADE,
    }
}

fn build_list(ids: &[&str], strategy: Strategy) -> Vec<ModelCandidate> {
    ids.iter()
        .map(|id| ModelCandidate::new(*id, strategy))
        .collect()
}

fn env_list(name: &str, strategy: Strategy) -> Option<Vec<ModelCandidate>> {
    let raw = env_opt_string(name)?;
    let list: Vec<ModelCandidate> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| ModelCandidate::new(id, strategy))
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
