use serde::{Deserialize, Serialize};

/// Cost/quality tier a candidate list belongs to. Cascade ordering across
/// tiers is decided by the service; within a list the declaration order is
/// the try order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Free,
    Auto,
    Paid,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Free => "free",
            Strategy::Auto => "auto",
            Strategy::Paid => "paid",
        }
    }
}

/// One (provider, model) pair eligible to serve a request. Immutable once
/// the configuration is built; lists are never reordered during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelCandidate {
    pub id: String,
    pub strategy: Strategy,
}

impl ModelCandidate {
    pub fn new(id: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            id: id.into(),
            strategy,
        }
    }
}

/// Which cascade the caller asked for. `free` walks the free list before
/// anything that can cost money; `paid` starts at the vendor auto-router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingMode {
    Free,
    Paid,
}

impl RoutingMode {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("paid") => RoutingMode::Paid,
            _ => RoutingMode::Free,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoutingMode::Free => "free",
            RoutingMode::Paid => "paid",
        }
    }
}

/// The three prompt families the orchestrator serves. Vision tasks need a
/// vision-capable free list; only keyword tasks have a vendor fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Keywords,
    Vision,
    Consensus,
}

impl TaskKind {
    pub fn needs_vision(self) -> bool {
        matches!(self, TaskKind::Vision)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Keywords => "keywords",
            TaskKind::Vision => "vision",
            TaskKind::Consensus => "consensus",
        }
    }
}
