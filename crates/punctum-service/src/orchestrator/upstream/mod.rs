pub(super) mod candidate_flow;
pub(super) mod cascade;
pub(super) mod outcome;
pub(super) mod retry;
pub(super) mod router;
pub(super) mod transport;
pub(super) mod vendor_fallback;
