pub mod candidate;
pub mod coerce;
pub mod execution;
pub mod shape;
