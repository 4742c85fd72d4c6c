//! The smoke-test driver: scripted round trips over every shelf, repeated passes.
mod plan;
mod report;
mod round_trip;


pub use plan::SmokePlan;
pub use report::{CheckFailure, CheckKind, RunReport};
pub use round_trip::run_smoke;
