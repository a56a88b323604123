//! Queue Integration Test Modules

pub mod priority_flow;
pub mod worker_runs;
