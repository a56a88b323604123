//! Shared helpers for the integration tests

#![allow(dead_code)]

use clap::Parser;
use prioflow::app::cli::{Args, RunSettings};
use prioflow::metrics::report::SummaryFormat;
use prioflow::worker::WorkerConfig;
use std::time::Duration;

/// Parse a command line given without the program name
pub fn parse_args(argv: &[&str]) -> Args {
    let mut full = vec!["prioflow"];
    full.extend_from_slice(argv);
    Args::try_parse_from(full).expect("test arguments should parse")
}

/// Settings for a short run with no pacing pauses
pub fn fast_settings(producers: usize, consumers: usize, queue_capacity: usize) -> RunSettings {
    RunSettings {
        workers: WorkerConfig {
            producers,
            consumers,
            producer_max_wait: Duration::ZERO,
            consumer_max_wait: Duration::ZERO,
            seed: Some(1234),
            ..WorkerConfig::default()
        },
        queue_capacity,
        run_time: Duration::from_secs(1),
        summary_format: SummaryFormat::Json,
    }
}
