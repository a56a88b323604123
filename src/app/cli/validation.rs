//! Argument validation
//!
//! Every problem is collected before reporting, so a single invocation
//! lists all invalid arguments at once.

use crate::core::validation::{validate_positive, validate_range, ValidationError};
use crate::metrics::report::SummaryFormat;
use crate::queue::MAX_QUEUE_CAPACITY;
use crate::worker::WorkerConfig;
use std::time::Duration;

use super::args::Args;

pub const MAX_PRODUCERS: i64 = 10;
pub const MAX_CONSUMERS: i64 = 10;
pub const DEFAULT_PRODUCER_WAIT_SECS: u64 = 3;
pub const DEFAULT_CONSUMER_WAIT_SECS: u64 = 4;

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub workers: WorkerConfig,
    pub queue_capacity: usize,
    pub run_time: Duration,
    pub summary_format: SummaryFormat,
}

impl Args {
    /// Check the run parameters and build the settings for the run
    pub fn validate(&self) -> Result<RunSettings, ValidationError> {
        let checks = [
            validate_range("Number of producers", self.producers, 1, MAX_PRODUCERS),
            validate_range("Number of consumers", self.consumers, 1, MAX_CONSUMERS),
            validate_range("Queue size", self.queue_size, 1, MAX_QUEUE_CAPACITY as i64),
            validate_positive("Timeout", self.timeout),
        ];
        let issues: Vec<String> = checks.into_iter().filter_map(Result::err).collect();
        if !issues.is_empty() {
            return Err(ValidationError::from_issues(issues));
        }

        // The range checks above make these conversions lossless
        Ok(RunSettings {
            workers: WorkerConfig {
                producers: self.producers as usize,
                consumers: self.consumers as usize,
                producer_max_wait: Duration::from_secs(
                    self.producer_wait.unwrap_or(DEFAULT_PRODUCER_WAIT_SECS),
                ),
                consumer_max_wait: Duration::from_secs(
                    self.consumer_wait.unwrap_or(DEFAULT_CONSUMER_WAIT_SECS),
                ),
                block_detection: self.block_detection.unwrap_or_default(),
                seed: self.seed,
            },
            queue_capacity: self.queue_size as usize,
            run_time: Duration::from_secs(self.timeout as u64),
            summary_format: self.summary_format.unwrap_or_default(),
        })
    }
}
