//! Full runs through the worker pool and the shutdown coordinator

use crate::common::fast_settings;
use prioflow::app::startup::run;
use prioflow::core::cancellation::CancellationToken;
use prioflow::core::shutdown::{ShutdownCoordinator, ShutdownReason};
use prioflow::metrics::{Analytics, MetricsSink, RunShape};
use prioflow::queue::PriorityQueue;
use prioflow::worker::{BlockDetection, Role, WorkerConfig, WorkerContext, WorkerPool};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_run_summary_accounts_for_every_item() {
    let summary = run(&fast_settings(3, 2, 5)).unwrap();
    let metrics = &summary.metrics;

    assert_eq!(summary.stopped_by, "deadline");
    assert_eq!(metrics.shape.producers, 3);
    assert_eq!(metrics.shape.consumers, 2);
    assert_eq!(metrics.in_flight, metrics.produced - metrics.consumed);
    assert!(metrics.in_flight <= 5);

    let distributed: u64 = metrics.priority_distribution.iter().map(|s| s.count).sum();
    assert_eq!(distributed, metrics.consumed);
}

#[test]
fn test_single_slot_queue_under_pressure() {
    let summary = run(&fast_settings(4, 1, 1)).unwrap();
    let metrics = &summary.metrics;

    assert!(metrics.produced > 0);
    assert!(metrics.in_flight <= 1);
    assert!(metrics.producer_blocks > 0);
    assert!(metrics.producer_block_percent.is_some_and(|p| p > 0.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_coordinator_stops_pool_at_deadline() {
    let token = CancellationToken::new();
    let queue = PriorityQueue::new(3, token.clone()).unwrap();
    let config = WorkerConfig {
        producers: 2,
        consumers: 2,
        producer_max_wait: Duration::from_millis(20),
        consumer_max_wait: Duration::from_millis(20),
        block_detection: BlockDetection::Sampled,
        seed: Some(5),
    };
    let analytics = Arc::new(Analytics::new(RunShape {
        producers: 2,
        consumers: 2,
        queue_capacity: 3,
    }));
    let sink: Arc<dyn MetricsSink> = analytics.clone();
    let context = WorkerContext {
        queue: queue.clone(),
        sink,
        clock: Arc::new(prioflow::core::time::SystemTimeProvider),
    };

    let pool = WorkerPool::spawn(&config, context).unwrap();
    assert_eq!(pool.len(), 4);

    let (coordinator, rx) = ShutdownCoordinator::new(token.clone());
    let reason = coordinator.run_until(Duration::from_millis(200), rx).await;
    assert_eq!(reason, ShutdownReason::Deadline);

    let reports = tokio::task::spawn_blocking(move || pool.join())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reports.len(), 4);

    let produced: u64 = reports
        .iter()
        .filter(|r| r.role == Role::Producer)
        .map(|r| r.processed)
        .sum();
    let consumed: u64 = reports
        .iter()
        .filter(|r| r.role == Role::Consumer)
        .map(|r| r.processed)
        .sum();

    let snapshot = analytics.snapshot();
    assert_eq!(snapshot.produced, produced);
    assert_eq!(snapshot.consumed, consumed);
    assert_eq!(queue.size() as u64, produced - consumed);
}
