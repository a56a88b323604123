//! Producer worker loop

use crate::core::cancellation::CancellationToken;
use crate::queue::Prioritized;
use crate::worker::{
    BlockDetection, ItemGenerator, Pacing, Role, WorkerContext, WorkerError, WorkerReport,
    WorkerResult,
};
use std::sync::Arc;

/// Generates items and inserts them until cancelled
pub struct Producer {
    id: usize,
    context: WorkerContext,
    generator: ItemGenerator,
    pacing: Pacing,
    detection: BlockDetection,
}

impl Producer {
    pub fn new(
        id: usize,
        context: WorkerContext,
        generator: ItemGenerator,
        pacing: Pacing,
        detection: BlockDetection,
    ) -> Self {
        Self {
            id,
            context,
            generator,
            pacing,
            detection,
        }
    }

    pub fn run(mut self) -> WorkerResult<WorkerReport> {
        let token: Arc<CancellationToken> = Arc::clone(self.context.token());
        let queue = Arc::clone(&self.context.queue);
        let mut report = WorkerReport::new(self.id, Role::Producer);
        log::info!("Producer {} started", self.id);

        while !token.is_set() {
            let item = self.generator.next_item(self.context.clock.now());
            let (value, priority, sequence) = (item.value(), item.priority(), item.sequence());

            let peeked_full = self.detection == BlockDetection::Sampled && queue.is_full();
            let outcome = match queue.enqueue_observed(item) {
                Ok(outcome) => outcome,
                Err(e) if e.is_cancelled() => break,
                Err(source) => {
                    return Err(WorkerError::Queue {
                        role: Role::Producer,
                        id: self.id,
                        source,
                    })
                }
            };
            let blocked = match self.detection {
                BlockDetection::Exact => outcome.blocked(),
                BlockDetection::Sampled => peeked_full,
            };

            self.context.sink.record_produced();
            report.processed += 1;
            if blocked {
                self.context.sink.record_producer_blocked();
                report.blocked += 1;
                log::debug!("BLOCKED: producer {} waited for free space", self.id);
            }
            log::debug!(
                "WRITE: producer {} item #{} value {} ({})",
                self.id,
                sequence,
                value,
                priority
            );

            if !token.sleep(self.pacing.next_delay()) {
                break;
            }
        }

        log::info!(
            "Producer {} stopped after {} item(s)",
            self.id,
            report.processed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::{MockTimeProvider, SystemTimeProvider};
    use crate::queue::{Item, Priority, PriorityQueue};
    use crate::worker::test_support::RecordingSink;
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::{Duration, Instant};

    fn context(capacity: usize, sink: Arc<RecordingSink>) -> WorkerContext {
        WorkerContext {
            queue: PriorityQueue::new(capacity, CancellationToken::new()).unwrap(),
            sink,
            clock: Arc::new(SystemTimeProvider),
        }
    }

    fn producer(id: usize, context: WorkerContext, detection: BlockDetection) -> Producer {
        Producer::new(
            id,
            context,
            ItemGenerator::with_seed(id, 3),
            Pacing::new(Duration::ZERO, None),
            detection,
        )
    }

    #[test]
    fn test_fills_queue_then_stops_on_cancellation() {
        let sink = Arc::new(RecordingSink::default());
        let context = context(3, sink.clone());
        let queue = Arc::clone(&context.queue);
        let token = Arc::clone(context.token());

        let handle = thread::spawn({
            let context = context.clone();
            move || producer(2, context, BlockDetection::Exact).run()
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while !queue.is_full() {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(5));
        }
        thread::sleep(Duration::from_millis(50));
        token.trigger();

        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.role, Role::Producer);
        assert_eq!(report.processed, 3);
        assert_eq!(sink.produced(), 3);
        assert_eq!(queue.size(), 3);

        // The fourth item was blocked and then cancelled: never counted
        assert_eq!(report.blocked, 0);
    }

    #[test]
    fn test_items_carry_producer_id_and_sequence() {
        let sink = Arc::new(RecordingSink::default());
        let context = context(4, sink);
        let queue = Arc::clone(&context.queue);
        let token = Arc::clone(context.token());

        let handle = thread::spawn({
            let context = context.clone();
            move || producer(5, context, BlockDetection::Exact).run()
        });
        while !queue.is_full() {
            thread::sleep(Duration::from_millis(5));
        }
        // Queue holds sequences 1 to 4 while the fifth item waits for space
        let first = queue.dequeue().unwrap();
        token.trigger();
        let report = handle.join().unwrap().unwrap();

        assert_eq!(first.producer_id(), 5);
        assert!((1..=4).contains(&first.sequence()));
        assert!(report.processed >= 4);
    }

    #[test]
    fn test_exact_detection_counts_a_real_wait() {
        let sink = Arc::new(RecordingSink::default());
        let context = context(1, sink.clone());
        let queue = Arc::clone(&context.queue);
        let token = Arc::clone(context.token());
        queue
            .enqueue(Item::new(0, Priority::Low, 9, Instant::now(), 1))
            .unwrap();

        let handle = thread::spawn({
            let context = context.clone();
            move || producer(1, context, BlockDetection::Exact).run()
        });

        thread::sleep(Duration::from_millis(100));
        queue.dequeue().unwrap();

        // Producer refills the slot after waiting, then blocks again
        let deadline = Instant::now() + Duration::from_secs(5);
        while sink.produced() == 0 {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(5));
        }
        token.trigger();

        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.blocked, 1);
        assert_eq!(sink.producer_blocks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sampled_detection_uses_the_peek() {
        let sink = Arc::new(RecordingSink::default());
        let context = context(1, sink.clone());
        let queue = Arc::clone(&context.queue);
        let token = Arc::clone(context.token());
        queue
            .enqueue(Item::new(0, Priority::Low, 9, Instant::now(), 1))
            .unwrap();

        let handle = thread::spawn({
            let context = context.clone();
            move || producer(1, context, BlockDetection::Sampled).run()
        });

        thread::sleep(Duration::from_millis(100));
        queue.dequeue().unwrap();
        while sink.produced() == 0 {
            thread::sleep(Duration::from_millis(5));
        }
        token.trigger();

        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.blocked, 1);
    }

    #[test]
    fn test_already_cancelled_produces_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let context = WorkerContext {
            queue: PriorityQueue::new(2, CancellationToken::new()).unwrap(),
            sink: sink.clone(),
            clock: Arc::new(MockTimeProvider::new()),
        };
        context.token().trigger();

        let report = producer(1, context, BlockDetection::Exact).run().unwrap();

        assert_eq!(report.processed, 0);
        assert_eq!(sink.produced(), 0);
    }
}
