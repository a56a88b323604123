//! Consumer worker loop

use crate::queue::Prioritized;
use crate::worker::{
    BlockDetection, Pacing, Role, WorkerContext, WorkerError, WorkerReport, WorkerResult,
};
use std::sync::Arc;

/// Removes items in priority order until cancelled
pub struct Consumer {
    id: usize,
    context: WorkerContext,
    pacing: Pacing,
    detection: BlockDetection,
}

impl Consumer {
    pub fn new(
        id: usize,
        context: WorkerContext,
        pacing: Pacing,
        detection: BlockDetection,
    ) -> Self {
        Self {
            id,
            context,
            pacing,
            detection,
        }
    }

    pub fn run(mut self) -> WorkerResult<WorkerReport> {
        let token = Arc::clone(self.context.token());
        let queue = Arc::clone(&self.context.queue);
        let mut report = WorkerReport::new(self.id, Role::Consumer);
        log::info!("Consumer {} started", self.id);

        while !token.is_set() {
            let peeked_empty = self.detection == BlockDetection::Sampled && queue.is_empty();
            let (item, outcome) = match queue.dequeue_observed() {
                Ok(taken) => taken,
                Err(e) if e.is_cancelled() => break,
                Err(source) => {
                    return Err(WorkerError::Queue {
                        role: Role::Consumer,
                        id: self.id,
                        source,
                    })
                }
            };
            let latency = item.latency_at(self.context.clock.now());
            let blocked = match self.detection {
                BlockDetection::Exact => outcome.blocked(),
                BlockDetection::Sampled => peeked_empty,
            };

            self.context.sink.record_consumed(item.priority(), latency);
            report.processed += 1;
            if blocked {
                self.context.sink.record_consumer_blocked();
                report.blocked += 1;
                log::debug!("STARVED: consumer {} waited for data", self.id);
            }
            log::debug!(
                "READ: consumer {} took item #{} from producer {} value {} ({}) after {:?}",
                self.id,
                item.sequence(),
                item.producer_id(),
                item.value(),
                item.priority(),
                latency
            );

            if !token.sleep(self.pacing.next_delay()) {
                break;
            }
        }

        log::info!(
            "Consumer {} stopped after {} item(s)",
            self.id,
            report.processed
        );
        Ok(report)
    }
}
