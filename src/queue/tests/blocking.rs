//! Tests for blocking and backpressure behaviour
//!
//! A call blocks if and only if the queue is full (enqueue) or empty
//! (dequeue) when it is made; these tests check both directions and that
//! the exact wait report agrees.

#[cfg(test)]
mod tests {
    use crate::core::cancellation::CancellationToken;
    use crate::queue::api::{Item, Priority, PriorityQueue, WaitOutcome};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn item(sequence: u64, priority: Priority) -> Item {
        Item::new(0, priority, 1, Instant::now(), sequence)
    }

    #[test]
    fn test_enqueue_blocks_only_when_full() {
        let queue = PriorityQueue::new(1, CancellationToken::new()).unwrap();

        // Room available: completes without waiting
        assert_eq!(
            queue.enqueue_observed(item(1, Priority::Low)).unwrap(),
            WaitOutcome::Immediate
        );

        let (tx, rx) = mpsc::channel();
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let outcome = queue.enqueue_observed(item(2, Priority::High));
                tx.send(()).unwrap();
                outcome
            })
        };

        // Full queue: the producer must still be waiting
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(queue.size(), 1);

        assert_eq!(queue.dequeue().unwrap().sequence(), 1);
        rx.recv_timeout(Duration::from_secs(5))
            .expect("producer should be released once space is available");

        assert_eq!(producer.join().unwrap().unwrap(), WaitOutcome::Blocked);
        assert_eq!(queue.dequeue().unwrap().sequence(), 2);
    }

    #[test]
    fn test_dequeue_blocks_only_when_empty() {
        let queue = PriorityQueue::new(2, CancellationToken::new()).unwrap();

        let (tx, rx) = mpsc::channel();
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let result = queue.dequeue_observed();
                tx.send(()).unwrap();
                result
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        queue.enqueue(item(7, Priority::Normal)).unwrap();
        rx.recv_timeout(Duration::from_secs(5))
            .expect("consumer should be released once data is available");

        let (received, outcome) = consumer.join().unwrap().unwrap();
        assert_eq!(received.sequence(), 7);
        assert!(outcome.blocked());

        // Data present: completes without waiting
        queue.enqueue(item(8, Priority::Normal)).unwrap();
        let (_, outcome) = queue.dequeue_observed().unwrap();
        assert_eq!(outcome, WaitOutcome::Immediate);
    }

    #[test]
    fn test_blocked_producers_released_one_slot_at_a_time() {
        let queue = PriorityQueue::new(1, CancellationToken::new()).unwrap();
        queue.enqueue(item(0, Priority::Low)).unwrap();

        let producers: Vec<_> = (1..=3)
            .map(|sequence| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.enqueue(item(sequence, Priority::Low)))
            })
            .collect();

        let mut received = Vec::new();
        for _ in 0..4 {
            received.push(queue.dequeue().unwrap().sequence());
            assert!(queue.size() <= 1);
        }

        for producer in producers {
            producer.join().unwrap().unwrap();
        }

        received.sort_unstable();
        assert_eq!(received, vec![0, 1, 2, 3]);
        assert!(queue.is_empty());
    }
}
