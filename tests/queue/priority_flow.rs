//! Ordering and backpressure across real threads

use prioflow::core::cancellation::CancellationToken;
use prioflow::queue::api::{Item, Prioritized, Priority, PriorityQueue, QueueError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn item(priority: Priority, producer_id: usize, sequence: u64) -> Item {
    Item::new(0, priority, producer_id, Instant::now(), sequence)
}

#[test]
fn test_high_priority_overtakes_backlog() {
    let queue = PriorityQueue::new(5, CancellationToken::new()).unwrap();
    for sequence in 1..=4 {
        queue.enqueue(item(Priority::Low, 1, sequence)).unwrap();
    }
    queue.enqueue(item(Priority::High, 2, 1)).unwrap();

    let first = queue.dequeue().unwrap();
    assert_eq!(first.priority(), Priority::High);
    assert_eq!(first.producer_id(), 2);

    let rest: Vec<u64> = (0..4)
        .map(|_| queue.dequeue().unwrap().sequence())
        .collect();
    assert_eq!(rest, vec![1, 2, 3, 4]);
}

#[test]
fn test_each_producer_stream_stays_in_order_per_class() {
    let queue = PriorityQueue::new(4, CancellationToken::new()).unwrap();
    let per_producer = 200u64;

    let producers: Vec<_> = (1..=3)
        .map(|producer_id| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for sequence in 1..=per_producer {
                    queue
                        .enqueue(item(Priority::Normal, producer_id, sequence))
                        .unwrap();
                }
            })
        })
        .collect();

    let mut last_seen = [0u64; 4];
    for _ in 0..(3 * per_producer) {
        let received = queue.dequeue().unwrap();
        let slot = &mut last_seen[received.producer_id()];
        assert!(received.sequence() > *slot, "out of order: {:?}", received);
        *slot = received.sequence();
    }

    for handle in producers {
        handle.join().unwrap();
    }
    assert!(queue.is_empty());
    assert_eq!(last_seen[1..], [per_producer; 3]);
}

#[test]
fn test_full_queue_holds_producer_until_space() {
    let queue = PriorityQueue::new(1, CancellationToken::new()).unwrap();
    queue.enqueue(item(Priority::Low, 1, 1)).unwrap();

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.enqueue_observed(item(Priority::High, 1, 2)))
    };

    thread::sleep(Duration::from_millis(50));
    assert!(queue.is_full());
    assert_eq!(queue.dequeue().unwrap().sequence(), 1);

    let outcome = producer.join().unwrap().unwrap();
    assert!(outcome.blocked());
    assert_eq!(queue.dequeue().unwrap().sequence(), 2);
}

#[test]
fn test_cancellation_releases_every_waiter() {
    let token = CancellationToken::new();
    let queue = PriorityQueue::new(2, token.clone()).unwrap();

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.dequeue())
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    assert!(token.trigger());

    for handle in consumers {
        assert_eq!(handle.join().unwrap(), Err(QueueError::Cancelled));
    }
    assert_eq!(
        queue.enqueue(item(Priority::Normal, 1, 1)),
        Err(QueueError::Cancelled)
    );
}
