// 共有キューの並行性に関する統合テスト
use shared_queue::{QueueError, SharedQueue, WakePolicy};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// 全コンシューマがキューの終了まで取り出し続ける
fn drain_with_consumers(queue: &Arc<SharedQueue<u64>>, consumers: usize) -> Vec<Vec<u64>> {
    thread::scope(|scope| {
        let handles: Vec<_> = (0..consumers)
            .map(|_| {
                scope.spawn(|| {
                    let mut taken = Vec::new();
                    while let Ok(item) = queue.pop() {
                        taken.push(item);
                    }
                    taken
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn test_fifo_with_single_producer_and_consumer() {
    let queue = SharedQueue::new();
    let items: Vec<String> = (0..100).map(|i| format!("P{i}")).collect();

    for item in &items {
        queue.push(item.clone()).unwrap();
    }
    let popped: Vec<String> = (0..items.len()).map(|_| queue.pop().unwrap()).collect();

    assert_eq!(popped, items);
    assert!(queue.is_empty());
}

#[test]
fn test_no_loss_no_duplication_with_concurrent_consumers() {
    const N: u64 = 10_000;
    let queue = Arc::new(SharedQueue::new());

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for i in 0..N {
                queue.push(i).unwrap();
            }
            queue.close();
        })
    };

    let per_consumer = drain_with_consumers(&queue, 4);
    producer.join().unwrap();

    // 各コンシューマから見た順序はFIFO（昇順）になっている
    for taken in &per_consumer {
        assert!(taken.windows(2).all(|w| w[0] < w[1]));
    }

    let mut all: Vec<u64> = per_consumer.into_iter().flatten().collect();
    assert_eq!(all.len() as u64, N);
    all.sort_unstable();
    assert_eq!(all, (0..N).collect::<Vec<_>>());
}

#[test]
fn test_mutual_exclusion_keeps_length_exact() {
    const PRODUCERS: u64 = 8;
    const PUSHES_PER_PRODUCER: u64 = 500;
    const POPS: usize = 1_500;

    let queue = Arc::new(SharedQueue::new());

    thread::scope(|scope| {
        for p in 0..PRODUCERS {
            let queue = &queue;
            scope.spawn(move || {
                for i in 0..PUSHES_PER_PRODUCER {
                    queue.push(p * PUSHES_PER_PRODUCER + i).unwrap();
                }
            });
        }
        for _ in 0..3 {
            let queue = &queue;
            scope.spawn(move || {
                for _ in 0..POPS / 3 {
                    queue.pop().unwrap();
                }
            });
        }
    });

    let total_pushes = (PRODUCERS * PUSHES_PER_PRODUCER) as usize;
    assert_eq!(queue.len(), total_pushes - POPS);
}

#[test]
fn test_pop_on_empty_queue_waits_for_push() {
    let queue: Arc<SharedQueue<&str>> = Arc::new(SharedQueue::new());
    let returned = Arc::new(AtomicBool::new(false));

    let consumer = {
        let queue = Arc::clone(&queue);
        let returned = Arc::clone(&returned);
        thread::spawn(move || {
            let item = queue.pop();
            returned.store(true, Ordering::SeqCst);
            item
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!returned.load(Ordering::SeqCst), "pop returned before any push");

    queue.push("wake-up").unwrap();
    assert_eq!(consumer.join().unwrap(), Ok("wake-up"));
}

#[test]
fn test_burst_of_concurrent_pushes_and_pops() {
    const TOTAL: u64 = 1_000;
    const PUSHERS: u64 = 8;
    const CONSUMERS: u64 = 4;

    let queue = Arc::new(SharedQueue::new());

    thread::scope(|scope| {
        for p in 0..PUSHERS {
            let queue = &queue;
            scope.spawn(move || {
                for i in 0..TOTAL / PUSHERS {
                    queue.push(p * (TOTAL / PUSHERS) + i).unwrap();
                }
            });
        }
    });
    assert_eq!(queue.len() as u64, TOTAL);

    let popped: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let queue = &queue;
                scope.spawn(move || {
                    (0..TOTAL / CONSUMERS)
                        .map(|_| queue.pop().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(queue.len(), 0);
    let unique: HashSet<u64> = popped.iter().copied().collect();
    assert_eq!(unique.len() as u64, TOTAL);
    assert_eq!(popped.len() as u64, TOTAL);
}

#[test]
fn test_blocked_consumers_each_receive_distinct_items() {
    for policy in [WakePolicy::One, WakePolicy::All] {
        let queue = Arc::new(SharedQueue::new().with_wake_policy(policy));

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.pop())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        for i in 0..4u64 {
            queue.push(i).unwrap();
        }

        let mut received: Vec<u64> = waiters
            .into_iter()
            .map(|w| w.join().unwrap().unwrap())
            .collect();
        received.sort_unstable();
        assert_eq!(received, vec![0, 1, 2, 3], "policy {policy:?}");
    }
}

#[test]
fn test_bounded_queue_never_exceeds_capacity() {
    const CAPACITY: usize = 4;
    let queue = Arc::new(SharedQueue::bounded(CAPACITY));
    let overflowed = AtomicBool::new(false);

    thread::scope(|scope| {
        let queue_ref = &queue;
        let overflowed = &overflowed;
        scope.spawn(move || {
            for i in 0..2_000u64 {
                queue_ref.push(i).unwrap();
                if queue_ref.len() > CAPACITY {
                    overflowed.store(true, Ordering::SeqCst);
                }
            }
            queue_ref.close();
        });

        scope.spawn(move || {
            let mut expected = 0u64;
            loop {
                match queue_ref.pop() {
                    Ok(item) => {
                        assert_eq!(item, expected);
                        expected += 1;
                    }
                    Err(QueueError::Closed) => break,
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
            assert_eq!(expected, 2_000);
        });
    });

    assert!(!overflowed.load(Ordering::SeqCst));
}
