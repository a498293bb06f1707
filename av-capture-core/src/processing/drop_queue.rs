use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Bounded FIFO with drop-oldest producer semantics.
///
/// `push` never blocks and never fails: at capacity the oldest element is
/// evicted to make room, inside the same critical section as the append, so
/// the capacity bound holds under any interleaving. `pop` blocks up to a
/// timeout for the next element; competing consumers each receive an
/// element at most once.
#[derive(Debug)]
pub struct DropQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
    capacity: usize,
}

impl<T> DropQueue<T> {
    /// Create a queue bounded to `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be non-zero");
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Condvar::new(),
            capacity,
        }
    }

    /// Append `value`, evicting the oldest element when at capacity.
    pub fn push(&self, value: T) {
        let mut items = self.items.lock();
        if items.len() == self.capacity {
            items.pop_front();
        }
        items.push_back(value);
        drop(items);
        self.available.notify_one();
    }

    /// Remove and return the oldest element, waiting up to `timeout` for
    /// one to arrive. Returns `None` if the queue stayed empty.
    pub fn pop(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut items = self.items.lock();
        loop {
            if let Some(value) = items.pop_front() {
                return Some(value);
            }
            if self.available.wait_until(&mut items, deadline).timed_out() {
                // A push may have landed between the wakeup and the timeout.
                return items.pop_front();
            }
        }
    }

    /// Number of elements currently queued.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const SHORT: Duration = Duration::from_millis(10);

    #[test]
    fn fifo_order() {
        let queue = DropQueue::new(8);
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.pop(SHORT), Some(1));
        assert_eq!(queue.pop(SHORT), Some(2));
        assert_eq!(queue.pop(SHORT), Some(3));
        assert_eq!(queue.pop(SHORT), None);
    }

    #[test]
    fn overflow_drops_oldest() {
        let queue = DropQueue::new(4);
        for value in 0..6 {
            queue.push(value);
        }

        assert_eq!(queue.len(), 4);
        for expected in 2..6 {
            assert_eq!(queue.pop(SHORT), Some(expected));
        }
    }

    #[test]
    fn burst_overflow_keeps_last_capacity_in_order() {
        // 150 pushes into capacity 100: exactly the last 100 survive.
        let queue = DropQueue::new(100);
        for value in 0..150 {
            queue.push(value);
        }

        assert_eq!(queue.len(), 100);
        let mut drained = Vec::new();
        while let Some(value) = queue.pop(SHORT) {
            drained.push(value);
        }
        assert_eq!(drained, (50..150).collect::<Vec<_>>());
    }

    #[test]
    fn pop_times_out_on_empty_queue() {
        let queue: DropQueue<u32> = DropQueue::new(4);
        let started = Instant::now();
        assert_eq!(queue.pop(Duration::from_millis(50)), None);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn pop_wakes_on_push() {
        let queue = Arc::new(DropQueue::new(4));

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop(Duration::from_secs(2)))
        };

        thread::sleep(Duration::from_millis(20));
        queue.push(42);
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn push_never_blocks_under_concurrent_pop() {
        let queue = Arc::new(DropQueue::new(4));
        for value in 0..4 {
            queue.push(value);
        }

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(value) = queue.pop(Duration::from_millis(100)) {
                    seen.push(value);
                }
                seen
            })
        };

        // Producer keeps pushing into a full, contended queue.
        for value in 4..200 {
            queue.push(value);
        }

        let seen = consumer.join().unwrap();
        // No duplicates, order preserved even across drops.
        for pair in seen.windows(2) {
            assert!(pair[0] < pair[1], "out of order: {pair:?}");
        }
    }

    #[test]
    fn elements_delivered_at_most_once_across_consumers() {
        let queue = Arc::new(DropQueue::new(16));
        for value in 0..10 {
            queue.push(value);
        }

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(value) = queue.pop(SHORT) {
                        seen.push(value);
                    }
                    seen
                })
            })
            .collect();

        let mut all: Vec<u32> = consumers
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_panics() {
        let _: DropQueue<u32> = DropQueue::new(0);
    }
}
