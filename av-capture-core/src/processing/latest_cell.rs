use parking_lot::Mutex;

/// Single-slot holder for the most recent value of a stream.
///
/// One writer thread overwrites the slot; any number of reader threads take
/// clones. The lock is scoped to the swap or the clone, never to the
/// caller's use of the returned value, so a reader can never observe a
/// half-written value and a slow reader stalls the writer for at most one
/// clone.
///
/// Overwrite semantics: values between two reads are lost. That is the
/// contract; a fast producer with a slow consumer keeps only the newest.
#[derive(Debug)]
pub struct LatestCell<T> {
    slot: Mutex<Option<T>>,
}

impl<T: Clone> LatestCell<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Replace the held value. Never waits on readers beyond the slot lock.
    pub fn put(&self, value: T) {
        *self.slot.lock() = Some(value);
    }

    /// Clone out the current value, or `None` if nothing was ever written.
    pub fn get(&self) -> Option<T> {
        self.slot.lock().clone()
    }

    /// Whether a value has been published yet.
    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<T: Clone> Default for LatestCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_before_first_write() {
        let cell: LatestCell<u32> = LatestCell::new();
        assert!(cell.is_empty());
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn latest_write_wins() {
        let cell = LatestCell::new();
        for value in 1..=5 {
            cell.put(value);
        }
        assert_eq!(cell.get(), Some(5));
    }

    #[test]
    fn read_is_an_independent_copy() {
        let cell = LatestCell::new();
        cell.put(vec![1u8, 2, 3]);

        let mut copy = cell.get().unwrap();
        copy[0] = 99;

        assert_eq!(cell.get(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn repeated_reads_return_same_value() {
        let cell = LatestCell::new();
        cell.put("frame".to_string());
        assert_eq!(cell.get(), cell.get());
    }

    #[test]
    fn concurrent_reads_never_go_backwards() {
        let cell = Arc::new(LatestCell::new());

        let writer = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                for value in 0u64..1000 {
                    cell.put(value);
                }
            })
        };

        let mut last_seen = 0u64;
        while !writer.is_finished() {
            if let Some(value) = cell.get() {
                assert!(value >= last_seen, "read went backwards: {value} < {last_seen}");
                last_seen = value;
            }
        }
        writer.join().unwrap();
        assert_eq!(cell.get(), Some(999));
    }
}
