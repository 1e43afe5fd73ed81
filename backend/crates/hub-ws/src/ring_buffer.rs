use std::sync::{Mutex, MutexGuard, PoisonError};

/// Fixed-capacity circular buffer of recent messages.
///
/// Diagnostic only: `add` never fails and silently overwrites the oldest entry
/// once the buffer is full.
pub struct RingBuffer<T> {
    inner: Mutex<RingInner<T>>,
    capacity: usize,
}

struct RingInner<T> {
    slots: Vec<Option<T>>,
    /// Next slot to write
    head: usize,
    len: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a buffer; a capacity of 0 is bumped to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            inner: Mutex::new(RingInner {
                slots,
                head: 0,
                len: 0,
            }),
            capacity,
        }
    }

    pub fn add(&self, item: T) {
        let mut inner = self.lock();
        let head = inner.head;
        inner.slots[head] = Some(item);
        inner.head = (head + 1) % self.capacity;
        inner.len = (inner.len + 1).min(self.capacity);
    }

    /// Up to `n` most recent entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<T> {
        let inner = self.lock();
        let count = n.min(inner.len);
        let start = (inner.head + self.capacity - count) % self.capacity;

        (0..count)
            .filter_map(|i| inner.slots[(start + i) % self.capacity].clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, RingInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
