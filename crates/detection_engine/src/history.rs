//! Bounded sample history with overwrite-oldest semantics.
//!
//! A thin chronological wrapper over `ringbuf::HeapRb`. Samples are small
//! `Copy` values, so reads hand out copies; callers never observe later
//! buffer mutation through a returned sample.

use contracts::AxisSample;
use ringbuf::{traits::*, HeapRb};

/// Number of samples the engine keeps as context
pub const HISTORY_CAPACITY: usize = 100;

/// Overwrite-oldest ring of the most recent samples
///
/// Invariants: `len() <= capacity()`; `is_full()` stays true from the
/// moment capacity is reached until the next `clear()`.
pub struct HistoryBuffer {
    ring: HeapRb<AxisSample>,
    capacity: usize,
}

impl std::fmt::Debug for HistoryBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("full", &self.is_full())
            .finish()
    }
}

impl HistoryBuffer {
    /// Create a buffer with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: HeapRb::new(capacity),
            capacity,
        }
    }

    /// Push a sample, evicting the oldest once full. O(1), never fails.
    #[inline]
    pub fn push(&mut self, sample: AxisSample) {
        self.ring.push_overwrite(sample);
    }

    /// Most recently pushed sample, by value
    ///
    /// `None` only when nothing was ever pushed since the last reset.
    #[inline]
    pub fn last(&self) -> Option<AxisSample> {
        self.ring.iter().last().copied()
    }

    /// Sample at chronological index `i` (0 = oldest)
    #[inline]
    pub fn get(&self, i: usize) -> Option<AxisSample> {
        self.ring.iter().nth(i).copied()
    }

    /// Number of samples currently held
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.occupied_len()
    }

    /// True when no sample is held
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// True once capacity has been reached since the last reset
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Configured capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy out the whole history, oldest first
    pub fn snapshot(&self) -> Vec<AxisSample> {
        self.ring.iter().copied().collect()
    }

    /// Reset to empty without deallocating
    pub fn clear(&mut self) {
        self.ring.clear();
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
