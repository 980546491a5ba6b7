//! Bounded circular queue of pending events.
//!
//! Overwrite-on-full policy: when a record arrives and the queue is at
//! capacity, the oldest unconsumed record is evicted first. Memory and
//! staleness stay bounded; the cost is silently losing the least-recent
//! event under sustained overload.
//!
//! ## Invariants
//!
//! For `DEPTH > 0`:
//!
//! 1. `0 <= self.len <= DEPTH`
//! 2. `0 <= self.rd < DEPTH` and `0 <= self.wr < DEPTH`
//! 3. `self.wr == (self.rd + self.len) % DEPTH`
//! 4. The `self.len` live records sit at `rd, rd+1, …, rd+len-1` (mod DEPTH),
//!    and exactly those slots are initialized.
//!
//! `ready` tracks lifecycle: `reset` arms the queue, `invalidate` disarms it
//! (the dispatcher's `deinit`). A disarmed queue accepts nothing and yields
//! nothing.

use core::mem::MaybeUninit;

use crate::event::EventRecord;

pub(crate) struct EventQueue<S: Copy, const DEPTH: usize> {
    slots: [MaybeUninit<EventRecord<S>>; DEPTH],
    rd: usize,
    wr: usize,
    len: usize,
    ready: bool,
}

impl<S: Copy, const DEPTH: usize> EventQueue<S, DEPTH> {
    pub const fn new() -> Self {
        assert!(DEPTH > 0);
        Self {
            slots: [const { MaybeUninit::uninit() }; DEPTH],
            rd: 0,
            wr: 0,
            len: 0,
            ready: false,
        }
    }

    #[inline]
    const fn next(idx: usize) -> usize {
        if idx + 1 >= DEPTH { 0 } else { idx + 1 }
    }

    /// Empty the queue and arm it.
    pub fn reset(&mut self) {
        self.rd = 0;
        self.wr = 0;
        self.len = 0;
        self.ready = true;
    }

    /// Drop all pending records and disarm the queue.
    pub fn invalidate(&mut self) {
        self.rd = 0;
        self.wr = 0;
        self.len = 0;
        self.ready = false;
    }

    #[inline]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Append `rec`, evicting the oldest record first when full.
    /// Returns `true` if an eviction happened.
    pub fn push_evicting(&mut self, rec: EventRecord<S>) -> bool {
        debug_assert!(self.ready);
        let evicted = self.len == DEPTH;
        if evicted {
            self.rd = Self::next(self.rd);
            self.len -= 1;
        }
        self.slots[self.wr].write(rec);
        self.wr = Self::next(self.wr);
        self.len += 1;
        evicted
    }

    /// Copy of the oldest record without dequeuing it.
    pub fn front(&self) -> Option<EventRecord<S>> {
        if !self.ready || self.is_empty() {
            return None;
        }
        // SAFETY: len > 0, so slot `rd` is initialized (invariant 4).
        // EventRecord is Copy; reading leaves the slot live.
        Some(unsafe { self.slots[self.rd].assume_init_read() })
    }

    /// Discard the oldest record. No-op when empty or disarmed.
    pub fn pop_front(&mut self) {
        if self.ready && self.len > 0 {
            self.rd = Self::next(self.rd);
            self.len -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventQueue;
    use crate::event::{EventId, EventRecord};

    fn rec(id: u32, source: u32) -> EventRecord<u32> {
        EventRecord {
            id: EventId::new(id),
            source,
        }
    }

    #[test]
    fn disarmed_queue_yields_nothing() {
        let q = EventQueue::<u32, 4>::new();
        assert!(!q.is_ready());
        assert!(q.front().is_none());
    }

    #[test]
    fn fifo_order_with_wraparound() {
        let mut q = EventQueue::<u32, 3>::new();
        q.reset();

        for src in 0..3 {
            assert!(!q.push_evicting(rec(7, src)));
        }
        assert_eq!(q.len(), 3);

        q.pop_front();
        assert!(!q.push_evicting(rec(7, 3)));

        let mut seen = std::vec::Vec::new();
        while let Some(r) = q.front() {
            seen.push(r.source);
            q.pop_front();
        }
        assert_eq!(&seen[..], &[1, 2, 3]);
        assert!(q.is_empty());
    }

    #[test]
    fn push_at_capacity_evicts_oldest() {
        let mut q = EventQueue::<u32, 4>::new();
        q.reset();

        for src in 1..=4 {
            assert!(!q.push_evicting(rec(7, src)));
        }
        assert!(q.push_evicting(rec(7, 5)));
        assert_eq!(q.len(), 4);

        let mut seen = std::vec::Vec::new();
        while let Some(r) = q.front() {
            seen.push(r.source);
            q.pop_front();
        }
        assert_eq!(&seen[..], &[2, 3, 4, 5]);
    }

    #[test]
    fn invalidate_drops_pending_records() {
        let mut q = EventQueue::<u32, 4>::new();
        q.reset();
        q.push_evicting(rec(7, 1));
        q.push_evicting(rec(7, 2));

        q.invalidate();
        assert!(q.front().is_none());
        assert!(q.is_empty());

        q.reset();
        assert!(q.front().is_none());
    }
}
