//! The event manager: bounded publish/subscribe with deferred dispatch.
//!
//! Producers call [`EventManager::trigger`] (possibly from an interrupt
//! handler); a scheduler periodically calls [`EventManager::process`] to
//! drain the queue and invoke subscribers. Every touch of the shared
//! subscription table and queue happens inside the host-supplied
//! [`Guard`]'s critical section; callbacks themselves run outside it.
//!
//! Capacities are const generics fixed at compile time:
//! `IDS` distinct event ids, `CBS` subscribers per id, `DEPTH` queued
//! records. `SINGLE_STEP` picks the processing mode: `true` dispatches at
//! most one record per `process` call so the caller can interleave other
//! duties, `false` drains the whole queue.

use core::cell::UnsafeCell;

#[cfg(not(feature = "portable-atomic"))]
use core::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "portable-atomic")]
use portable_atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::event::{Callback, EventId, EventRecord};
use crate::guard::Guard;
use crate::queue::EventQueue;
use crate::table::SubTable;

struct State<S: Copy, const IDS: usize, const CBS: usize, const DEPTH: usize> {
    table: SubTable<S, IDS, CBS>,
    queue: EventQueue<S, DEPTH>,
}

/// Fixed-capacity publish/subscribe dispatcher.
///
/// `S` is the host's source payload type (see [`EventRecord`]); `G` the
/// critical-section strategy. The whole structure is allocation-free and
/// const-constructible, so it can live in a `static`:
///
/// ```
/// use evman::{EventManager, NoGuard};
///
/// static EVENTS: EventManager<u32, NoGuard, 2, 2, 4, true> =
///     EventManager::new(NoGuard);
///
/// EVENTS.init();
/// assert_eq!(EVENTS.pending(), 0);
/// ```
///
/// Nothing works until [`init`](Self::init) has run.
pub struct EventManager<
    S: Copy,
    G: Guard,
    const IDS: usize,
    const CBS: usize,
    const DEPTH: usize,
    const SINGLE_STEP: bool,
> {
    guard: G,
    enabled: AtomicBool,
    state: UnsafeCell<State<S, IDS, CBS, DEPTH>>,
}

// SAFETY: all access to `state` goes through `guard.with`, and implementing
// `Guard` is a promise that `with` excludes every other context sharing the
// manager. The gate is atomic. Records carry `S` across contexts, hence
// `S: Send`.
unsafe impl<
    S: Copy + Send,
    G: Guard + Sync,
    const IDS: usize,
    const CBS: usize,
    const DEPTH: usize,
    const SINGLE_STEP: bool,
> Sync for EventManager<S, G, IDS, CBS, DEPTH, SINGLE_STEP>
{
}

impl<
    S: Copy,
    G: Guard,
    const IDS: usize,
    const CBS: usize,
    const DEPTH: usize,
    const SINGLE_STEP: bool,
> EventManager<S, G, IDS, CBS, DEPTH, SINGLE_STEP>
{
    /// Everything empty, queue disarmed, processing disabled.
    pub const fn new(guard: G) -> Self {
        Self {
            guard,
            enabled: AtomicBool::new(false),
            state: UnsafeCell::new(State {
                table: SubTable::new(),
                queue: EventQueue::new(),
            }),
        }
    }

    /// Reset table and queue to empty, arm the queue, enable processing,
    /// then run the guard's `on_init` hook.
    pub fn init(&self) {
        self.guard.with(|| {
            // SAFETY: inside the guard's critical section (see Sync impl).
            let st = unsafe { &mut *self.state.get() };
            st.table.clear();
            st.queue.reset();
        });
        self.enabled.store(true, Ordering::Release);
        self.guard.on_init();
    }

    /// Drop pending events, disarm the queue, disable processing, then run
    /// the guard's `on_deinit` hook. Subscriptions are left in place; the
    /// next `init` wipes them.
    pub fn deinit(&self) {
        self.guard.with(|| {
            // SAFETY: inside the guard's critical section.
            let st = unsafe { &mut *self.state.get() };
            st.queue.invalidate();
        });
        self.enabled.store(false, Ordering::Release);
        self.guard.on_deinit();
    }

    /// Subscribe `cb` to `id` until explicitly unregistered.
    pub fn register_callback(&self, id: EventId, cb: Callback<S>) -> Result<()> {
        self.register(id, cb, false)
    }

    /// Subscribe `cb` to `id` for exactly one dispatch; the slot clears
    /// itself after the callback returns.
    pub fn register_oneshot(&self, id: EventId, cb: Callback<S>) -> Result<()> {
        self.register(id, cb, true)
    }

    fn register(&self, id: EventId, cb: Callback<S>, one_shot: bool) -> Result<()> {
        self.guard.with(|| {
            // SAFETY: inside the guard's critical section.
            let st = unsafe { &mut *self.state.get() };
            st.table.register(id, cb, one_shot)
        })
    }

    /// Remove `cb` from `id`'s subscribers.
    pub fn unregister_callback(&self, id: EventId, cb: Callback<S>) -> Result<()> {
        self.guard.with(|| {
            // SAFETY: inside the guard's critical section.
            let st = unsafe { &mut *self.state.get() };
            st.table.unregister(id, cb)
        })
    }

    /// Admit an event into the queue.
    ///
    /// Fails for the void id, for an id with zero subscribers (events
    /// nobody listens for never enter the queue), and while the manager is
    /// not initialized. When the queue is full the oldest unprocessed
    /// record is evicted to make room. Returns as soon as the record is
    /// admitted; dispatch happens later, in `process`.
    pub fn trigger(&self, id: EventId, source: S) -> Result<()> {
        if id.is_void() {
            return Err(Error::VoidEventId);
        }
        self.guard.with(|| {
            // SAFETY: inside the guard's critical section.
            let st = unsafe { &mut *self.state.get() };
            if !st.queue.is_ready() {
                return Err(Error::Inactive);
            }
            if !st.table.contains(id) {
                return Err(Error::NoSubscribers);
            }
            if st.queue.push_evicting(EventRecord { id, source }) {
                #[cfg(feature = "defmt")]
                defmt::warn!("event queue full, dropped oldest record");
            }
            Ok(())
        })
    }

    /// Enable dispatching. Pending events are kept either way.
    pub fn process_events_enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    /// Disable dispatching without touching pending state.
    pub fn process_events_disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Number of queued, not yet processed records.
    pub fn pending(&self) -> usize {
        self.guard.with(|| {
            // SAFETY: inside the guard's critical section.
            let st = unsafe { &*self.state.get() };
            st.queue.len()
        })
    }

    /// Drain the queue and invoke subscribers.
    ///
    /// Returns the number of records delivered to at least one callback.
    /// A no-op (returning 0) while processing is disabled. Records whose id
    /// lost all subscribers since enqueue are discarded silently. With
    /// `SINGLE_STEP == true` at most one record leaves the queue per call.
    ///
    /// Callback slots for the record's id are snapshotted before the first
    /// callback runs, so a callback that registers or unregisters anything
    /// cannot disturb the in-progress iteration; a one-shot slot is cleared
    /// after its callback returns, and only if it still holds that callback.
    pub fn process(&self) -> usize {
        if !self.enabled.load(Ordering::Acquire) {
            return 0;
        }

        let mut dispatched = 0;
        loop {
            let front = self.guard.with(|| {
                // SAFETY: inside the guard's critical section.
                let st = unsafe { &*self.state.get() };
                st.queue
                    .front()
                    .map(|rec| (rec, st.table.snapshot(rec.id)))
            });
            let Some((rec, slots)) = front else { break };

            if let Some(slots) = slots {
                for slot in slots {
                    let Some(cb) = slot.cb else { continue };
                    cb(&rec);
                    if slot.one_shot {
                        self.guard.with(|| {
                            // SAFETY: inside the guard's critical section.
                            let st = unsafe { &mut *self.state.get() };
                            st.table.clear_matching(rec.id, cb);
                        });
                    }
                }
                dispatched += 1;
            } else {
                #[cfg(feature = "defmt")]
                defmt::trace!("discarding event {} with no remaining subscribers", rec.id);
            }

            self.guard.with(|| {
                // SAFETY: inside the guard's critical section.
                let st = unsafe { &mut *self.state.get() };
                st.queue.pop_front();
            });

            if SINGLE_STEP {
                break;
            }
        }
        dispatched
    }
}
