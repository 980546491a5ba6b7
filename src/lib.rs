//! Bounded publish/subscribe event dispatching for no-std embedded targets.
//!
//! # Highlights
//! - Fixed-capacity subscription table and event queue, no allocation.
//! - Producers (e.g. an interrupt handler observing a register-match
//!   condition) stay decoupled from consumers (application callbacks):
//!   `trigger` only enqueues, a later `process` call dispatches.
//! - One-shot subscriptions that remove themselves after the first dispatch.
//! - Host-pluggable critical sections via the [`Guard`] trait; a
//!   `critical-section`-backed guard ships behind the `critical-section`
//!   feature.
//!
//! # Quick start
//! ```
//! use core::sync::atomic::{AtomicUsize, Ordering};
//! use evman::{EventId, EventManager, EventRecord, NoGuard};
//!
//! const ALARM_MATCH: EventId = EventId::new(0x98d8_3c6e);
//!
//! static FIRED: AtomicUsize = AtomicUsize::new(0);
//! fn on_alarm(_ev: &EventRecord<u32>) {
//!     FIRED.fetch_add(1, Ordering::Relaxed);
//! }
//!
//! // 2 event ids, 2 subscribers per id, queue depth 4, drain-all mode.
//! let events: EventManager<u32, NoGuard, 2, 2, 4, false> =
//!     EventManager::new(NoGuard);
//! events.init();
//!
//! events.register_callback(ALARM_MATCH, on_alarm).unwrap();
//! events.trigger(ALARM_MATCH, 0).unwrap();
//!
//! assert_eq!(events.process(), 1);
//! assert_eq!(FIRED.load(Ordering::Relaxed), 1);
//! ```
//!
//! # No-std
//! The crate is `#![no_std]` by default. Tests require `std`.
//!
//! # Safety and concurrency
//! `trigger` may run on a different execution context than `process` (the
//! interrupt-producer / main-loop-consumer split). Every touch of the
//! shared table and queue is bracketed by the supplied [`Guard`]; the
//! default [`NoGuard`] provides no exclusion and is safe only when one
//! context owns the manager outright. Callbacks run outside the critical
//! section and should not call back into the manager unless the guard
//! provides full mutual exclusion.
//!
//! # Semantics
//! - `EventId::new(0)` is reserved; every operation rejects it.
//! - `trigger` rejects ids with zero subscribers, so the queue never holds
//!   events nobody listens for.
//! - A full queue evicts its oldest unprocessed record to admit a new one:
//!   memory and staleness stay bounded, the least-recent event is lost.
//! - `process` honors a global enable/disable gate and either drains the
//!   queue or, in single-step mode, dispatches one record per call.
#![no_std]

mod error;
mod event;
pub mod guard;
pub mod manager;
mod queue;
mod table;

pub use error::{Error, Result};
pub use event::{Callback, EventId, EventRecord};
#[cfg(feature = "critical-section")]
pub use guard::CsGuard;
pub use guard::{Guard, NoGuard};
pub use manager::EventManager;

#[cfg(test)]
extern crate std;
