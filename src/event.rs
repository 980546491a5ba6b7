//! Event identifiers, records, and the callback contract.
//!
//! An [`EventId`] names a category of occurrence (e.g. "alarm 1 matched").
//! The raw value `0` is reserved: it marks "no event" and is also the
//! unused-entry sentinel inside the subscription table, so it is rejected by
//! every public API that takes an id.
//!
//! The source payload `S` is an opaque `Copy` value chosen by the host: a
//! `&'static` device handle, a raw register base, or an index into a device
//! table. The dispatcher never looks inside it; it is copied into the queue
//! on `trigger` and handed back to callbacks by reference.

/// Identifier for a category of events.
///
/// `EventId::VOID` (raw `0`) is reserved and rejected everywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventId(u32);

impl EventId {
    /// The reserved "no event" id. Also marks unused subscription entries.
    pub const VOID: EventId = EventId(0);

    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        EventId(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_void(self) -> bool {
        self.0 == 0
    }
}

/// A queued event: the id that fired plus the producer-supplied source.
///
/// Records move through the queue by value; `S` stays a non-owning observer
/// whose lifetime is the producer's responsibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventRecord<S: Copy> {
    pub id: EventId,
    pub source: S,
}

/// Subscriber callback.
///
/// A plain function pointer, so registration identity (duplicate detection,
/// unregistering) is well defined. The dispatcher ignores anything the
/// callback does with the record beyond reading it.
pub type Callback<S> = fn(&EventRecord<S>);
