//! Error type shared by all fallible dispatcher operations.
//!
//! Every failure is reported synchronously through the call's return value.
//! No operation retries, panics, or leaves state half-mutated: a call that
//! returns an error has changed nothing.

use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

/// Why a registration, unregistration, or trigger was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The reserved `EventId::VOID` was passed where a real id is required.
    VoidEventId,
    /// The same `(id, callback)` pair is already registered.
    AlreadyRegistered,
    /// No free subscription entry for a new event id.
    TableExhausted,
    /// The entry for this id has no free callback slot.
    SlotsExhausted,
    /// No entry for this id, or the callback is not among its subscribers.
    NotRegistered,
    /// `trigger` refused an id with zero subscribers (admission filter).
    NoSubscribers,
    /// The queue is not live: `init` has not run, or `deinit` has.
    Inactive,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::VoidEventId => "reserved void event id",
            Error::AlreadyRegistered => "callback already registered for this id",
            Error::TableExhausted => "no free subscription entry",
            Error::SlotsExhausted => "no free callback slot for this id",
            Error::NotRegistered => "callback not registered for this id",
            Error::NoSubscribers => "no subscribers for this id",
            Error::Inactive => "event manager not initialized",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
