//! Fixed-capacity subscription table: event id → ordered callback slots.
//!
//! An arena of `IDS` entries, each holding up to `CBS` callback slots. No
//! allocation, no hashing; lookups are linear scans, sized for the handful
//! of ids a peripheral driver actually publishes.
//!
//! Entry lifecycle is implicit: an entry whose id is `EventId::VOID` is
//! free. The first registration for an unknown id claims a free entry; the
//! unregistration that clears an entry's last slot reverts its id to VOID so
//! a later registration can reclaim it.
//!
//! Invariant: `entry.id == EventId::VOID` ⇔ every slot of that entry is
//! empty.

use core::ptr;

use crate::error::{Error, Result};
use crate::event::{Callback, EventId};

#[derive(Copy, Clone)]
pub(crate) struct CallbackSlot<S: Copy> {
    pub cb: Option<Callback<S>>,
    pub one_shot: bool,
}

impl<S: Copy> CallbackSlot<S> {
    const EMPTY: Self = Self {
        cb: None,
        one_shot: false,
    };

    #[inline]
    fn holds(&self, cb: Callback<S>) -> bool {
        self.cb.is_some_and(|f| ptr::fn_addr_eq(f, cb))
    }

    #[inline]
    fn clear(&mut self) {
        self.cb = None;
        self.one_shot = false;
    }
}

#[derive(Copy, Clone)]
struct SubEntry<S: Copy, const CBS: usize> {
    id: EventId,
    slots: [CallbackSlot<S>; CBS],
}

impl<S: Copy, const CBS: usize> SubEntry<S, CBS> {
    const FREE: Self = Self {
        id: EventId::VOID,
        slots: [CallbackSlot::EMPTY; CBS],
    };
}

pub(crate) struct SubTable<S: Copy, const IDS: usize, const CBS: usize> {
    entries: [SubEntry<S, CBS>; IDS],
}

impl<S: Copy, const IDS: usize, const CBS: usize> SubTable<S, IDS, CBS> {
    pub const fn new() -> Self {
        assert!(IDS > 0 && CBS > 0);
        Self {
            entries: [SubEntry::FREE; IDS],
        }
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.entries = [SubEntry::FREE; IDS];
    }

    fn entry(&self, id: EventId) -> Option<&SubEntry<S, CBS>> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn entry_mut(&mut self, id: EventId) -> Option<&mut SubEntry<S, CBS>> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Whether at least one subscriber exists for `id`.
    pub fn contains(&self, id: EventId) -> bool {
        !id.is_void() && self.entry(id).is_some()
    }

    /// Add `cb` as a subscriber of `id`, claiming a free entry for a new id.
    pub fn register(&mut self, id: EventId, cb: Callback<S>, one_shot: bool) -> Result<()> {
        if id.is_void() {
            return Err(Error::VoidEventId);
        }

        if let Some(entry) = self.entry_mut(id) {
            if entry.slots.iter().any(|s| s.holds(cb)) {
                return Err(Error::AlreadyRegistered);
            }
            let Some(slot) = entry.slots.iter_mut().find(|s| s.cb.is_none()) else {
                return Err(Error::SlotsExhausted);
            };
            slot.cb = Some(cb);
            slot.one_shot = one_shot;
            return Ok(());
        }

        // First subscriber for this id: claim a free entry.
        let Some(entry) = self.entry_mut(EventId::VOID) else {
            return Err(Error::TableExhausted);
        };
        entry.id = id;
        entry.slots[0].cb = Some(cb);
        entry.slots[0].one_shot = one_shot;
        Ok(())
    }

    /// Remove `cb` from `id`'s subscribers, freeing the entry if it was the
    /// last one.
    pub fn unregister(&mut self, id: EventId, cb: Callback<S>) -> Result<()> {
        if id.is_void() {
            return Err(Error::VoidEventId);
        }
        let Some(entry) = self.entry_mut(id) else {
            return Err(Error::NotRegistered);
        };
        let Some(slot) = entry.slots.iter_mut().find(|s| s.holds(cb)) else {
            return Err(Error::NotRegistered);
        };
        slot.clear();
        if entry.slots.iter().all(|s| s.cb.is_none()) {
            entry.id = EventId::VOID;
        }
        Ok(())
    }

    /// Copy of `id`'s slots for dispatch, taken before any callback runs so
    /// a reentrant register/unregister cannot disturb the iteration.
    pub fn snapshot(&self, id: EventId) -> Option<[CallbackSlot<S>; CBS]> {
        self.entry(id).map(|e| e.slots)
    }

    /// Clear the slot of `id` that still holds `cb`, if any. Used for
    /// one-shot removal after dispatch; silent when the callback already
    /// unregistered itself (or the whole entry) in the meantime.
    pub fn clear_matching(&mut self, id: EventId, cb: Callback<S>) {
        if let Some(entry) = self.entry_mut(id) {
            if let Some(slot) = entry.slots.iter_mut().find(|s| s.holds(cb)) {
                slot.clear();
            }
            if entry.slots.iter().all(|s| s.cb.is_none()) {
                entry.id = EventId::VOID;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SubTable;
    use crate::error::Error;
    use crate::event::{EventId, EventRecord};

    fn cb_a(_: &EventRecord<u32>) {}
    fn cb_b(_: &EventRecord<u32>) {}
    fn cb_c(_: &EventRecord<u32>) {}

    const ID: EventId = EventId::new(7);

    #[test]
    fn register_then_unregister_frees_the_entry() {
        let mut t = SubTable::<u32, 2, 2>::new();

        t.register(ID, cb_a, false).unwrap();
        assert!(t.contains(ID));

        t.unregister(ID, cb_a).unwrap();
        assert!(!t.contains(ID));

        // The freed entry is reclaimable by a different id.
        t.register(EventId::new(9), cb_a, false).unwrap();
        t.register(EventId::new(11), cb_b, false).unwrap();
        assert!(t.contains(EventId::new(9)));
        assert!(t.contains(EventId::new(11)));
    }

    #[test]
    fn duplicate_registration_is_rejected_without_mutation() {
        let mut t = SubTable::<u32, 2, 2>::new();

        t.register(ID, cb_a, false).unwrap();
        assert_eq!(t.register(ID, cb_a, true), Err(Error::AlreadyRegistered));

        // The second slot must still be free.
        t.register(ID, cb_b, false).unwrap();
    }

    #[test]
    fn void_id_is_rejected() {
        let mut t = SubTable::<u32, 2, 2>::new();
        assert_eq!(t.register(EventId::VOID, cb_a, false), Err(Error::VoidEventId));
        assert_eq!(t.unregister(EventId::VOID, cb_a), Err(Error::VoidEventId));
        assert!(!t.contains(EventId::VOID));
    }

    #[test]
    fn capacity_errors() {
        let mut t = SubTable::<u32, 1, 2>::new();

        t.register(ID, cb_a, false).unwrap();
        t.register(ID, cb_b, false).unwrap();
        assert_eq!(t.register(ID, cb_c, false), Err(Error::SlotsExhausted));

        assert_eq!(
            t.register(EventId::new(9), cb_a, false),
            Err(Error::TableExhausted)
        );
    }

    #[test]
    fn unregister_unknown_fails() {
        let mut t = SubTable::<u32, 2, 2>::new();
        assert_eq!(t.unregister(ID, cb_a), Err(Error::NotRegistered));

        t.register(ID, cb_a, false).unwrap();
        assert_eq!(t.unregister(ID, cb_b), Err(Error::NotRegistered));
    }

    #[test]
    fn entry_survives_while_other_slots_remain() {
        let mut t = SubTable::<u32, 2, 2>::new();
        t.register(ID, cb_a, false).unwrap();
        t.register(ID, cb_b, false).unwrap();

        t.unregister(ID, cb_a).unwrap();
        assert!(t.contains(ID));

        t.unregister(ID, cb_b).unwrap();
        assert!(!t.contains(ID));
    }

    #[test]
    fn clear_matching_is_silent_when_absent() {
        let mut t = SubTable::<u32, 2, 2>::new();
        t.clear_matching(ID, cb_a);

        t.register(ID, cb_a, true).unwrap();
        t.clear_matching(ID, cb_b);
        assert!(t.contains(ID));

        t.clear_matching(ID, cb_a);
        assert!(!t.contains(ID));
    }
}
