//! Single-slot mailbox
//!
//! Hands one item from a producer to a consumer, typically from the radio's
//! receive path to application code. Holds at most one item: a `put` on a
//! full mailbox overwrites. There is no queue.
//!
//! A mailbox may live in a `static` and be shared between interrupt and
//! thread context. After a reset nothing empties it implicitly, so a consumer
//! that restarts may want to drain it with [`Mailbox::fetch`].

use core::cell::Cell;

use critical_section::Mutex;

pub struct Mailbox<T> {
    slot: Mutex<Cell<Option<T>>>,
}

impl<T: Copy> Mailbox<T> {
    /// An empty mailbox.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Posts `item`, replacing any unread one.
    ///
    /// Returns true when an unread item was overwritten.
    pub fn put(&self, item: T) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).replace(Some(item)).is_some())
    }

    /// Takes the item out, leaving the mailbox empty.
    pub fn fetch(&self) -> Option<T> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    pub fn is_mail(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }
}

impl<T: Copy> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
