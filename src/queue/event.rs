use core::fmt;
use core::num::NonZeroU16;

use crate::io::midi::Command;

/// Logical timestamp of a scheduled event.
///
/// Ordered lexicographically: `beat` is the coarse unit, `tick` the
/// subdivision within a beat. The derived `Ord` relies on field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key {
    pub beat: u16,
    pub tick: u16,
}

impl Key {
    pub const ZERO: Key = Key { beat: 0, tick: 0 };

    pub const fn new(beat: u16, tick: u16) -> Self {
        Self { beat, tick }
    }

    /// Start of a beat (tick 0)
    pub const fn beat(beat: u16) -> Self {
        Self { beat, tick: 0 }
    }

    /// True when an event at `self` should be delivered at time `now`
    pub fn is_due(&self, now: Key) -> bool {
        *self <= now
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:03}", self.beat, self.tick)
    }
}

/// A command scheduled for delivery at `key`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Event {
    pub key: Key,
    pub command: Command,
}

impl Event {
    pub const fn new(key: Key, command: Command) -> Self {
        Self { key, command }
    }

    pub const fn at(beat: u16, tick: u16, command: Command) -> Self {
        Self::new(Key::new(beat, tick), command)
    }
}

/// Handle to one usable arena slot.
///
/// Never zero: slot 0 is reserved, so `Option<SlotIndex>` is the
/// end-of-list link and still fits in two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(NonZeroU16);

impl SlotIndex {
    /// Returns `None` for the reserved index 0 or anything wider than `u16`.
    pub fn new(index: usize) -> Option<Self> {
        u16::try_from(index).ok().and_then(NonZeroU16::new).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get() as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_orders_beat_before_tick() {
        assert!(Key::new(1, 999) < Key::new(2, 0));
        assert!(Key::new(2, 0) < Key::new(2, 1));
        assert_eq!(Key::new(3, 7).cmp(&Key::new(3, 7)), core::cmp::Ordering::Equal);
    }

    #[test]
    fn test_key_is_due() {
        let key = Key::new(4, 12);
        assert!(key.is_due(Key::new(4, 12)));
        assert!(key.is_due(Key::new(5, 0)));
        assert!(!key.is_due(Key::new(4, 11)));
        assert!(!key.is_due(Key::new(3, 500)));
    }

    #[test]
    fn test_slot_index_rejects_sentinel() {
        assert!(SlotIndex::new(0).is_none());
        assert!(SlotIndex::new(65_536).is_none());
        assert_eq!(SlotIndex::new(7).map(SlotIndex::get), Some(7));
    }

    #[test]
    fn test_link_is_two_bytes() {
        assert_eq!(core::mem::size_of::<Option<SlotIndex>>(), 2);
    }
}
