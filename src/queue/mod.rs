/*
Event Queue
===========

A fixed-capacity queue of MIDI commands, each stamped with the logical time
(beat, tick) it should go out on the wire. Events arrive in any order and
leave strictly in time order. Nothing is allocated after construction.


Vocabulary
----------

  slot        One entry of the arena: an event plus a `next` link.

  arena       The `[Slot; N]` array. Slot 0 is reserved and never used, so
              `N - 1` events fit.

  free pool   Singly linked list of unused slots. Push/pop at the head, so the
              most recently freed slot is reused first.

  active list Singly linked list of occupied slots, sorted ascending by key.
              Its head is always the earliest-due event.

  due         An event is due at `now` when `event.key <= now`.


Two Lists, One Array
--------------------

Every usable slot belongs to exactly one of the two lists. Both lists thread
through the same `next` field:

    arena:   [ 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 ]
               ^   reserved

    active:  3 ──▶ 6 ──▶ 1 ──▶ ∅        (keys 0:010, 0:020, 2:000)
    free:    7 ──▶ 2 ──▶ 5 ──▶ 4 ──▶ ∅

  enqueue   pop the free head, scan the active list for the insertion point,
            splice in.                                    O(active length)
  dequeue   if the active head is due, unlink it and push it on the free
            list.                                         O(1)
  clear     rechain 1..N into the free list, empty the active list.  O(N)

There is no count field: "full" means the free list is empty, "empty" means
the active list is empty.


Ties
----

When several events share a key the queue needs a rule. The default is LIFO:
the newest event goes in front of the older ones with the same key, which is
what a scan that stops at the first node `>= new` gives you. `TieBreak::Fifo`
stops at the first node `> new` instead, so equal keys come out in arrival
order.
*/

mod error;
mod event;
mod observer;

use core::fmt;

pub use error::QueueError;
pub use event::{Event, Key, SlotIndex};
pub use observer::{NoopObserver, QueueObserver, TracingObserver};

use crate::io::midi::Command;

/// How events with identical keys are ordered relative to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// Newest first among equal keys
    #[default]
    Lifo,
    /// Oldest first among equal keys
    Fifo,
}

impl TieBreak {
    /// Whether an incoming event with key `new` is spliced in ahead of an
    /// already queued event with key `existing`.
    fn goes_before(self, new: Key, existing: Key) -> bool {
        match self {
            TieBreak::Lifo => existing >= new,
            TieBreak::Fifo => existing > new,
        }
    }
}

#[derive(Clone, Copy)]
struct Slot {
    event: Event,
    next: Option<SlotIndex>,
}

impl Slot {
    const VACANT: Slot = Slot {
        event: Event::new(Key::ZERO, Command::EMPTY),
        next: None,
    };
}

/// Time-ordered event queue holding up to `N - 1` events.
pub struct EventQueue<const N: usize, O: QueueObserver = NoopObserver> {
    slots: [Slot; N],
    active_head: Option<SlotIndex>,
    free_head: Option<SlotIndex>,
    tie_break: TieBreak,
    observer: O,
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue with LIFO tie-breaking and no instrumentation
    pub fn new() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, O: QueueObserver> EventQueue<N, O> {
    // Slot 0 is the sentinel and indices must fit a NonZeroU16.
    const VALID_CAPACITY: () = assert!(
        N >= 2 && N <= u16::MAX as usize + 1,
        "EventQueue needs 2..=65536 slots"
    );

    /// Create an empty queue that reports to `observer`
    pub fn with_observer(observer: O) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        let mut queue = Self {
            slots: [Slot::VACANT; N],
            active_head: None,
            free_head: None,
            tie_break: TieBreak::default(),
            observer,
        };
        queue.reset_lists();
        queue
    }

    /// Set the ordering rule for events with identical keys.
    ///
    /// Only affects events enqueued afterwards.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Schedule `event`, keeping the active list sorted by key.
    ///
    /// Returns the slot now holding the event. The handle is informational;
    /// the queue keeps ownership of the slot until the event is dequeued.
    pub fn enqueue(&mut self, event: Event) -> Result<SlotIndex, QueueError> {
        let Some(slot) = self.alloc() else {
            self.observer.on_full(&event);
            return Err(QueueError::Full {
                capacity: self.capacity(),
            });
        };

        let mut prev = None;
        let mut cursor = self.active_head;
        while let Some(node) = cursor {
            let queued = &self.slots[node.get()];
            if self.tie_break.goes_before(event.key, queued.event.key) {
                break;
            }
            prev = Some(node);
            cursor = queued.next;
        }

        self.slots[slot.get()] = Slot {
            event,
            next: cursor,
        };
        match prev {
            Some(prev) => self.slots[prev.get()].next = Some(slot),
            None => self.active_head = Some(slot),
        }

        self.observer.on_enqueue(slot, &event);
        Ok(slot)
    }

    /// Remove and return the earliest event if it is due at `now`.
    ///
    /// `None` means the queue is empty or its head lies in the future.
    pub fn dequeue(&mut self, now: Key) -> Option<Event> {
        let head = self.active_head?;
        let Slot { event, next } = self.slots[head.get()];
        if !event.key.is_due(now) {
            return None;
        }

        self.active_head = next;
        self.release(head);
        self.observer.on_dequeue(head, &event);
        Some(event)
    }

    /// Dequeue every event due at `now`, in delivery order
    pub fn drain_due(&mut self, now: Key) -> impl Iterator<Item = Event> + '_ {
        core::iter::from_fn(move || self.dequeue(now))
    }

    /// Drop all pending events and return every slot to the free pool
    pub fn clear(&mut self) {
        self.reset_lists();
        self.observer.on_clear();
    }

    /// The earliest pending event, due or not
    pub fn peek(&self) -> Option<&Event> {
        self.active_head.map(|head| &self.slots[head.get()].event)
    }

    /// Key of the earliest pending event
    pub fn next_due(&self) -> Option<Key> {
        self.peek().map(|event| event.key)
    }

    /// Number of usable slots (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Number of pending events. Walks the active list.
    pub fn len(&self) -> usize {
        self.links(self.active_head).count()
    }

    /// Number of unused slots. Walks the free list.
    pub fn free_len(&self) -> usize {
        self.links(self.free_head).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_head.is_none()
    }

    pub fn is_full(&self) -> bool {
        self.free_head.is_none()
    }

    /// Pending events in delivery order, with the slot each occupies
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Event)> + '_ {
        self.links(self.active_head)
            .map(move |slot| (slot, &self.slots[slot.get()].event))
    }

    /// Unused slots in the order they will be handed out
    pub fn free_slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.links(self.free_head)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn links(&self, head: Option<SlotIndex>) -> Links<'_> {
        Links {
            slots: &self.slots,
            cursor: head,
        }
    }

    fn reset_lists(&mut self) {
        // Chain 1 -> 2 -> ... -> N-1; index N is never touched.
        for i in 1..N {
            self.slots[i].next = if i + 1 < N { SlotIndex::new(i + 1) } else { None };
        }
        self.free_head = SlotIndex::new(1);
        self.active_head = None;
    }

    fn alloc(&mut self) -> Option<SlotIndex> {
        let slot = self.free_head?;
        self.free_head = self.slots[slot.get()].next;
        Some(slot)
    }

    fn release(&mut self, slot: SlotIndex) {
        self.slots[slot.get()].next = self.free_head;
        self.free_head = Some(slot);
    }
}

/// Walks one of the two intrusive lists
struct Links<'a> {
    slots: &'a [Slot],
    cursor: Option<SlotIndex>,
}

impl Iterator for Links<'_> {
    type Item = SlotIndex;

    fn next(&mut self) -> Option<SlotIndex> {
        let slot = self.cursor?;
        self.cursor = self.slots[slot.get()].next;
        Some(slot)
    }
}

impl<const N: usize, O: QueueObserver> fmt::Debug for EventQueue<N, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "EventQueue {{ capacity: {}, pending: {}, free: {}, ties: {:?} }}",
            self.capacity(),
            self.len(),
            self.free_len(),
            self.tie_break
        )?;
        writeln!(f, "> active")?;
        for (slot, event) in self.iter() {
            writeln!(f, "  {}  {}  {}", slot, event.key, event.command)?;
        }
        write!(f, "> free   ")?;
        for slot in self.free_slots() {
            write!(f, " {}", slot)?;
        }
        Ok(())
    }
}
