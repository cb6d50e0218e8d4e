//! Instrumentation hooks for the event queue.
//!
//! The queue calls these at each state transition of a slot. Every method
//! has an empty default body, so `NoopObserver` compiles away entirely and
//! custom observers only override what they care about.

use super::event::{Event, SlotIndex};

pub trait QueueObserver {
    /// A slot moved from the free pool into the active list
    fn on_enqueue(&mut self, _slot: SlotIndex, _event: &Event) {}

    /// An enqueue was refused because the free pool is empty
    fn on_full(&mut self, _event: &Event) {}

    /// The active head was delivered and its slot returned to the free pool
    fn on_dequeue(&mut self, _slot: SlotIndex, _event: &Event) {}

    /// Every slot was forced back into the free pool
    fn on_clear(&mut self) {}
}

/// Observer that does nothing (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl QueueObserver for NoopObserver {}

/// Observer that reports queue traffic through `tracing`.
///
/// Enqueue/dequeue are `trace`, a refused enqueue is `warn` since the event
/// is dropped unless the caller retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl QueueObserver for TracingObserver {
    fn on_enqueue(&mut self, slot: SlotIndex, event: &Event) {
        tracing::trace!(
            %slot,
            key = %event.key,
            status = event.command.status,
            data1 = event.command.data1,
            data2 = event.command.data2,
            "event queued"
        );
    }

    fn on_full(&mut self, event: &Event) {
        tracing::warn!(key = %event.key, status = event.command.status, "event queue full");
    }

    fn on_dequeue(&mut self, slot: SlotIndex, event: &Event) {
        tracing::trace!(%slot, key = %event.key, status = event.command.status, "event due");
    }

    fn on_clear(&mut self) {
        tracing::debug!("event queue cleared");
    }
}

impl<O: QueueObserver + ?Sized> QueueObserver for &mut O {
    fn on_enqueue(&mut self, slot: SlotIndex, event: &Event) {
        (**self).on_enqueue(slot, event)
    }

    fn on_full(&mut self, event: &Event) {
        (**self).on_full(event)
    }

    fn on_dequeue(&mut self, slot: SlotIndex, event: &Event) {
        (**self).on_dequeue(slot, event)
    }

    fn on_clear(&mut self) {
        (**self).on_clear()
    }
}
