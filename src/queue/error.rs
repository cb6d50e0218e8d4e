use thiserror::Error;

/// Errors returned by [`EventQueue::enqueue`](super::EventQueue::enqueue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// No free slot left; the queue was not modified
    #[error("event queue is full ({capacity} events pending)")]
    Full { capacity: usize },
}
