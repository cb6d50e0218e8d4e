pub mod io; // MIDI wire format, serial sink
pub mod queue; // Fixed-capacity time-ordered event queue
pub mod sequencing; // Notes and logical time

pub use io::midi::Command;
pub use queue::{Event, EventQueue, Key, QueueError, SlotIndex, TieBreak};

/// Arena length used by the firmware build: 24 pending events.
///
/// Size for worst-case pending events, e.g. polyphony x 2 for on/off pairs.
pub const QUEUE_LEN: usize = 25;
