//! Shared state types for UI communication
//!
//! Static data is sent once at init, dynamic updates are `Copy` and
//! allocation-free so the device loop can push them every frame.

use midiq::{Command, Key, QUEUE_LEN};

/// Commands sent from UI thread to the device loop
#[derive(Clone, Copy, Debug)]
pub enum ControlMessage {
    /// Toggle play/pause
    TogglePlayback,
    /// Clear the queue and restart from 0:000
    Reset,
}

/// Static state sent once at initialization
#[derive(Clone, Debug)]
pub struct UiStateInit {
    pub bpm: f64,
    pub ticks_per_beat: u16,
    /// Pattern cycle length in beats
    pub loop_beats: u16,
    pub channel: u8,
}

/// What a single arena slot currently holds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotState {
    /// Index 0, never used
    #[default]
    Reserved,
    Free,
    Active,
}

/// One row of the pending list
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingEntry {
    pub slot: u16,
    pub key: Key,
    pub command: Command,
}

/// Dynamic state update sent from the device loop
#[derive(Clone, Copy, Debug)]
pub struct UiStateUpdate {
    pub now: Key,
    pub is_playing: bool,
    /// Arena map, indexed by slot
    pub arena: [SlotState; QUEUE_LEN],
    /// Active list in delivery order; first `pending_len` entries are valid
    pub pending: [PendingEntry; QUEUE_LEN],
    pub pending_len: u8,
    /// Pattern notes refused because the queue was full
    pub refused: u32,
    /// Commands dropped because the serial buffer was full
    pub dropped: u32,
}

impl UiStateUpdate {
    pub fn new() -> Self {
        Self {
            now: Key::ZERO,
            is_playing: true,
            arena: [SlotState::Reserved; QUEUE_LEN],
            pending: [PendingEntry::default(); QUEUE_LEN],
            pending_len: 0,
            refused: 0,
            dropped: 0,
        }
    }

    pub fn pending(&self) -> &[PendingEntry] {
        &self.pending[..self.pending_len as usize]
    }
}

impl Default for UiStateUpdate {
    fn default() -> Self {
        Self::new()
    }
}
