use thiserror::Error;

use crate::io::midi::Command;
use crate::queue::{Event, EventQueue, Key, QueueError, QueueObserver, SlotIndex};

/// A note to be played: on at `beat`, off `duration` beats later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// Beat the note starts on
    pub beat: u16,
    /// MIDI note number
    pub pitch: u8,
    /// MIDI velocity (1-127; 0 would read as a note-off to most receivers)
    pub velocity: u8,
    /// Length in beats
    pub duration: u16,
}

impl Note {
    /// One-beat note at velocity 100
    pub fn new(beat: u16, pitch: u8) -> Self {
        Self {
            beat,
            pitch,
            velocity: 100,
            duration: 1,
        }
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_duration(mut self, duration: u16) -> Self {
        self.duration = duration;
        self
    }

    /// Beat the note is released on
    pub fn end_beat(&self) -> Result<u16, ScheduleError> {
        self.beat
            .checked_add(self.duration)
            .ok_or(ScheduleError::BeatOverflow {
                beat: self.beat,
                duration: self.duration,
            })
    }

    /// The same note moved `beats` later
    pub fn shifted(self, beats: u16) -> Result<Self, ScheduleError> {
        let beat = self
            .beat
            .checked_add(beats)
            .ok_or(ScheduleError::BeatOverflow {
                beat: self.beat,
                duration: beats,
            })?;
        Ok(Self { beat, ..self })
    }

    pub fn on_event(&self, channel: u8) -> Event {
        Event::new(
            Key::beat(self.beat),
            Command::note_on(channel, self.pitch, self.velocity),
        )
    }

    pub fn off_event(&self, channel: u8) -> Result<Event, ScheduleError> {
        Ok(Event::new(
            Key::beat(self.end_beat()?),
            Command::note_off(channel, self.pitch, 0),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// `beat + duration` does not fit the 16-bit beat counter
    #[error("note at beat {beat} with duration {duration} runs past the last beat")]
    BeatOverflow { beat: u16, duration: u16 },
}

/// Queue the on/off pair for `note`.
///
/// Both events go in or neither does: with fewer than two free slots the
/// note is refused up front rather than leaving an unmatched note-on.
pub fn schedule_note<const N: usize, O: QueueObserver>(
    queue: &mut EventQueue<N, O>,
    note: &Note,
    channel: u8,
) -> Result<(SlotIndex, SlotIndex), ScheduleError> {
    let off = note.off_event(channel)?;
    let on = note.on_event(channel);

    if queue.free_slots().nth(1).is_none() {
        return Err(QueueError::Full {
            capacity: queue.capacity(),
        }
        .into());
    }

    let on_slot = queue.enqueue(on)?;
    let off_slot = queue.enqueue(off)?;
    Ok((on_slot, off_slot))
}
