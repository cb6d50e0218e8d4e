//! Player - the device loop
//!
//! Loops a pattern of notes through the event queue: schedules one cycle
//! ahead whenever the queue has room for it, advances the clock, and
//! transmits whatever is due.

use std::time::Duration;

use midiq::{
    io::{send_command, ByteSink},
    queue::TracingObserver,
    sequencing::{schedule_note, Clock, Note, ScheduleError},
    EventQueue, QUEUE_LEN,
};

use crate::ui::{ControlMessage, PendingEntry, SlotState, UiStateUpdate};

pub struct Player {
    queue: EventQueue<QUEUE_LEN, TracingObserver>,
    clock: Clock,
    /// One cycle of notes, beats relative to the cycle start
    pattern: Vec<Note>,
    /// Cycle length in beats
    loop_beats: u16,
    /// Beat the next unscheduled cycle starts on
    next_cycle: Option<u16>,
    channel: u8,
    playing: bool,
    refused: u32,
    dropped: u32,
}

impl Player {
    pub fn new(pattern: Vec<Note>, loop_beats: u16, clock: Clock, channel: u8) -> Self {
        let queue = EventQueue::with_observer(TracingObserver);
        if pattern.len() * 2 > queue.capacity() {
            tracing::warn!(
                notes = pattern.len(),
                capacity = queue.capacity(),
                "pattern does not fit the queue, extra notes will be refused"
            );
        }

        Self {
            queue,
            clock,
            pattern,
            loop_beats: loop_beats.max(1),
            next_cycle: Some(0),
            channel,
            playing: true,
            refused: 0,
            dropped: 0,
        }
    }

    pub fn handle(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::TogglePlayback => self.playing = !self.playing,
            ControlMessage::Reset => self.reset(),
        }
    }

    /// Clear everything pending and start over from 0:000
    pub fn reset(&mut self) {
        self.queue.clear();
        self.clock.reset();
        self.next_cycle = Some(0);
    }

    /// Advance by `elapsed` and transmit due commands. Returns bytes written.
    pub fn process<S: ByteSink>(&mut self, elapsed: Duration, sink: &mut S) -> usize {
        if !self.playing {
            return 0;
        }

        self.clock.advance(elapsed);
        self.schedule_ahead();

        let Self {
            queue,
            clock,
            dropped,
            ..
        } = self;

        let mut written = 0;
        for event in queue.drain_due(clock.now()) {
            match send_command(&mut *sink, event.command) {
                Ok(n) => written += n,
                Err(err) => {
                    *dropped += 1;
                    tracing::warn!(key = %event.key, command = %event.command, %err, "command dropped");
                }
            }
        }
        written
    }

    /// Queue the next cycle once it is within one cycle of now and fits.
    ///
    /// A pattern larger than the whole queue is scheduled once the queue is
    /// empty; the notes past capacity count as refused.
    fn schedule_ahead(&mut self) {
        let Some(start) = self.next_cycle else {
            return;
        };
        if start > self.clock.beat().saturating_add(self.loop_beats) {
            return;
        }
        let needed = (self.pattern.len() * 2).min(self.queue.capacity());
        if self.queue.free_len() < needed {
            return;
        }

        for note in &self.pattern {
            let result = note
                .shifted(start)
                .and_then(|note| schedule_note(&mut self.queue, &note, self.channel));
            match result {
                Ok(_) => {}
                Err(ScheduleError::BeatOverflow { .. }) => {
                    tracing::info!(beat = start, "end of beat range, stopping pattern");
                    self.next_cycle = None;
                    return;
                }
                Err(err) => {
                    self.refused += 1;
                    tracing::warn!(pitch = note.pitch, %err, "note refused");
                }
            }
        }

        tracing::debug!(beat = start, pending = self.queue.len(), "cycle scheduled");
        self.next_cycle = start.checked_add(self.loop_beats);
    }

    /// Allocation-free view of the queue for the UI
    pub fn snapshot(&self) -> UiStateUpdate {
        let mut update = UiStateUpdate::new();
        update.now = self.clock.now();
        update.is_playing = self.playing;
        update.refused = self.refused;
        update.dropped = self.dropped;

        for slot in self.queue.free_slots() {
            update.arena[slot.get()] = SlotState::Free;
        }
        for (i, (slot, event)) in self.queue.iter().enumerate() {
            update.arena[slot.get()] = SlotState::Active;
            update.pending[i] = PendingEntry {
                slot: slot.get() as u16,
                key: event.key,
                command: event.command,
            };
            update.pending_len += 1;
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midiq::Key;

    fn player() -> Player {
        let pattern = vec![
            Note::new(0, 60).with_duration(2),
            Note::new(1, 64),
            Note::new(1, 67),
        ];
        // 1 tick per beat at 60 bpm: one second is one beat
        Player::new(pattern, 4, Clock::new(60.0, 1), 0)
    }

    #[test]
    fn test_first_cycle_goes_out_at_start() {
        let mut player = player();
        let mut wire: Vec<u8> = Vec::new();
        let written = player.process(Duration::ZERO, &mut wire);
        assert_eq!(written, 3);
        assert_eq!(wire, vec![0x90, 60, 100]);
    }

    #[test]
    fn test_plays_in_time_order() {
        let mut player = player();
        let mut wire: Vec<u8> = Vec::new();
        player.process(Duration::ZERO, &mut wire);
        wire.clear();

        player.process(Duration::from_secs(1), &mut wire);
        // LIFO ties: G4 was queued after E4 at beat 1
        assert_eq!(wire, vec![0x90, 67, 100, 0x90, 64, 100]);
    }

    #[test]
    fn test_snapshot_matches_queue() {
        let mut player = player();
        player.process(Duration::ZERO, &mut Vec::<u8>::new());
        let snapshot = player.snapshot();

        assert_eq!(snapshot.now, Key::ZERO);
        assert_eq!(snapshot.pending_len, 5);
        let active = snapshot.arena.iter().filter(|s| **s == SlotState::Active).count();
        let free = snapshot.arena.iter().filter(|s| **s == SlotState::Free).count();
        assert_eq!(active, 5);
        assert_eq!(free, QUEUE_LEN - 1 - 5);
        assert_eq!(snapshot.arena[0], SlotState::Reserved);

        let keys: Vec<Key> = snapshot.pending().iter().map(|p| p.key).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_oversized_pattern_plays_what_fits() {
        // 13 notes need 26 slots, the queue has 24
        let pattern: Vec<Note> = (0..13).map(|i| Note::new(i, 60 + i as u8)).collect();
        let mut player = Player::new(pattern, 16, Clock::new(60.0, 1), 0);
        let mut wire: Vec<u8> = Vec::new();

        assert_eq!(player.process(Duration::ZERO, &mut wire), 3);
        assert_eq!(wire, vec![0x90, 60, 100]);

        let snapshot = player.snapshot();
        assert_eq!(snapshot.refused, 1);
        assert_eq!(usize::from(snapshot.pending_len), QUEUE_LEN - 2);

        for _ in 0..12 {
            player.process(Duration::from_secs(1), &mut wire);
        }
        // beats 0..=12: 12 on/off pairs, the last note never went in
        assert_eq!(wire.len(), 24 * 3);
        assert!(!wire.windows(3).any(|w| w == [0x90, 72, 100]));
        assert!(player.snapshot().pending().is_empty());

        // the emptied queue takes the next cycle, refusing the same note again
        player.process(Duration::from_secs(1), &mut wire);
        assert_eq!(player.snapshot().refused, 2);
        assert_eq!(usize::from(player.snapshot().pending_len), QUEUE_LEN - 1);
    }

    #[test]
    fn test_pause_stops_the_clock() {
        let mut player = player();
        player.handle(ControlMessage::TogglePlayback);
        assert_eq!(player.process(Duration::from_secs(3), &mut Vec::<u8>::new()), 0);
        assert_eq!(player.snapshot().now, Key::ZERO);
    }

    #[test]
    fn test_reset_clears_queue() {
        let mut player = player();
        player.process(Duration::from_secs(2), &mut Vec::<u8>::new());
        player.handle(ControlMessage::Reset);

        let snapshot = player.snapshot();
        assert_eq!(snapshot.now, Key::ZERO);
        assert_eq!(snapshot.pending_len, 0);
    }
}
