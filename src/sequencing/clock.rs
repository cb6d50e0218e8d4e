//! Clock - logical (beat, tick) time for the polling loop
//!
//! The queue keeps no time of its own. Whoever drives it advances a clock
//! by wall-clock elapsed time and asks the queue for anything due at
//! `clock.now()`.

use std::time::Duration;

use crate::queue::Key;

/// Monotonic beat/tick clock driven by elapsed wall-clock time
#[derive(Debug, Clone)]
pub struct Clock {
    /// Tempo in beats per minute
    bpm: f64,
    /// Ticks per beat (timing resolution)
    ticks_per_beat: u16,
    /// Whole beats elapsed
    beat: u16,
    /// Position inside the current beat, in fractional ticks
    tick_position: f64,
}

impl Clock {
    pub fn new(bpm: f64, ticks_per_beat: u16) -> Self {
        Self {
            bpm,
            ticks_per_beat: ticks_per_beat.max(1),
            beat: 0,
            tick_position: 0.0,
        }
    }

    /// ticks per second = (bpm / 60) * ticks_per_beat
    fn ticks_per_second(&self) -> f64 {
        (self.bpm / 60.0) * self.ticks_per_beat as f64
    }

    /// Move time forward. Sub-tick remainders carry over to the next call.
    pub fn advance(&mut self, elapsed: Duration) {
        self.advance_ticks(elapsed.as_secs_f64() * self.ticks_per_second());
    }

    /// Move time forward by a (possibly fractional) number of ticks
    pub fn advance_ticks(&mut self, ticks: f64) {
        if ticks.is_nan() || ticks <= 0.0 {
            return;
        }

        let tpb = self.ticks_per_beat as f64;
        let total = self.tick_position + ticks;
        let whole_beats = (total / tpb).floor();
        self.tick_position = total - whole_beats * tpb;

        let beats = whole_beats.min(u16::MAX as f64) as u16;
        self.beat = self.beat.saturating_add(beats);
        if self.beat == u16::MAX {
            // Saturated: pin to the last tick instead of wrapping back to 0.
            self.tick_position = self.tick_position.min(tpb - 1.0);
        }
    }

    pub fn now(&self) -> Key {
        Key::new(self.beat, self.tick_position as u16)
    }

    pub fn beat(&self) -> u16 {
        self.beat
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Change tempo; the current position is kept
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    /// Back to 0:000
    pub fn reset(&mut self) {
        self.beat = 0;
        self.tick_position = 0.0;
    }
}
