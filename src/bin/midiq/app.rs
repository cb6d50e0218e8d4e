//! Midiq - application builder and runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use midiq::sequencing::{Clock, Note};

use super::player::Player;
use super::ui::{ControlMessage, UiApp, UiStateInit, UiStateUpdate};

/// Serial channel capacity in bytes
const WIRE_BUFFER_SIZE: usize = 1024;

/// Device loop period
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Main application builder
pub struct Midiq {
    bpm: f64,
    ticks_per_beat: u16,
    channel: u8,
    pattern: Vec<Note>,
    loop_beats: u16,
}

impl Midiq {
    pub fn new() -> Self {
        Self {
            bpm: 120.0,
            ticks_per_beat: 24,
            channel: 0,
            pattern: Vec::new(),
            loop_beats: 4,
        }
    }

    /// Set the tempo in beats per minute
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Set the clock resolution
    pub fn ticks_per_beat(mut self, ticks_per_beat: u16) -> Self {
        self.ticks_per_beat = ticks_per_beat;
        self
    }

    /// MIDI channel, 0-15
    pub fn channel(mut self, channel: u8) -> Self {
        self.channel = channel & 0x0F;
        self
    }

    /// Notes for one cycle, looped every `loop_beats` beats
    pub fn pattern(mut self, notes: Vec<Note>, loop_beats: u16) -> Self {
        self.pattern = notes;
        self.loop_beats = loop_beats.max(1);
        self
    }

    /// Run the device loop and the UI until the user quits
    pub fn run(self) -> EyreResult<()> {
        if self.pattern.is_empty() {
            return Err(eyre!("no pattern to play"));
        }

        let (mut wire_tx, wire_rx) = RingBuffer::<u8>::new(WIRE_BUFFER_SIZE);
        let (mut state_tx, state_rx) = RingBuffer::<UiStateUpdate>::new(16);
        let (control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(16);

        let static_state = UiStateInit {
            bpm: self.bpm,
            ticks_per_beat: self.ticks_per_beat,
            loop_beats: self.loop_beats,
            channel: self.channel,
        };

        tracing::info!(
            bpm = self.bpm,
            ticks_per_beat = self.ticks_per_beat,
            notes = self.pattern.len(),
            loop_beats = self.loop_beats,
            "starting"
        );

        let clock = Clock::new(self.bpm, self.ticks_per_beat);
        let mut player = Player::new(self.pattern, self.loop_beats, clock, self.channel);

        let running = Arc::new(AtomicBool::new(true));
        let device_running = running.clone();

        let device = thread::Builder::new()
            .name("midiq-device".into())
            .spawn(move || {
                let mut last = Instant::now();
                while device_running.load(Ordering::Relaxed) {
                    while let Ok(message) = control_rx.pop() {
                        player.handle(message);
                    }

                    let now = Instant::now();
                    player.process(now - last, &mut wire_tx);
                    last = now;

                    if state_tx.slots() > 0 {
                        let _ = state_tx.push(player.snapshot());
                    }

                    thread::sleep(POLL_INTERVAL);
                }
            })
            .wrap_err("failed to spawn device thread")?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(wire_rx, state_rx, control_tx, static_state).run(&mut terminal);
        ratatui::restore();

        running.store(false, Ordering::Relaxed);
        device
            .join()
            .map_err(|_| eyre!("device thread panicked"))?;

        result
    }
}

impl Default for Midiq {
    fn default() -> Self {
        Self::new()
    }
}
