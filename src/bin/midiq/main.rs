//! midiq - terminal monitor for the event queue
//!
//! Loops a short pattern through the queue and shows the arena, the pending
//! events and the bytes on the wire.
//!
//! Run with: cargo run
//! Logs go to `midiq.log` when RUST_LOG is set, e.g. `RUST_LOG=midiq=trace`.

mod app;
mod player;
mod ui;

use std::fs::File;
use std::sync::Mutex;

use app::Midiq;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use midiq::sequencing::Note;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "midiq.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_tracing()?;

    // C major, one bar: held bass, a chord on 3 and an arpeggio on top
    let pattern = vec![
        Note::new(0, 36).with_duration(4).with_velocity(90),
        Note::new(0, 60),
        Note::new(1, 64),
        Note::new(2, 67),
        Note::new(2, 55).with_duration(2).with_velocity(70),
        Note::new(2, 52).with_duration(2).with_velocity(70),
        Note::new(3, 72).with_velocity(110),
    ];

    Midiq::new()
        .bpm(110.0)
        .ticks_per_beat(24)
        .channel(0)
        .pattern(pattern, 4)
        .run()
}

/// The terminal belongs to the UI, so logs only go to a file
fn init_tracing() -> EyreResult<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {}", LOG_FILE))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
