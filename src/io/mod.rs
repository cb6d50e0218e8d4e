// Purpose - MIDI wire format and the serial channel it goes out on

pub mod midi;
pub mod serial;

pub use midi::{Command, MidiEvent, WireBytes, NO_DATA2};
pub use serial::{send_command, ByteSink, TransmitError};
