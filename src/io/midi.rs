use core::fmt;

/// Marker in `data2` meaning "this message has no third byte".
///
/// Any value with the high bit set works; the transmitter only checks bit 7.
pub const NO_DATA2: u8 = 0x80;

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const PROGRAM_CHANGE: u8 = 0xC0;
pub const PITCH_BEND: u8 = 0xE0;

/// Raw 3-byte channel message as it sits in the queue.
///
/// Wire order is `status`, `data1`, `data2`; `data2` is left off the wire
/// when its high bit is set (see [`NO_DATA2`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl Command {
    pub const EMPTY: Command = Command::new(0, 0, 0);

    pub const fn new(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            status,
            data1,
            data2,
        }
    }

    pub const fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        Self::channel_message(NOTE_ON, channel, key, velocity & 0x7F)
    }

    pub const fn note_off(channel: u8, key: u8, velocity: u8) -> Self {
        Self::channel_message(NOTE_OFF, channel, key, velocity & 0x7F)
    }

    pub const fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::channel_message(CONTROL_CHANGE, channel, controller, value & 0x7F)
    }

    /// Two-byte message: `data2` carries the no-data marker
    pub const fn program_change(channel: u8, program: u8) -> Self {
        Self::channel_message(PROGRAM_CHANGE, channel, program, NO_DATA2)
    }

    /// Pitch bend, `value` in -8192..=8191 (0 = centre). Out of range values clamp.
    pub fn pitch_bend(channel: u8, value: i16) -> Self {
        let raw = (value.clamp(-8192, 8191) + 8192) as u16;
        Self::channel_message(PITCH_BEND, channel, (raw & 0x7F) as u8, (raw >> 7) as u8)
    }

    const fn channel_message(kind: u8, channel: u8, data1: u8, data2: u8) -> Self {
        Self::new(kind | (channel & 0x0F), data1 & 0x7F, data2)
    }

    /// Whether `data2` goes out on the wire
    pub const fn has_data2(&self) -> bool {
        self.data2 & 0x80 == 0
    }

    /// Number of bytes transmitted: 2 or 3
    pub const fn wire_len(&self) -> usize {
        if self.has_data2() {
            3
        } else {
            2
        }
    }

    pub const fn bytes(&self) -> [u8; 3] {
        [self.status, self.data1, self.data2]
    }

    /// Bytes to transmit, in wire order
    pub fn wire_bytes(&self) -> WireBytes {
        WireBytes {
            bytes: self.bytes(),
            len: self.wire_len(),
        }
    }

    /// MIDI channel (0-15) of the status byte
    pub const fn channel(&self) -> u8 {
        self.status & 0x0F
    }

    /// Decode into a typed event, for display and diagnostics
    pub fn to_midi_event(&self) -> Option<MidiEvent> {
        let channel = self.channel();
        match self.status & 0xF0 {
            NOTE_ON => Some(MidiEvent::NoteOn {
                channel,
                key: self.data1,
                velocity: self.data2,
            }),
            NOTE_OFF => Some(MidiEvent::NoteOff {
                channel,
                key: self.data1,
                velocity: self.data2,
            }),
            CONTROL_CHANGE => Some(MidiEvent::ControlChange {
                channel,
                controller: self.data1,
                value: self.data2,
            }),
            PROGRAM_CHANGE => Some(MidiEvent::ProgramChange {
                channel,
                program: self.data1,
            }),
            PITCH_BEND => {
                let raw = ((self.data2 as u16 & 0x7F) << 7) | (self.data1 as u16 & 0x7F);
                Some(MidiEvent::PitchBend {
                    channel,
                    value: raw as i16 - 8192,
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_data2() {
            write!(f, "{:02X} {:02X} {:02X}", self.status, self.data1, self.data2)
        } else {
            write!(f, "{:02X} {:02X} --", self.status, self.data1)
        }
    }
}

/// The 2 or 3 bytes of a command that actually go out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireBytes {
    bytes: [u8; 3],
    len: usize,
}

impl WireBytes {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl AsRef<[u8]> for WireBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl From<MidiEvent> for Command {
    fn from(event: MidiEvent) -> Self {
        match event {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => Command::note_on(channel, key, velocity),
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => Command::note_off(channel, key, velocity),
            MidiEvent::ControlChange {
                channel,
                controller,
                value,
            } => Command::control_change(channel, controller, value),
            MidiEvent::PitchBend { channel, value } => Command::pitch_bend(channel, value),
            MidiEvent::ProgramChange { channel, program } => {
                Command::program_change(channel, program)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_is_three_bytes() {
        let cmd = Command::note_on(2, 60, 100);
        assert_eq!(cmd.bytes(), [0x92, 60, 100]);
        assert_eq!(cmd.wire_bytes().as_slice(), &[0x92, 60, 100]);
    }

    #[test]
    fn test_high_bit_suppresses_third_byte() {
        let cmd = Command::new(0xC0, 5, 0x80);
        assert_eq!(cmd.wire_len(), 2);
        assert_eq!(cmd.wire_bytes().as_slice(), &[0xC0, 5]);

        // any high-bit value is the marker, not just 0x80
        let cmd = Command::new(0xD0, 0x40, 0xFF);
        assert_eq!(cmd.wire_bytes().as_slice(), &[0xD0, 0x40]);
    }

    #[test]
    fn test_program_change_uses_marker() {
        let cmd = Command::program_change(0, 12);
        assert!(!cmd.has_data2());
        assert_eq!(cmd.wire_bytes().as_slice(), &[0xC0, 12]);
    }

    #[test]
    fn test_channel_and_data_are_masked() {
        let cmd = Command::note_on(0x1F, 0xFF, 0xFF);
        assert_eq!(cmd.status, 0x9F);
        assert_eq!(cmd.data1, 0x7F);
        assert_eq!(cmd.data2, 0x7F);
        assert_eq!(cmd.channel(), 15);
    }

    #[test]
    fn test_pitch_bend_split() {
        assert_eq!(Command::pitch_bend(0, 0).bytes(), [0xE0, 0x00, 0x40]);
        assert_eq!(Command::pitch_bend(0, -8192).bytes(), [0xE0, 0x00, 0x00]);
        assert_eq!(Command::pitch_bend(0, 8191).bytes(), [0xE0, 0x7F, 0x7F]);
        assert_eq!(Command::pitch_bend(0, i16::MAX).bytes(), [0xE0, 0x7F, 0x7F]);
    }

    #[test]
    fn test_decode_matches_constructors() {
        let events = [
            MidiEvent::NoteOn {
                channel: 3,
                key: 64,
                velocity: 90,
            },
            MidiEvent::NoteOff {
                channel: 3,
                key: 64,
                velocity: 0,
            },
            MidiEvent::ControlChange {
                channel: 9,
                controller: 7,
                value: 127,
            },
            MidiEvent::PitchBend {
                channel: 1,
                value: -300,
            },
            MidiEvent::ProgramChange {
                channel: 0,
                program: 42,
            },
        ];
        for event in events {
            assert_eq!(Command::from(event).to_midi_event(), Some(event));
        }
    }

    #[test]
    fn test_non_channel_status_does_not_decode() {
        assert_eq!(Command::new(0xF8, 0, NO_DATA2).to_midi_event(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::note_on(0, 0x3C, 0x64).to_string(), "90 3C 64");
        assert_eq!(Command::program_change(1, 0x10).to_string(), "C1 10 --");
    }
}
