#[cfg(feature = "rtrb")]
use rtrb::Producer;
use thiserror::Error;

use super::midi::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransmitError {
    /// Not enough room for the whole command; nothing was written
    #[error("serial buffer full: need {needed} bytes, {available} available")]
    BufferFull { needed: usize, available: usize },
}

/// Outbound serial channel, one byte at a time
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransmitError>;

    /// Bytes that can be written right now without failing
    fn available(&self) -> usize;
}

/// Write a command in wire order.
///
/// Checks for room first, so the receiver never sees half a message.
pub fn send_command<S: ByteSink + ?Sized>(
    sink: &mut S,
    command: Command,
) -> Result<usize, TransmitError> {
    let wire = command.wire_bytes();
    let bytes = wire.as_slice();

    let available = sink.available();
    if available < bytes.len() {
        return Err(TransmitError::BufferFull {
            needed: bytes.len(),
            available,
        });
    }

    for &byte in bytes {
        sink.write_byte(byte)?;
    }
    Ok(bytes.len())
}

impl ByteSink for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransmitError> {
        self.push(byte);
        Ok(())
    }

    fn available(&self) -> usize {
        usize::MAX
    }
}

#[cfg(feature = "rtrb")]
impl ByteSink for Producer<u8> {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransmitError> {
        self.push(byte).map_err(|_| TransmitError::BufferFull {
            needed: 1,
            available: 0,
        })
    }

    fn available(&self) -> usize {
        self.slots()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransmitError> {
        (**self).write_byte(byte)
    }

    fn available(&self) -> usize {
        (**self).available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_receives_wire_bytes() {
        let mut out = Vec::new();
        assert_eq!(send_command(&mut out, Command::note_on(0, 60, 100)), Ok(3));
        assert_eq!(send_command(&mut out, Command::program_change(0, 4)), Ok(2));
        assert_eq!(out, vec![0x90, 60, 100, 0xC0, 4]);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_ring_buffer_never_gets_partial_command() {
        let (mut tx, mut rx) = rtrb::RingBuffer::<u8>::new(4);

        send_command(&mut tx, Command::note_on(0, 60, 100)).unwrap();
        let err = send_command(&mut tx, Command::note_off(0, 60, 0)).unwrap_err();
        assert_eq!(
            err,
            TransmitError::BufferFull {
                needed: 3,
                available: 1
            }
        );

        let received: Vec<u8> = std::iter::from_fn(|| rx.pop().ok()).collect();
        assert_eq!(received, vec![0x90, 60, 100]);
    }
}
