//! PING frame.
//!
//! ```text
//! +----------------------------------+
//! |1|   version    |         6       |
//! +----------------------------------+
//! | 0 (flags) |     4 (length)       |
//! +----------------------------------|
//! |            32-bit ID             |
//! +----------------------------------+
//! ```

use std::fmt;
use std::io::{Read, Write};

use super::dump;
use super::error::Error;
use super::types::{Flags, FrameType};
use super::validate::{expect_length, read_control_header, write_control};
use super::HEADER_SIZE;
use crate::wire::{read_exact_into, read_u32, write_u32};

const PAYLOAD_LEN: usize = 4;

/// PING frame (type=6). Clients send odd ids, servers even ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingFrame {
    pub id: u32,
}

impl PingFrame {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn name(&self) -> &'static str {
        "PING"
    }

    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let header = read_control_header(reader, FrameType::Ping, Flags::NONE)?;
        expect_length(reader, &header, PAYLOAD_LEN)?;

        let mut buf = [0u8; PAYLOAD_LEN];
        read_exact_into(reader, &mut buf)?;
        self.id = read_u32(&buf);

        Ok(HEADER_SIZE + PAYLOAD_LEN)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        let mut fields = [0u8; PAYLOAD_LEN];
        write_u32(&mut fields, self.id);
        write_control(writer, FrameType::Ping, Flags::NONE, &fields, &[])
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump::open(f, self.name())?;
        dump::field(f, "Ping ID", self.id)?;
        dump::close(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let frame = PingFrame::new(0xDEAD_BEEF);
        let mut out = Vec::new();
        assert_eq!(frame.write_to(&mut out).unwrap(), 12);
        assert_eq!(&out[8..], &[0xDE, 0xAD, 0xBE, 0xEF]);

        let mut parsed = PingFrame::default();
        let mut src: &[u8] = &out;
        assert_eq!(parsed.read_from(&mut src).unwrap(), 12);
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_wrong_length() {
        let bytes = [
            0x80, 0x03, 0x00, 0x06, // Control, version 3, type PING
            0x00, 0x00, 0x00, 0x08, // Flags: none, Length: 8
            0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02,
        ];
        let mut src: &[u8] = &bytes;
        assert!(matches!(
            PingFrame::default().read_from(&mut src),
            Err(Error::IncorrectDataLength {
                got: 8,
                expected: 4
            })
        ));
        assert!(src.is_empty());
    }
}
