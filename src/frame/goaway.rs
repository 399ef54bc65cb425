//! GOAWAY frame.
//!
//! ```text
//! +----------------------------------+
//! |1|   version    |         7       |
//! +----------------------------------+
//! | 0 (flags) |     8 (length)       |
//! +----------------------------------|
//! |X|  Last-good-stream-ID (31 bits) |
//! +----------------------------------+
//! |          Status code             |
//! +----------------------------------+
//! ```

use std::fmt;
use std::io::{Read, Write};

use super::dump;
use super::error::Error;
use super::types::{Flags, FrameType, StreamId};
use super::validate::{check_stream_id_range, expect_length, read_control_header, write_control};
use super::HEADER_SIZE;
use crate::wire::{read_exact_into, read_u32, write_u32};

const PAYLOAD_LEN: usize = 8;

/// Why the session is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GoAwayStatus {
    #[default]
    Ok,
    ProtocolError,
    InternalError,
    Unknown(u32),
}

impl GoAwayStatus {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => GoAwayStatus::Ok,
            1 => GoAwayStatus::ProtocolError,
            2 => GoAwayStatus::InternalError,
            other => GoAwayStatus::Unknown(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            GoAwayStatus::Ok => 0,
            GoAwayStatus::ProtocolError => 1,
            GoAwayStatus::InternalError => 2,
            GoAwayStatus::Unknown(code) => code,
        }
    }
}

impl fmt::Display for GoAwayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoAwayStatus::Ok => f.write_str("OK"),
            GoAwayStatus::ProtocolError => f.write_str("PROTOCOL_ERROR"),
            GoAwayStatus::InternalError => f.write_str("INTERNAL_ERROR"),
            GoAwayStatus::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}

/// GOAWAY frame (type=7): the sender will accept no new streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoAwayFrame {
    /// Last stream the sender acted on; 0 if none.
    pub last_good_stream_id: StreamId,
    pub status: GoAwayStatus,
}

impl GoAwayFrame {
    pub fn new(last_good_stream_id: StreamId, status: GoAwayStatus) -> Self {
        Self {
            last_good_stream_id,
            status,
        }
    }

    pub fn name(&self) -> &'static str {
        "GOAWAY"
    }

    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let header = read_control_header(reader, FrameType::GoAway, Flags::NONE)?;
        expect_length(reader, &header, PAYLOAD_LEN)?;

        let mut buf = [0u8; PAYLOAD_LEN];
        read_exact_into(reader, &mut buf)?;

        self.last_good_stream_id = StreamId(read_u32(&buf[0..4]));
        self.status = GoAwayStatus::from_code(read_u32(&buf[4..8]));

        check_stream_id_range(self.last_good_stream_id)?;

        Ok(HEADER_SIZE + PAYLOAD_LEN)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        check_stream_id_range(self.last_good_stream_id)?;

        let mut fields = [0u8; PAYLOAD_LEN];
        write_u32(&mut fields[0..4], self.last_good_stream_id.value());
        write_u32(&mut fields[4..8], self.status.code());

        write_control(writer, FrameType::GoAway, Flags::NONE, &fields, &[])
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump::open(f, self.name())?;
        dump::field(f, "Last good stream ID", self.last_good_stream_id)?;
        dump::field(f, "Status code", self.status)?;
        dump::close(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let frame = GoAwayFrame::new(StreamId(7), GoAwayStatus::ProtocolError);
        let mut out = Vec::new();
        assert_eq!(frame.write_to(&mut out).unwrap(), 16);
        assert_eq!(
            out,
            vec![
                0x80, 0x03, 0x00, 0x07, // Control, version 3, type GOAWAY
                0x00, 0x00, 0x00, 0x08, // Flags: none, Length: 8
                0x00, 0x00, 0x00, 0x07, // Last good stream: 7
                0x00, 0x00, 0x00, 0x01, // PROTOCOL_ERROR
            ]
        );

        let mut parsed = GoAwayFrame::default();
        let mut src: &[u8] = &out;
        parsed.read_from(&mut src).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_zero_stream_allowed() {
        let frame = GoAwayFrame::new(StreamId(0), GoAwayStatus::Ok);
        let mut out = Vec::new();
        frame.write_to(&mut out).unwrap();

        let mut parsed = GoAwayFrame::default();
        let mut src: &[u8] = &out;
        parsed.read_from(&mut src).unwrap();
        assert!(parsed.last_good_stream_id.is_zero());
    }

    #[test]
    fn test_reserved_bit_rejected() {
        let bytes = [
            0x80, 0x03, 0x00, 0x07, 0x00, 0x00, 0x00, 0x08, // GOAWAY, length 8
            0x80, 0x00, 0x00, 0x01, // Reserved bit set
            0x00, 0x00, 0x00, 0x00,
        ];
        let mut src: &[u8] = &bytes;
        assert!(matches!(
            GoAwayFrame::default().read_from(&mut src),
            Err(Error::StreamIdTooLarge)
        ));
        assert!(src.is_empty());
    }

    #[test]
    fn test_unknown_status() {
        assert_eq!(GoAwayStatus::from_code(9), GoAwayStatus::Unknown(9));
        assert_eq!(GoAwayStatus::Unknown(9).code(), 9);
    }
}
