//! WINDOW_UPDATE frame.
//!
//! ```text
//! +----------------------------------+
//! |1|   version    |         9       |
//! +----------------------------------+
//! | 0 (flags) |     8 (length)       |
//! +----------------------------------+
//! |X|     Stream-ID (31-bits)        |
//! +----------------------------------+
//! |X|  Delta-Window-Size (31-bits)   |
//! +----------------------------------+
//! ```

use std::fmt;
use std::io::{Read, Write};

use super::dump;
use super::error::Error;
use super::types::{Flags, FrameType, StreamId};
use super::validate::{check_stream_id, expect_length, read_control_header, write_control};
use super::HEADER_SIZE;
use crate::wire::{read_exact_into, read_u32, write_u32};

const PAYLOAD_LEN: usize = 8;

/// Largest window increment.
pub const MAX_DELTA_WINDOW_SIZE: u32 = 0x7FFF_FFFF;

/// WINDOW_UPDATE frame (type=9): flow-control credit for one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    pub stream_id: StreamId,
    pub delta_window_size: u32,
}

impl WindowUpdateFrame {
    pub fn new(stream_id: StreamId, delta_window_size: u32) -> Self {
        Self {
            stream_id,
            delta_window_size,
        }
    }

    pub fn name(&self) -> &'static str {
        "WINDOW_UPDATE"
    }

    fn check_delta(&self) -> Result<(), Error> {
        if self.delta_window_size == 0 || self.delta_window_size > MAX_DELTA_WINDOW_SIZE {
            return Err(Error::InvalidField {
                field: "delta window size",
                value: self.delta_window_size,
                mask: MAX_DELTA_WINDOW_SIZE,
            });
        }
        Ok(())
    }

    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let header = read_control_header(reader, FrameType::WindowUpdate, Flags::NONE)?;
        expect_length(reader, &header, PAYLOAD_LEN)?;

        let mut buf = [0u8; PAYLOAD_LEN];
        read_exact_into(reader, &mut buf)?;

        self.stream_id = StreamId(read_u32(&buf[0..4]));
        self.delta_window_size = read_u32(&buf[4..8]);

        check_stream_id(self.stream_id)?;
        self.check_delta()?;

        Ok(HEADER_SIZE + PAYLOAD_LEN)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        check_stream_id(self.stream_id)?;
        self.check_delta()?;

        let mut fields = [0u8; PAYLOAD_LEN];
        write_u32(&mut fields[0..4], self.stream_id.value());
        write_u32(&mut fields[4..8], self.delta_window_size);

        write_control(writer, FrameType::WindowUpdate, Flags::NONE, &fields, &[])
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump::open(f, self.name())?;
        dump::field(f, "Stream ID", self.stream_id)?;
        dump::field(f, "Delta window size", self.delta_window_size)?;
        dump::close(f)
    }
}
