//! DATA frame.
//!
//! ```text
//! +----------------------------------+
//! |C|       Stream-ID (31bits)       |
//! +----------------------------------+
//! | Flags (8)  |  Length (24 bits)   |
//! +----------------------------------+
//! |               Data               |
//! +----------------------------------+
//! ```

use std::fmt;
use std::io::{Read, Write};

use bytes::Bytes;

use super::dump;
use super::error::Error;
use super::types::{Flags, FrameKind, StreamId};
use super::validate::{check_flags, check_length, skip_payload};
use super::{CONTROL_BIT, HEADER_SIZE, MAX_DATA_SIZE};
use crate::wire::{
    read_exact_into, read_exactly, read_u24, read_u32, write_exactly, write_u24, write_u32,
};

/// DATA frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFrame {
    pub stream_id: StreamId,
    pub flags: Flags,
    pub data: Bytes,
}

impl DataFrame {
    /// Only FIN may be set on DATA.
    pub const LEGAL_FLAGS: Flags = Flags::FIN;

    pub fn new(stream_id: StreamId, flags: Flags, data: impl Into<Bytes>) -> Self {
        Self {
            stream_id,
            flags,
            data: data.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        "DATA"
    }

    /// Parse a DATA frame from `reader`, returning the bytes consumed.
    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let mut buf = [0u8; HEADER_SIZE];
        read_exact_into(reader, &mut buf)?;

        let length = read_u24(&buf[5..8]) as usize;

        // Check it's a data frame.
        if buf[0] & CONTROL_BIT != 0 {
            let code = u16::from_be_bytes([buf[2], buf[3]]);
            let err = Error::IncorrectFrame {
                got: FrameKind::Control(code),
                expected: FrameKind::Data,
            };
            return Err(skip_payload(reader, length, err));
        }

        let flags = Flags(buf[4]);
        if let Err(e) = check_flags(flags, Self::LEGAL_FLAGS).and_then(|_| check_length(length)) {
            return Err(skip_payload(reader, length, e));
        }

        let data = if length == 0 {
            Bytes::new()
        } else {
            Bytes::from(read_exactly(reader, length)?)
        };

        self.stream_id = StreamId(read_u32(&buf[0..4]));
        self.flags = flags;
        self.data = data;

        Ok(HEADER_SIZE + length)
    }

    /// Serialize this frame to `writer`, returning the bytes written.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        let length = self.data.len();
        if length > MAX_DATA_SIZE {
            return Err(Error::DataTooLarge {
                length,
                max: MAX_DATA_SIZE,
            });
        }
        if length == 0 && !self.flags.fin() {
            return Err(Error::EmptyData);
        }
        // A set high bit would turn this into a control frame.
        if !self.stream_id.is_valid() {
            return Err(Error::StreamIdTooLarge);
        }
        check_flags(self.flags, Self::LEGAL_FLAGS)?;

        let mut out = [0u8; HEADER_SIZE];
        write_u32(&mut out[0..4], self.stream_id.value());
        out[4] = self.flags.bits();
        write_u24(&mut out[5..8], length as u32);

        write_exactly(writer, &out)?;
        write_exactly(writer, &self.data)?;

        Ok(HEADER_SIZE + length)
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>, verbose: bool) -> fmt::Result {
        dump::open(f, self.name())?;
        dump::field(f, "Stream ID", self.stream_id)?;
        dump::field(f, "Flags", dump::flag_names(self.flags, &[(Flags::FIN, "FLAG_FIN")]))?;
        dump::field(f, "Length", self.data.len())?;
        dump::field(f, "Data", dump::hex(&self.data, verbose))?;
        dump::close(f)
    }
}
