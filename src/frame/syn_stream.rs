//! SYN_STREAM frame.
//!
//! ```text
//! +------------------------------------+
//! |1|   version     |          1       |
//! +------------------------------------+
//! |  Flags (8)  |   Length (24 bits)   |
//! +------------------------------------+
//! |X|          Stream-ID (31bits)      |
//! +------------------------------------+
//! |X| Associated-To-Stream-ID (31bits) |
//! +------------------------------------+
//! | Pri|Unused | Slot |                |
//! +-------------------+                |
//! |        Compressed header block     |
//! +------------------------------------+
//! ```

use std::fmt;
use std::io::{Read, Write};

use super::block::{HeaderBlock, read_header_frame};
use super::dump;
use super::error::Error;
use super::types::{Flags, FrameType, StreamId};
use super::validate::{check_flags, check_stream_id, check_stream_id_range, write_control};
use super::{HEADER_SIZE, VERSION};
use crate::compression::{Compressor, Decompressor, Header};
use crate::wire::{read_u32, write_u32};

const FIXED_LEN: usize = 10;

/// SYN_STREAM frame (type=1): opens a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynStreamFrame {
    pub flags: Flags,
    pub stream_id: StreamId,
    /// Stream this one is associated with, 0 if none.
    pub assoc_stream_id: StreamId,
    /// 0 is the highest priority, 7 the lowest.
    pub priority: u8,
    /// Credential slot, 0 if none.
    pub slot: u8,
    pub block: HeaderBlock,
}

impl SynStreamFrame {
    pub const LEGAL_FLAGS: Flags = Flags(Flags::FIN.0 | Flags::UNIDIRECTIONAL.0);

    pub const LOWEST_PRIORITY: u8 = 7;

    pub fn new(stream_id: StreamId, flags: Flags, header: Header) -> Self {
        Self {
            flags,
            stream_id,
            block: HeaderBlock::Decoded(header),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_assoc_stream_id(mut self, assoc: StreamId) -> Self {
        self.assoc_stream_id = assoc;
        self
    }

    pub fn name(&self) -> &'static str {
        "SYN_STREAM"
    }

    pub fn header(&self) -> Option<&Header> {
        self.block.header()
    }

    pub fn compress<C: Compressor + ?Sized>(&mut self, compressor: &mut C) -> Result<(), Error> {
        self.block.compress(compressor)
    }

    pub fn decompress<D: Decompressor + ?Sized>(
        &mut self,
        decompressor: &mut D,
    ) -> Result<(), Error> {
        self.block.decompress(decompressor)
    }

    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let raw = read_header_frame::<_, FIXED_LEN>(
            reader,
            FrameType::SynStream,
            Self::LEGAL_FLAGS,
        )?;

        self.flags = raw.header.flags;
        self.stream_id = StreamId(read_u32(&raw.fields[0..4]));
        self.assoc_stream_id = StreamId(read_u32(&raw.fields[4..8]));
        self.priority = raw.fields[8] >> 5;
        self.slot = raw.fields[9];
        self.block = HeaderBlock::Encoded(raw.block);

        if let Some(e) = raw.rejected {
            return Err(e);
        }
        check_stream_id(self.stream_id)?;
        check_stream_id_range(self.assoc_stream_id)?;

        Ok(HEADER_SIZE + raw.header.length)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        let raw = self.block.encoded().ok_or(Error::HeadersNotWritten)?;
        check_stream_id(self.stream_id)?;
        check_stream_id_range(self.assoc_stream_id)?;
        check_flags(self.flags, Self::LEGAL_FLAGS)?;
        if self.priority > Self::LOWEST_PRIORITY {
            return Err(Error::InvalidField {
                field: "priority",
                value: self.priority as u32,
                mask: Self::LOWEST_PRIORITY as u32,
            });
        }

        let mut fields = [0u8; FIXED_LEN];
        write_u32(&mut fields[0..4], self.stream_id.value());
        write_u32(&mut fields[4..8], self.assoc_stream_id.value());
        fields[8] = self.priority << 5;
        fields[9] = self.slot;

        write_control(writer, FrameType::SynStream, self.flags, &fields, raw)
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>, verbose: bool) -> fmt::Result {
        let known = [
            (Flags::FIN, "FLAG_FIN"),
            (Flags::UNIDIRECTIONAL, "FLAG_UNIDIRECTIONAL"),
        ];
        dump::open(f, self.name())?;
        dump::field(f, "Version", VERSION)?;
        dump::field(f, "Flags", dump::flag_names(self.flags, &known))?;
        dump::field(f, "Stream ID", self.stream_id)?;
        dump::field(f, "Associated Stream ID", self.assoc_stream_id)?;
        dump::field(f, "Priority", self.priority)?;
        dump::field(f, "Slot", self.slot)?;
        dump::block(f, &self.block, verbose)?;
        dump::close(f)
    }
}
