//! SYN_REPLY frame.
//!
//! ```text
//! +------------------------------------+
//! |1|   version     |          2       |
//! +------------------------------------+
//! |  Flags (8)  |   Length (24 bits)   |
//! +------------------------------------+
//! |X|          Stream-ID (31bits)      |
//! +------------------------------------+
//! | Number of Name/Value pairs (int32) |   <+
//! +------------------------------------+    |
//! |     Length of name (int32)         |    | Compressed header block
//! +------------------------------------+    |
//! |            (repeats)               |   <+
//! ```

use std::fmt;
use std::io::{Read, Write};

use super::block::{HeaderBlock, read_header_frame};
use super::dump;
use super::error::Error;
use super::types::{Flags, FrameType, StreamId};
use super::validate::{check_flags, check_stream_id, write_control};
use super::{HEADER_SIZE, VERSION};
use crate::compression::{Compressor, Decompressor, Header};
use crate::wire::{read_u32, write_u32};

const FIXED_LEN: usize = 4;

/// SYN_REPLY frame (type=2): the recipient's acceptance of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynReplyFrame {
    pub flags: Flags,
    pub stream_id: StreamId,
    pub block: HeaderBlock,
}

impl SynReplyFrame {
    pub const LEGAL_FLAGS: Flags = Flags::FIN;

    pub fn new(stream_id: StreamId, flags: Flags, header: Header) -> Self {
        Self {
            flags,
            stream_id,
            block: HeaderBlock::Decoded(header),
        }
    }

    pub fn name(&self) -> &'static str {
        "SYN_REPLY"
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

    /// Parse a SYN_REPLY frame, leaving its header block compressed.
    ///
    /// Flag, length and stream id errors are reported only after `self` has
    /// been filled in.
    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let raw = read_header_frame::<_, FIXED_LEN>(
            reader,
            FrameType::SynReply,
            Self::LEGAL_FLAGS,
        )?;

        self.flags = raw.header.flags;
        self.stream_id = StreamId(read_u32(&raw.fields));
        self.block = HeaderBlock::Encoded(raw.block);

        if let Some(e) = raw.rejected {
            return Err(e);
        }
        check_stream_id(self.stream_id)?;

        Ok(HEADER_SIZE + raw.header.length)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        let raw = self.block.encoded().ok_or(Error::HeadersNotWritten)?;
        check_stream_id(self.stream_id)?;
        check_flags(self.flags, Self::LEGAL_FLAGS)?;

        let mut fields = [0u8; FIXED_LEN];
        write_u32(&mut fields, self.stream_id.value());

        write_control(writer, FrameType::SynReply, self.flags, &fields, raw)
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>, verbose: bool) -> fmt::Result {
        dump::open(f, self.name())?;
        dump::field(f, "Version", VERSION)?;
        dump::field(f, "Flags", dump::flag_names(self.flags, &[(Flags::FIN, "FLAG_FIN")]))?;
        dump::field(f, "Stream ID", self.stream_id)?;
        dump::block(f, &self.block, verbose)?;
        dump::close(f)
    }
}
