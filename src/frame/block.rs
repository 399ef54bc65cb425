//! Header block carried by SYN_STREAM, SYN_REPLY and HEADERS.

use std::io::Read;

use bytes::Bytes;

use super::HEADER_SIZE;
use super::error::Error;
use super::types::{Flags, FrameType};
use super::validate::{
    ControlHeader, check_control_prefix, check_flags, check_length, expect_min_length,
    skip_payload,
};
use crate::compression::{Compressor, Decompressor, Header};
use crate::wire::{read_exact_into, read_exactly, read_u24};

/// A frame's header block, in exactly one of its two representations.
///
/// Frames built for sending start out `Decoded`; [`compress`](Self::compress)
/// turns them `Encoded`. Frames read off the wire start out `Encoded`;
/// [`decompress`](Self::decompress) turns them `Decoded`. Both transitions
/// are one-way and repeated calls are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderBlock {
    /// Usable header mapping.
    Decoded(Header),
    /// Compressed bytes as they appear on the wire.
    Encoded(Bytes),
}

impl Default for HeaderBlock {
    fn default() -> Self {
        HeaderBlock::Decoded(Header::new())
    }
}

impl HeaderBlock {
    /// The header mapping, if decompressed.
    pub fn header(&self) -> Option<&Header> {
        match self {
            HeaderBlock::Decoded(header) => Some(header),
            HeaderBlock::Encoded(_) => None,
        }
    }

    /// Mutable access to the header mapping, if decompressed.
    pub fn header_mut(&mut self) -> Option<&mut Header> {
        match self {
            HeaderBlock::Decoded(header) => Some(header),
            HeaderBlock::Encoded(_) => None,
        }
    }

    /// The compressed bytes, if compressed.
    pub fn encoded(&self) -> Option<&Bytes> {
        match self {
            HeaderBlock::Decoded(_) => None,
            HeaderBlock::Encoded(raw) => Some(raw),
        }
    }

    pub fn is_encoded(&self) -> bool {
        matches!(self, HeaderBlock::Encoded(_))
    }

    /// Run the mapping through the outbound context.
    pub fn compress<C: Compressor + ?Sized>(&mut self, compressor: &mut C) -> Result<(), Error> {
        if let HeaderBlock::Decoded(header) = self {
            let raw = compressor.compress(header)?;
            *self = HeaderBlock::Encoded(raw);
        }
        Ok(())
    }

    /// Run the compressed bytes through the inbound context.
    pub fn decompress<D: Decompressor + ?Sized>(
        &mut self,
        decompressor: &mut D,
    ) -> Result<(), Error> {
        if let HeaderBlock::Encoded(raw) = self {
            let header = decompressor.decompress(raw)?;
            *self = HeaderBlock::Decoded(header);
        }
        Ok(())
    }
}

/// A header-bearing frame as read, before its fields are interpreted.
pub(crate) struct RawHeaderFrame<const N: usize> {
    pub header: ControlHeader,
    pub fields: [u8; N],
    pub block: Bytes,
    /// Set when the frame was read in full but its flags or length are
    /// not acceptable.
    pub rejected: Option<Error>,
}

/// Read a control frame whose payload is `N` bytes of fixed fields followed
/// by a compressed header block.
///
/// Once the prefix identifies a SPDY/3 frame of `frame_type`, the block has
/// been through the peer's compression context and is always read out, even
/// if the flags or length then reject the frame. Only a bad prefix or a
/// payload too short for the fixed fields drains the frame without a block.
pub(crate) fn read_header_frame<R: Read + ?Sized, const N: usize>(
    reader: &mut R,
    frame_type: FrameType,
    legal: Flags,
) -> Result<RawHeaderFrame<N>, Error> {
    let mut buf = [0u8; HEADER_SIZE];
    read_exact_into(reader, &mut buf)?;

    let header = ControlHeader {
        flags: Flags(buf[4]),
        length: read_u24(&buf[5..8]) as usize,
    };
    if let Err(e) = check_control_prefix(&buf[..5], frame_type, header.flags) {
        return Err(skip_payload(reader, header.length, e));
    }
    expect_min_length(reader, &header, N)?;

    let mut fields = [0u8; N];
    read_exact_into(reader, &mut fields)?;
    let block = Bytes::from(read_exactly(reader, header.length - N)?);

    let rejected = check_flags(header.flags, legal)
        .and_then(|_| check_length(header.length))
        .err();

    Ok(RawHeaderFrame {
        header,
        fields,
        block,
        rejected,
    })
}
