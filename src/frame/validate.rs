//! Rules shared by every frame parser, plus the common control-frame header.
//!
//! Control frames share an 8-byte prefix:
//! ```text
//! +----------------------------------+
//! |C| Version(15bits) | Type(16bits) |
//! +----------------------------------+
//! | Flags (8)  |  Length (24 bits)   |
//! +----------------------------------+
//! |               Data               |
//! +----------------------------------+
//! ```
//!
//! When a frame is rejected after its header has been read, the declared
//! payload is drained so the stream stays positioned on a frame boundary.

use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};

use super::error::Error;
use super::types::{Flags, FrameKind, FrameType, StreamId};
use super::{CONTROL_BIT, HEADER_SIZE, MAX_FRAME_SIZE, VERSION};
use crate::wire::{read_exact_into, read_u24, write_exactly};

/// Largest length a frame header may declare.
pub(crate) const MAX_LENGTH: usize = MAX_FRAME_SIZE - HEADER_SIZE;

/// Validated control-frame header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ControlHeader {
    pub flags: Flags,
    pub length: usize,
}

/// Check the first five bytes of a control frame.
///
/// Verifies the control bit, the protocol version, that the type code is
/// `expected`, and that no flag outside `legal` is set.
pub fn check_control_prefix(prefix: &[u8], expected: FrameType, legal: Flags) -> Result<(), Error> {
    if prefix.len() < 5 {
        return Err(Error::ShortRead {
            expected: 5,
            read: prefix.len(),
        });
    }

    let code = u16::from_be_bytes([prefix[2], prefix[3]]);

    if prefix[0] & CONTROL_BIT == 0 {
        return Err(Error::IncorrectFrame {
            got: FrameKind::Data,
            expected: expected.into(),
        });
    }

    let version = u16::from_be_bytes([prefix[0] & !CONTROL_BIT, prefix[1]]);
    if version != VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    if code != expected.code() {
        return Err(Error::IncorrectFrame {
            got: FrameKind::Control(code),
            expected: expected.into(),
        });
    }

    check_flags(Flags(prefix[4]), legal)
}

/// Reject flag bits outside `legal`.
pub fn check_flags(flags: Flags, legal: Flags) -> Result<(), Error> {
    if flags.illegal_bits(legal) != 0 {
        return Err(Error::InvalidField {
            field: "flags",
            value: flags.bits() as u32,
            mask: legal.bits() as u32,
        });
    }
    Ok(())
}

/// Reject a declared length above the maximum frame size.
pub fn check_length(length: usize) -> Result<(), Error> {
    if length > MAX_LENGTH {
        return Err(Error::FrameTooLarge {
            length,
            max: MAX_LENGTH,
        });
    }
    Ok(())
}

/// Stream ids on stream-scoped control frames must be in range and non-zero.
pub fn check_stream_id(id: StreamId) -> Result<(), Error> {
    if !id.is_valid() {
        return Err(Error::StreamIdTooLarge);
    }
    if id.is_zero() {
        return Err(Error::StreamIdIsZero);
    }
    Ok(())
}

/// Ids that may legitimately be zero still must not set the reserved bit.
pub fn check_stream_id_range(id: StreamId) -> Result<(), Error> {
    if !id.is_valid() {
        return Err(Error::StreamIdTooLarge);
    }
    Ok(())
}

/// Discard `len` bytes of an unwanted payload, then hand back `err`.
///
/// If the stream fails while draining, that failure is returned instead.
pub(crate) fn skip_payload<R: Read + ?Sized>(reader: &mut R, len: usize, err: Error) -> Error {
    match io::copy(&mut (&mut *reader).take(len as u64), &mut io::sink()) {
        Ok(n) if n == len as u64 => err,
        Ok(n) => Error::ShortRead {
            expected: len,
            read: n as usize,
        },
        Err(e) => Error::Io(e),
    }
}

/// Read and validate the common header of a control frame of type `expected`.
pub(crate) fn read_control_header<R: Read + ?Sized>(
    reader: &mut R,
    expected: FrameType,
    legal: Flags,
) -> Result<ControlHeader, Error> {
    let mut buf = [0u8; HEADER_SIZE];
    read_exact_into(reader, &mut buf)?;

    let length = read_u24(&buf[5..8]) as usize;
    let checked = check_control_prefix(&buf[..5], expected, legal).and_then(|_| check_length(length));
    if let Err(e) = checked {
        return Err(skip_payload(reader, length, e));
    }

    Ok(ControlHeader {
        flags: Flags(buf[4]),
        length,
    })
}

/// Reject a control frame whose length is not exactly `expected`.
pub(crate) fn expect_length<R: Read + ?Sized>(
    reader: &mut R,
    header: &ControlHeader,
    expected: usize,
) -> Result<(), Error> {
    if header.length != expected {
        return Err(skip_payload(
            reader,
            header.length,
            Error::IncorrectDataLength {
                got: header.length,
                expected,
            },
        ));
    }
    Ok(())
}

/// Reject a control frame whose length is below `minimum`.
pub(crate) fn expect_min_length<R: Read + ?Sized>(
    reader: &mut R,
    header: &ControlHeader,
    minimum: usize,
) -> Result<(), Error> {
    if header.length < minimum {
        return Err(skip_payload(
            reader,
            header.length,
            Error::IncorrectDataLength {
                got: header.length,
                expected: minimum,
            },
        ));
    }
    Ok(())
}

/// Serialize a control frame: common header, fixed `fields`, then `payload`.
///
/// Returns the number of bytes written.
pub(crate) fn write_control<W: Write + ?Sized>(
    writer: &mut W,
    frame_type: FrameType,
    flags: Flags,
    fields: &[u8],
    payload: &[u8],
) -> Result<usize, Error> {
    let length = fields.len() + payload.len();
    check_length(length)?;

    let mut head = BytesMut::with_capacity(HEADER_SIZE + fields.len());

    // Control bit and version
    head.put_u16((CONTROL_BIT as u16) << 8 | VERSION);

    // Type
    head.put_u16(frame_type.code());

    // Flags
    head.put_u8(flags.bits());

    // Length (24 bits, big-endian)
    head.put_u8((length >> 16) as u8);
    head.put_u8((length >> 8) as u8);
    head.put_u8(length as u8);

    head.extend_from_slice(fields);

    write_exactly(writer, &head)?;
    write_exactly(writer, payload)?;

    Ok(HEADER_SIZE + length)
}
