//! Fixed-width big-endian integers and exact-length stream I/O.
//!
//! Every multi-byte field in a SPDY frame is big-endian. Lengths are 24 bits,
//! stream identifiers and most other fields are 32 bits with a reserved high
//! bit where noted.

use std::io::{self, Read, Write};

use crate::frame::Error;

/// Decode a 24-bit big-endian integer from the first three bytes of `buf`.
#[inline]
pub fn read_u24(buf: &[u8]) -> u32 {
    ((buf[0] as u32) << 16) | ((buf[1] as u32) << 8) | (buf[2] as u32)
}

/// Encode the low 24 bits of `value` into the first three bytes of `buf`.
#[inline]
pub fn write_u24(buf: &mut [u8], value: u32) {
    buf[0] = (value >> 16) as u8;
    buf[1] = (value >> 8) as u8;
    buf[2] = value as u8;
}

/// Decode a 32-bit big-endian integer from the first four bytes of `buf`.
#[inline]
pub fn read_u32(buf: &[u8]) -> u32 {
    u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}

/// Encode `value` into the first four bytes of `buf`.
#[inline]
pub fn write_u32(buf: &mut [u8], value: u32) {
    buf[..4].copy_from_slice(&value.to_be_bytes());
}

/// Fill `buf` completely from `reader`.
///
/// Fails with [`Error::ShortRead`] if the stream ends before `buf` is full,
/// including when it ends partway through a frame. Other I/O errors are
/// propagated unchanged.
pub fn read_exact_into<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<(), Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(Error::ShortRead {
                    expected: buf.len(),
                    read: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(())
}

/// Read exactly `len` bytes from `reader` into a new buffer.
pub fn read_exactly<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; len];
    read_exact_into(reader, &mut buf)?;
    Ok(buf)
}

/// Write all of `data` to `writer`.
///
/// A writer that stops accepting bytes before `data` is exhausted yields
/// [`Error::ShortWrite`].
pub fn write_exactly<W: Write + ?Sized>(writer: &mut W, data: &[u8]) -> Result<(), Error> {
    let mut written = 0;
    while written < data.len() {
        match writer.write(&data[written..]) {
            Ok(0) => {
                return Err(Error::ShortWrite {
                    expected: data.len(),
                    written,
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(())
}
