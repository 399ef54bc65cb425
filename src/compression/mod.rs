//! Header block compression.
//!
//! SPDY header blocks are serialized as a list of name/value pairs and then
//! compressed with a zlib stream that lives as long as the connection. Each
//! direction of a connection has its own stream, and every header block must
//! pass through it in exactly the order the frames cross the wire:
//!
//! ```text
//! sender:   HEADERS#1 -> compress -> wire -> HEADERS#2 -> compress -> wire
//! receiver: wire -> decompress (HEADERS#1) -> wire -> decompress (HEADERS#2)
//! ```
//!
//! Processing blocks out of order desynchronizes the dictionary and every
//! later block on that connection becomes undecodable, so any
//! [`CompressionError`] is fatal to the connection.

mod block;
mod dictionary;
mod header;
mod zlib;

use bytes::Bytes;

pub use block::{decode_block, encode_block};
pub use dictionary::dictionary;
pub use header::Header;
pub use zlib::{ZlibCompressor, ZlibDecompressor};

/// Default compression level for outbound header blocks.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Default upper bound on a decompressed header block (256 KiB).
pub const DEFAULT_MAX_HEADER_BLOCK_SIZE: usize = 256 * 1024;

/// Outbound half of a connection's header compression context.
///
/// Implementations carry state across calls. Callers must invoke
/// [`compress`](Compressor::compress) in transmission order and never
/// concurrently.
pub trait Compressor {
    fn compress(&mut self, header: &Header) -> Result<Bytes, CompressionError>;
}

/// Inbound half of a connection's header compression context.
///
/// Callers must invoke [`decompress`](Decompressor::decompress) in arrival
/// order and never concurrently.
pub trait Decompressor {
    fn decompress(&mut self, block: &[u8]) -> Result<Header, CompressionError>;
}

impl<C: Compressor + ?Sized> Compressor for &mut C {
    fn compress(&mut self, header: &Header) -> Result<Bytes, CompressionError> {
        (**self).compress(header)
    }
}

impl<D: Decompressor + ?Sized> Decompressor for &mut D {
    fn decompress(&mut self, block: &[u8]) -> Result<Header, CompressionError> {
        (**self).decompress(block)
    }
}

impl<C: Compressor + ?Sized> Compressor for Box<C> {
    fn compress(&mut self, header: &Header) -> Result<Bytes, CompressionError> {
        (**self).compress(header)
    }
}

impl<D: Decompressor + ?Sized> Decompressor for Box<D> {
    fn decompress(&mut self, block: &[u8]) -> Result<Header, CompressionError> {
        (**self).decompress(block)
    }
}

/// Header compression errors.
///
/// Every variant leaves the connection's compression state unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompressionError {
    /// The zlib deflate stream reported an error.
    #[error("header compression failed: {0}")]
    Deflate(String),
    /// The zlib inflate stream reported an error.
    #[error("header decompression failed: {0}")]
    Inflate(String),
    /// The zlib stream asked for a dictionary other than the SPDY/3 one.
    #[error("unexpected zlib dictionary id {0:#010x}")]
    UnknownDictionary(u32),
    /// The serialized block ended before a declared field.
    #[error("truncated header block")]
    Truncated,
    /// Bytes remained after the declared number of pairs.
    #[error("{0} trailing bytes after header block")]
    TrailingBytes(usize),
    /// A header name was empty.
    #[error("empty header name")]
    EmptyName,
    /// A header name contained uppercase characters.
    #[error("uppercase header name {0:?}")]
    UppercaseName(String),
    /// The same header name appeared twice in one block.
    #[error("duplicate header name {0:?}")]
    DuplicateName(String),
    /// A NUL-separated value list contained an empty entry.
    #[error("empty value in header {0:?}")]
    EmptyValue(String),
    /// A value to be sent contained the NUL separator.
    #[error("NUL byte inside a value of header {0:?}")]
    NulInValue(String),
    /// A name or value was not valid UTF-8.
    #[error("header block is not valid UTF-8")]
    InvalidUtf8,
    /// The block exceeded the configured size limit.
    #[error("header block of {size} bytes exceeds maximum {max}")]
    TooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_error_display() {
        assert_eq!(
            CompressionError::TooLarge { size: 10, max: 5 }.to_string(),
            "header block of 10 bytes exceeds maximum 5"
        );
        assert_eq!(
            CompressionError::DuplicateName("host".into()).to_string(),
            "duplicate header name \"host\""
        );
        assert_eq!(
            CompressionError::UnknownDictionary(0x1234).to_string(),
            "unexpected zlib dictionary id 0x00001234"
        );
    }

    #[test]
    fn test_context_through_mut_ref() {
        fn roundtrip<C: Compressor, D: Decompressor>(mut c: C, mut d: D) -> Header {
            let header: Header = [(":method", "GET")].into_iter().collect();
            let blob = c.compress(&header).unwrap();
            d.decompress(&blob).unwrap()
        }

        let mut c = ZlibCompressor::new();
        let mut d = ZlibDecompressor::new();
        let header = roundtrip(&mut c, &mut d);
        assert_eq!(header.get(":method"), Some("GET"));
    }
}
