//! SPDY/3 zlib header compression context.

use bytes::Bytes;
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use tracing::trace;

use super::block::{decode_block, encode_block};
use super::dictionary::dictionary;
use super::{
    CompressionError, Compressor, DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_HEADER_BLOCK_SIZE,
    Decompressor, Header,
};
use crate::config::CompressionConfig;

/// Minimum growth step for output buffers.
const GROW: usize = 256;

/// Outbound zlib stream for one connection.
///
/// Every header block is flushed with `Z_SYNC_FLUSH`, so the stream is never
/// finished and later blocks back-reference earlier ones.
pub struct ZlibCompressor {
    stream: Compress,
    primed: bool,
}

impl Default for ZlibCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ZlibCompressor {
    /// Create a compressor at the default level.
    pub fn new() -> Self {
        Self::with_level(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Create a compressor at `level` (0-9, clamped).
    pub fn with_level(level: u32) -> Self {
        Self {
            stream: Compress::new(Compression::new(level.min(9)), true),
            primed: false,
        }
    }

    pub fn from_config(config: &CompressionConfig) -> Self {
        Self::with_level(config.level)
    }
}

impl Compressor for ZlibCompressor {
    fn compress(&mut self, header: &Header) -> Result<Bytes, CompressionError> {
        let block = encode_block(header)?;

        if !self.primed {
            self.stream
                .set_dictionary(dictionary())
                .map_err(|e| CompressionError::Deflate(e.to_string()))?;
            self.primed = true;
        }

        let start = self.stream.total_in();
        let mut out = Vec::with_capacity(block.len() / 2 + GROW);
        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity().max(GROW));
            }
            let consumed = (self.stream.total_in() - start) as usize;
            self.stream
                .compress_vec(&block[consumed..], &mut out, FlushCompress::Sync)
                .map_err(|e| CompressionError::Deflate(e.to_string()))?;

            // The flush is complete once all input is taken and zlib left
            // spare room in the output.
            let consumed = (self.stream.total_in() - start) as usize;
            if consumed == block.len() && out.len() < out.capacity() {
                break;
            }
        }

        trace!(
            pairs = header.len(),
            raw = block.len(),
            compressed = out.len(),
            "compressed header block"
        );
        Ok(Bytes::from(out))
    }
}

/// Inbound zlib stream for one connection.
pub struct ZlibDecompressor {
    stream: Decompress,
    primed: bool,
    max_block_size: usize,
}

impl Default for ZlibDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ZlibDecompressor {
    /// Create a decompressor with the default header block limit.
    pub fn new() -> Self {
        Self::with_max_block_size(DEFAULT_MAX_HEADER_BLOCK_SIZE)
    }

    /// Create a decompressor that rejects blocks inflating past `max` bytes.
    pub fn with_max_block_size(max: usize) -> Self {
        Self {
            stream: Decompress::new(true),
            primed: false,
            max_block_size: max,
        }
    }

    pub fn from_config(config: &CompressionConfig) -> Self {
        Self::with_max_block_size(config.max_header_block_size)
    }

    fn prime(&mut self, id: u32) -> Result<(), CompressionError> {
        if self.primed {
            return Err(CompressionError::UnknownDictionary(id));
        }
        self.stream
            .set_dictionary(dictionary())
            .map_err(|_| CompressionError::UnknownDictionary(id))?;
        self.primed = true;
        Ok(())
    }

    fn inflate(&mut self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let start = self.stream.total_in();
        let capacity = (input.len() * 4).clamp(GROW, self.max_block_size.max(GROW));
        let mut out = Vec::with_capacity(capacity);

        loop {
            if out.len() == out.capacity() {
                if out.len() >= self.max_block_size {
                    return Err(CompressionError::TooLarge {
                        size: out.len(),
                        max: self.max_block_size,
                    });
                }
                out.reserve(out.capacity().max(GROW));
            }

            let consumed = (self.stream.total_in() - start) as usize;
            let produced = out.len();
            match self
                .stream
                .decompress_vec(&input[consumed..], &mut out, FlushDecompress::Sync)
            {
                Ok(Status::StreamEnd) => break,
                Ok(_) => {}
                Err(e) => match e.needs_dictionary() {
                    Some(id) => {
                        self.prime(id)?;
                        continue;
                    }
                    None => return Err(CompressionError::Inflate(e.to_string())),
                },
            }

            let now = (self.stream.total_in() - start) as usize;
            if now == input.len() && out.len() < out.capacity() {
                break;
            }
            if now == consumed && out.len() == produced && out.len() < out.capacity() {
                return Err(CompressionError::Inflate("stream stalled".to_string()));
            }
        }

        if out.len() > self.max_block_size {
            return Err(CompressionError::TooLarge {
                size: out.len(),
                max: self.max_block_size,
            });
        }
        Ok(out)
    }
}

impl Decompressor for ZlibDecompressor {
    fn decompress(&mut self, block: &[u8]) -> Result<Header, CompressionError> {
        let raw = self.inflate(block)?;
        let header = decode_block(&raw)?;
        trace!(
            pairs = header.len(),
            compressed = block.len(),
            raw = raw.len(),
            "decompressed header block"
        );
        Ok(header)
    }
}
