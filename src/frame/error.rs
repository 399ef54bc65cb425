//! SPDY frame errors.

use std::io;

use super::types::FrameKind;
use crate::compression::CompressionError;

/// Frame parsing/encoding errors.
///
/// Structural and semantic errors concern a single frame; the caller may
/// reset the offending stream and carry on. Errors for which
/// [`Error::is_connection_fatal`] returns `true` leave the byte stream or the
/// compression state in an unknown position and the connection must be torn
/// down.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stream ended before the requested number of bytes arrived.
    #[error("short read: expected {expected} bytes, got {read}")]
    ShortRead { expected: usize, read: usize },
    /// The sink stopped accepting bytes partway through a write.
    #[error("short write: wrote {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },
    /// The stream ended cleanly at a frame boundary.
    #[error("connection closed")]
    Closed,
    /// Transport error, propagated unchanged.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The frame is not of the kind the parser expected.
    #[error("incorrect frame: got {got}, expected {expected}")]
    IncorrectFrame { got: FrameKind, expected: FrameKind },
    /// A field holds bits outside its legal mask or an illegal value.
    #[error("invalid {field}: {value:#x} (legal mask {mask:#x})")]
    InvalidField {
        field: &'static str,
        value: u32,
        mask: u32,
    },
    /// A control frame carried a protocol version other than 3.
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u16),
    /// The declared length exceeds the maximum frame size.
    #[error("frame length {length} exceeds maximum {max}")]
    FrameTooLarge { length: usize, max: usize },
    /// The declared length does not fit the frame type.
    #[error("incorrect data length: got {got}, expected {expected}")]
    IncorrectDataLength { got: usize, expected: usize },
    /// A stream identifier had its reserved high bit set.
    #[error("stream id too large")]
    StreamIdTooLarge,
    /// A stream-scoped frame carried stream id 0.
    #[error("stream id is zero")]
    StreamIdIsZero,
    /// A non-terminal DATA frame had no payload.
    #[error("empty frame: DATA without payload must carry FLAG_FIN")]
    EmptyData,
    /// A DATA payload is too large to frame.
    #[error("oversized frame: {length} bytes of data exceeds maximum {max}")]
    DataTooLarge { length: usize, max: usize },
    /// A header-bearing frame was written before its header block was compressed.
    #[error("headers not written: compress must run before write")]
    HeadersNotWritten,
    /// The dispatcher met a control frame type it does not know.
    #[error("unknown frame type {0:#06x}")]
    UnknownFrameType(u16),
    /// The header compression context failed.
    #[error(transparent)]
    Compression(#[from] CompressionError),
    /// A previous connection-fatal error closed this reader or writer.
    #[error("connection unusable after a fatal error")]
    Poisoned,
}

impl Error {
    /// Whether this error invalidates the whole connection rather than one frame.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            Error::ShortRead { .. }
                | Error::ShortWrite { .. }
                | Error::Closed
                | Error::Io(_)
                | Error::UnknownFrameType(_)
                | Error::Compression(_)
                | Error::Poisoned
        )
    }
}
