//! SPDY/3 frames and the dispatcher that reads them off a byte stream.
//!
//! Every frame starts with an 8-byte header. The top bit of the first byte
//! separates DATA frames from control frames; control frames carry a 15-bit
//! version and a 16-bit type code in their first four bytes.
//!
//! Header-bearing frames (SYN_STREAM, SYN_REPLY, HEADERS) are read with their
//! header block still compressed and written only after it has been
//! compressed. Running the connection's compression contexts in wire order is
//! the caller's job; [`crate::conn`] does it by owning both ends.
//!
//! # Example
//!
//! ```
//! use spdy::frame::{DataFrame, Flags, Frame, StreamId};
//!
//! let frame = Frame::from(DataFrame::new(StreamId(1), Flags::FIN, &b"hi"[..]));
//! let mut wire = Vec::new();
//! frame.write_to(&mut wire).unwrap();
//!
//! let parsed = Frame::read_from(&mut &wire[..]).unwrap();
//! assert_eq!(parsed, frame);
//! ```

mod block;
mod data;
mod dump;
mod error;
mod goaway;
mod headers;
mod ping;
mod rst_stream;
mod settings;
mod syn_reply;
mod syn_stream;
mod types;
mod validate;
mod window_update;

use std::fmt;
use std::io::{self, Read, Write};

use tracing::{debug, trace};

pub use block::HeaderBlock;
pub use data::DataFrame;
pub use dump::Dump;
pub use error::Error;
pub use goaway::{GoAwayFrame, GoAwayStatus};
pub use headers::HeadersFrame;
pub use ping::PingFrame;
pub use rst_stream::{RstStatus, RstStreamFrame};
pub use settings::{Setting, SettingId, SettingsFrame};
pub use syn_reply::SynReplyFrame;
pub use syn_stream::SynStreamFrame;
pub use types::{Flags, FrameKind, FrameType, StreamId};
pub use validate::{
    check_control_prefix, check_flags, check_length, check_stream_id, check_stream_id_range,
};
pub use window_update::{MAX_DELTA_WINDOW_SIZE, WindowUpdateFrame};

use crate::compression::{Compressor, Decompressor, Header};
use crate::wire::read_exact_into;

/// Protocol version carried by every control frame.
pub const VERSION: u16 = 3;

/// High bit of the first header byte: set on control frames.
pub const CONTROL_BIT: u8 = 0x80;

/// Size of the common frame header.
pub const HEADER_SIZE: usize = 8;

/// Largest frame, header included.
pub const MAX_FRAME_SIZE: usize = 0xFF_FFFF;

/// Largest DATA payload.
pub const MAX_DATA_SIZE: usize = MAX_FRAME_SIZE - HEADER_SIZE;

/// Any SPDY/3 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(DataFrame),
    SynStream(SynStreamFrame),
    SynReply(SynReplyFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
    Headers(HeadersFrame),
    WindowUpdate(WindowUpdateFrame),
}

/// A failed read. `frame` is kept when the whole frame was consumed and it
/// still holds a compressed header block, which must reach the inbound
/// context to keep it in step with the peer.
#[derive(Debug)]
pub(crate) struct ReadFailure {
    pub error: Error,
    pub frame: Option<Frame>,
}

impl From<Error> for ReadFailure {
    fn from(error: Error) -> Self {
        Self { error, frame: None }
    }
}

macro_rules! read_variant {
    ($reader:expr, $variant:ident, $ty:ty) => {{
        let mut frame = <$ty>::default();
        let result = frame.read_from($reader);
        (Frame::$variant(frame), result)
    }};
}

impl Frame {
    /// Read exactly one frame.
    ///
    /// Returns [`Error::Closed`] when the stream ends before the first byte.
    /// Header blocks are left compressed; see [`Frame::decompress`].
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Frame, Error> {
        Self::read_frame_inner(reader).map_err(|failure| failure.error)
    }

    pub(crate) fn read_frame_inner<R: Read + ?Sized>(reader: &mut R) -> Result<Frame, ReadFailure> {
        let mut first = [0u8; 1];
        loop {
            match reader.read(&mut first) {
                Ok(0) => return Err(Error::Closed.into()),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e).into()),
            }
        }

        let (frame, result) = if first[0] & CONTROL_BIT == 0 {
            let mut src = (&first[..]).chain(&mut *reader);
            read_variant!(&mut src, Data, DataFrame)
        } else {
            // Version and type code
            let mut prefix = [first[0], 0, 0, 0];
            read_exact_into(reader, &mut prefix[1..])?;

            let code = u16::from_be_bytes([prefix[2], prefix[3]]);
            let frame_type = FrameType::from_code(code).ok_or_else(|| {
                debug!(code, "unknown control frame type");
                Error::UnknownFrameType(code)
            })?;

            let mut src = (&prefix[..]).chain(&mut *reader);
            match frame_type {
                FrameType::SynStream => read_variant!(&mut src, SynStream, SynStreamFrame),
                FrameType::SynReply => read_variant!(&mut src, SynReply, SynReplyFrame),
                FrameType::RstStream => read_variant!(&mut src, RstStream, RstStreamFrame),
                FrameType::Settings => read_variant!(&mut src, Settings, SettingsFrame),
                FrameType::Ping => read_variant!(&mut src, Ping, PingFrame),
                FrameType::GoAway => read_variant!(&mut src, GoAway, GoAwayFrame),
                FrameType::Headers => read_variant!(&mut src, Headers, HeadersFrame),
                FrameType::WindowUpdate => {
                    read_variant!(&mut src, WindowUpdate, WindowUpdateFrame)
                }
            }
        };

        match result {
            Ok(length) => {
                trace!(
                    frame = frame.name(),
                    stream_id = ?frame.stream_id(),
                    length,
                    "read frame"
                );
                Ok(frame)
            }
            Err(error) => {
                debug!(frame = frame.name(), %error, "rejected frame");
                // A block that made it off the wire has advanced the peer's
                // context, whatever else is wrong with the frame.
                let keep = frame.block().is_some_and(HeaderBlock::is_encoded);
                Err(ReadFailure {
                    error,
                    frame: keep.then_some(frame),
                })
            }
        }
    }

    /// Serialize this frame, returning the number of bytes written.
    ///
    /// Header-bearing frames must have been compressed first.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        let result = match self {
            Frame::Data(f) => f.write_to(writer),
            Frame::SynStream(f) => f.write_to(writer),
            Frame::SynReply(f) => f.write_to(writer),
            Frame::RstStream(f) => f.write_to(writer),
            Frame::Settings(f) => f.write_to(writer),
            Frame::Ping(f) => f.write_to(writer),
            Frame::GoAway(f) => f.write_to(writer),
            Frame::Headers(f) => f.write_to(writer),
            Frame::WindowUpdate(f) => f.write_to(writer),
        };

        match &result {
            Ok(length) => trace!(
                frame = self.name(),
                stream_id = ?self.stream_id(),
                length,
                "wrote frame"
            ),
            Err(error) => debug!(frame = self.name(), %error, "frame not written"),
        }

        result
    }

    /// Compress the header block against the outbound context. No-op for
    /// frames without one, or whose block is already compressed.
    pub fn compress<C: Compressor + ?Sized>(&mut self, compressor: &mut C) -> Result<(), Error> {
        match self.block_mut() {
            Some(block) => block.compress(compressor),
            None => Ok(()),
        }
    }

    /// Decompress the header block against the inbound context. No-op for
    /// frames without one, or whose block is already decompressed.
    pub fn decompress<D: Decompressor + ?Sized>(
        &mut self,
        decompressor: &mut D,
    ) -> Result<(), Error> {
        match self.block_mut() {
            Some(block) => block.decompress(decompressor),
            None => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Frame::Data(f) => f.name(),
            Frame::SynStream(f) => f.name(),
            Frame::SynReply(f) => f.name(),
            Frame::RstStream(f) => f.name(),
            Frame::Settings(f) => f.name(),
            Frame::Ping(f) => f.name(),
            Frame::GoAway(f) => f.name(),
            Frame::Headers(f) => f.name(),
            Frame::WindowUpdate(f) => f.name(),
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Data(_) => FrameKind::Data,
            Frame::SynStream(_) => FrameType::SynStream.into(),
            Frame::SynReply(_) => FrameType::SynReply.into(),
            Frame::RstStream(_) => FrameType::RstStream.into(),
            Frame::Settings(_) => FrameType::Settings.into(),
            Frame::Ping(_) => FrameType::Ping.into(),
            Frame::GoAway(_) => FrameType::GoAway.into(),
            Frame::Headers(_) => FrameType::Headers.into(),
            Frame::WindowUpdate(_) => FrameType::WindowUpdate.into(),
        }
    }

    /// The stream this frame belongs to, for stream-scoped frames.
    pub fn stream_id(&self) -> Option<StreamId> {
        match self {
            Frame::Data(f) => Some(f.stream_id),
            Frame::SynStream(f) => Some(f.stream_id),
            Frame::SynReply(f) => Some(f.stream_id),
            Frame::RstStream(f) => Some(f.stream_id),
            Frame::Headers(f) => Some(f.stream_id),
            Frame::WindowUpdate(f) => Some(f.stream_id),
            Frame::Settings(_) | Frame::Ping(_) | Frame::GoAway(_) => None,
        }
    }

    pub fn flags(&self) -> Flags {
        match self {
            Frame::Data(f) => f.flags,
            Frame::SynStream(f) => f.flags,
            Frame::SynReply(f) => f.flags,
            Frame::Settings(f) => f.flags,
            Frame::Headers(f) => f.flags,
            Frame::RstStream(_) | Frame::Ping(_) | Frame::GoAway(_) | Frame::WindowUpdate(_) => {
                Flags::NONE
            }
        }
    }

    /// The header block of a SYN_STREAM, SYN_REPLY or HEADERS frame.
    pub fn block(&self) -> Option<&HeaderBlock> {
        match self {
            Frame::SynStream(f) => Some(&f.block),
            Frame::SynReply(f) => Some(&f.block),
            Frame::Headers(f) => Some(&f.block),
            _ => None,
        }
    }

    pub fn block_mut(&mut self) -> Option<&mut HeaderBlock> {
        match self {
            Frame::SynStream(f) => Some(&mut f.block),
            Frame::SynReply(f) => Some(&mut f.block),
            Frame::Headers(f) => Some(&mut f.block),
            _ => None,
        }
    }

    /// The decompressed header mapping, if any.
    pub fn header(&self) -> Option<&Header> {
        self.block().and_then(HeaderBlock::header)
    }

    /// Human-readable description. Long payloads are abbreviated unless
    /// `verbose` is set.
    pub fn dump(&self, verbose: bool) -> Dump<'_> {
        Dump {
            frame: self,
            verbose,
        }
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>, verbose: bool) -> fmt::Result {
        match self {
            Frame::Data(frame) => frame.describe(f, verbose),
            Frame::SynStream(frame) => frame.describe(f, verbose),
            Frame::SynReply(frame) => frame.describe(f, verbose),
            Frame::RstStream(frame) => frame.describe(f),
            Frame::Settings(frame) => frame.describe(f),
            Frame::Ping(frame) => frame.describe(f),
            Frame::GoAway(frame) => frame.describe(f),
            Frame::Headers(frame) => frame.describe(f, verbose),
            Frame::WindowUpdate(frame) => frame.describe(f),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Frame {
                fn from(frame: $ty) -> Self {
                    Frame::$variant(frame)
                }
            }
        )*
    };
}

impl_from_variant!(
    Data(DataFrame),
    SynStream(SynStreamFrame),
    SynReply(SynReplyFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
    Headers(HeadersFrame),
    WindowUpdate(WindowUpdateFrame),
);
