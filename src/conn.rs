//! Per-connection frame reader and writer.
//!
//! A connection has one compression context per direction, and each must see
//! header blocks in exactly the order they cross the wire. [`FrameReader`]
//! owns the byte source together with the inbound context and
//! [`FrameWriter`] owns the byte sink together with the outbound context, so
//! the order is fixed by whoever holds them. Run each on its own task or
//! thread; no locking is involved.
//!
//! After a connection-fatal error either half refuses further work with
//! [`Error::Poisoned`].

use std::io::{Read, Write};

use tracing::warn;

use crate::compression::{Compressor, Decompressor, ZlibCompressor, ZlibDecompressor};
use crate::config::CompressionConfig;
use crate::frame::{Error, Frame, ReadFailure};

/// Reads frames and decompresses their header blocks in arrival order.
pub struct FrameReader<R, D = ZlibDecompressor> {
    reader: R,
    decompressor: D,
    poisoned: bool,
}

impl<R: Read> FrameReader<R, ZlibDecompressor> {
    pub fn from_config(reader: R, config: &CompressionConfig) -> Self {
        Self::new(reader, ZlibDecompressor::from_config(config))
    }
}

impl<R: Read, D: Decompressor> FrameReader<R, D> {
    pub fn new(reader: R, decompressor: D) -> Self {
        Self {
            reader,
            decompressor,
            poisoned: false,
        }
    }

    /// Read the next frame with its header block decompressed.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream on a frame
    /// boundary. A frame-local error leaves the reader usable and positioned
    /// at the next frame.
    pub fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }

        match Frame::read_frame_inner(&mut self.reader) {
            Ok(mut frame) => match frame.decompress(&mut self.decompressor) {
                Ok(()) => Ok(Some(frame)),
                Err(e) => Err(self.poison(e)),
            },
            Err(ReadFailure {
                error: Error::Closed,
                ..
            }) => Ok(None),
            Err(ReadFailure { error, frame }) => {
                // The block was sent and the peer's context advanced past it,
                // so ours has to as well.
                if let Some(mut frame) = frame {
                    if let Err(e) = frame.decompress(&mut self.decompressor) {
                        return Err(self.poison(e));
                    }
                }
                if error.is_connection_fatal() {
                    Err(self.poison(error))
                } else {
                    Err(error)
                }
            }
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> (R, D) {
        (self.reader, self.decompressor)
    }

    fn poison(&mut self, error: Error) -> Error {
        warn!(%error, "frame reader poisoned");
        self.poisoned = true;
        error
    }
}

/// Compresses header blocks in transmission order and writes frames.
pub struct FrameWriter<W, C = ZlibCompressor> {
    writer: W,
    compressor: C,
    poisoned: bool,
}

impl<W: Write> FrameWriter<W, ZlibCompressor> {
    pub fn from_config(writer: W, config: &CompressionConfig) -> Self {
        Self::new(writer, ZlibCompressor::from_config(config))
    }
}

impl<W: Write, C: Compressor> FrameWriter<W, C> {
    pub fn new(writer: W, compressor: C) -> Self {
        Self {
            writer,
            compressor,
            poisoned: false,
        }
    }

    /// Compress `frame`'s header block if it has one, then write it.
    ///
    /// Once a block has been compressed here it must reach the wire: any
    /// failure to write such a frame poisons the writer, since the peer's
    /// context could no longer follow ours.
    pub fn write_frame(&mut self, frame: &mut Frame) -> Result<usize, Error> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }

        let compressing = frame.block().is_some_and(|block| !block.is_encoded());
        if let Err(e) = frame.compress(&mut self.compressor) {
            return Err(self.poison(e));
        }

        match frame.write_to(&mut self.writer) {
            Ok(n) => Ok(n),
            Err(e) if compressing || e.is_connection_fatal() => Err(self.poison(e)),
            Err(e) => Err(e),
        }
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        self.writer.flush().map_err(|e| self.poison(Error::Io(e)))
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> (W, C) {
        (self.writer, self.compressor)
    }

    fn poison(&mut self, error: Error) -> Error {
        warn!(%error, "frame writer poisoned");
        self.poisoned = true;
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::Header;
    use crate::frame::{
        DataFrame, Flags, HeadersFrame, PingFrame, StreamId, SynReplyFrame, SynStreamFrame,
    };
    use std::io;

    fn header(status: &str) -> Header {
        [(":status", status), ("content-type", "text/plain")]
            .into_iter()
            .collect()
    }

    fn sequence() -> Vec<Frame> {
        vec![
            SynStreamFrame::new(StreamId(1), Flags::NONE, header("GET")).into(),
            SynReplyFrame::new(StreamId(1), Flags::NONE, header("200")).into(),
            DataFrame::new(StreamId(1), Flags::NONE, &b"body"[..]).into(),
            HeadersFrame::new(StreamId(1), Flags::FIN, header("trailer")).into(),
            PingFrame::new(1).into(),
        ]
    }

    fn encode(frames: &mut [Frame]) -> Vec<u8> {
        let mut writer = FrameWriter::new(Vec::new(), ZlibCompressor::new());
        for frame in frames.iter_mut() {
            writer.write_frame(frame).unwrap();
        }
        writer.into_inner().0
    }

    #[test]
    fn test_sequence_roundtrip() {
        let mut sent = sequence();
        let wire = encode(&mut sent);

        let mut reader = FrameReader::new(&wire[..], ZlibDecompressor::new());
        for original in sequence() {
            let frame = reader.read_frame().unwrap().unwrap();
            assert_eq!(frame.name(), original.name());
            assert_eq!(frame.header(), original.header());
        }
        assert!(reader.read_frame().unwrap().is_none());
        // EOF is sticky but not an error
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_unknown_type_poisons_reader() {
        let bytes = [
            0x80, 0x03, 0x00, 0x0B, 0x00, 0x00, 0x00, 0x00, // Control, type 11
            0x80, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, // PING
        ];
        let mut reader = FrameReader::new(&bytes[..], ZlibDecompressor::new());
        assert!(matches!(
            reader.read_frame(),
            Err(Error::UnknownFrameType(11))
        ));
        assert!(reader.is_poisoned());
        assert!(matches!(reader.read_frame(), Err(Error::Poisoned)));
    }

    #[test]
    fn test_frame_local_error_keeps_reader() {
        let bytes = [
            0x80, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00, 0x08, // PING, length 8
            0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, //
            0x80, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00, 0x04, // PING, length 4
            0x00, 0x00, 0x00, 0x03, //
        ];
        let mut reader = FrameReader::new(&bytes[..], ZlibDecompressor::new());
        assert!(matches!(
            reader.read_frame(),
            Err(Error::IncorrectDataLength { .. })
        ));
        assert!(!reader.is_poisoned());
        assert_eq!(
            reader.read_frame().unwrap(),
            Some(Frame::Ping(PingFrame::new(3)))
        );
    }

    #[test]
    fn test_bad_stream_id_keeps_context_in_step() {
        let mut c = ZlibCompressor::new();
        let mut wire = Vec::new();

        let mut first = HeadersFrame::new(StreamId(1), Flags::NONE, header("100"));
        first.compress(&mut c).unwrap();
        first.write_to(&mut wire).unwrap();
        // Rewrite the stream id to 0 after the fact
        wire[8..12].copy_from_slice(&[0, 0, 0, 0]);

        let mut second = HeadersFrame::new(StreamId(1), Flags::FIN, header("200"));
        second.compress(&mut c).unwrap();
        second.write_to(&mut wire).unwrap();

        let mut reader = FrameReader::new(&wire[..], ZlibDecompressor::new());
        assert!(matches!(reader.read_frame(), Err(Error::StreamIdIsZero)));
        assert!(!reader.is_poisoned());

        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.header(), Some(&header("200")));
    }

    #[test]
    fn test_corrupt_block_poisons_reader() {
        let bytes = [
            0x80, 0x03, 0x00, 0x08, 0x00, 0x00, 0x00, 0x07, // HEADERS, length 7
            0x00, 0x00, 0x00, 0x01, // Stream ID: 1
            0xDE, 0xAD, 0xBE, // Not zlib
        ];
        let mut reader = FrameReader::new(&bytes[..], ZlibDecompressor::new());
        assert!(matches!(reader.read_frame(), Err(Error::Compression(_))));
        assert!(matches!(reader.read_frame(), Err(Error::Poisoned)));
    }

    #[test]
    fn test_invalid_frame_after_compress_poisons_writer() {
        let mut writer = FrameWriter::new(Vec::new(), ZlibCompressor::new());
        let mut frame = Frame::from(HeadersFrame::new(StreamId(0), Flags::NONE, header("x")));
        assert!(matches!(
            writer.write_frame(&mut frame),
            Err(Error::StreamIdIsZero)
        ));
        assert!(writer.is_poisoned());
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn test_invalid_data_frame_keeps_writer() {
        let mut writer = FrameWriter::new(Vec::new(), ZlibCompressor::new());
        let mut empty = Frame::from(DataFrame::new(StreamId(1), Flags::NONE, &b""[..]));
        assert!(matches!(
            writer.write_frame(&mut empty),
            Err(Error::EmptyData)
        ));
        assert!(!writer.is_poisoned());

        let mut ping = Frame::from(PingFrame::new(2));
        assert_eq!(writer.write_frame(&mut ping).unwrap(), 12);
    }

    struct Stalled;

    impl Write for Stalled {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_short_write_poisons_writer() {
        let mut writer = FrameWriter::new(Stalled, ZlibCompressor::new());
        let mut ping = Frame::from(PingFrame::new(2));
        assert!(matches!(
            writer.write_frame(&mut ping),
            Err(Error::ShortWrite {
                expected: 12,
                written: 0
            })
        ));
        assert!(matches!(writer.write_frame(&mut ping), Err(Error::Poisoned)));
        assert!(matches!(writer.flush(), Err(Error::Poisoned)));
    }
}
