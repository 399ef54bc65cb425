//! SPDY/3 frame codec.
//!
//! Turns a connection's byte stream into typed frames and back, with the
//! per-connection header compression SPDY/3 requires. Transport, stream
//! multiplexing and flow control are left to the caller.
//!
//! # Example
//!
//! ```
//! use spdy::compression::{Header, ZlibCompressor, ZlibDecompressor};
//! use spdy::conn::{FrameReader, FrameWriter};
//! use spdy::frame::{Flags, Frame, StreamId, SynReplyFrame};
//!
//! let header: Header = [(":status", "200 OK"), (":version", "HTTP/1.1")]
//!     .into_iter()
//!     .collect();
//!
//! let mut writer = FrameWriter::new(Vec::new(), ZlibCompressor::new());
//! let mut reply = Frame::from(SynReplyFrame::new(StreamId(1), Flags::FIN, header.clone()));
//! writer.write_frame(&mut reply).unwrap();
//! let (wire, _) = writer.into_inner();
//!
//! let mut reader = FrameReader::new(&wire[..], ZlibDecompressor::new());
//! let frame = reader.read_frame().unwrap().unwrap();
//! assert_eq!(frame.header(), Some(&header));
//! ```

pub mod compression;
pub mod config;
pub mod conn;
pub mod frame;
pub mod logging;
pub mod wire;

pub use config::Config;
pub use conn::{FrameReader, FrameWriter};
pub use frame::{Error, Frame};
