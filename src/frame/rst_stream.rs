//! RST_STREAM frame.
//!
//! ```text
//! +----------------------------------+
//! |1|   version    |         3       |
//! +----------------------------------+
//! | Flags (8)  |         8           |
//! +----------------------------------+
//! |X|          Stream-ID (31bits)    |
//! +----------------------------------+
//! |          Status code             |
//! +----------------------------------+
//! ```

use std::fmt;
use std::io::{Read, Write};

use super::dump;
use super::error::Error;
use super::types::{Flags, FrameType, StreamId};
use super::validate::{check_stream_id, expect_length, read_control_header, write_control};
use super::HEADER_SIZE;
use crate::wire::{read_exact_into, read_u32, write_u32};

const PAYLOAD_LEN: usize = 8;

/// Reason a stream was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RstStatus {
    #[default]
    ProtocolError,
    InvalidStream,
    RefusedStream,
    UnsupportedVersion,
    Cancel,
    InternalError,
    FlowControlError,
    StreamInUse,
    StreamAlreadyClosed,
    InvalidCredentials,
    FrameTooLarge,
    /// A nonzero code this implementation does not know.
    Unknown(u32),
}

impl RstStatus {
    /// Map a wire code. Zero is not a valid status.
    pub fn from_code(code: u32) -> Option<Self> {
        let status = match code {
            0 => return None,
            1 => RstStatus::ProtocolError,
            2 => RstStatus::InvalidStream,
            3 => RstStatus::RefusedStream,
            4 => RstStatus::UnsupportedVersion,
            5 => RstStatus::Cancel,
            6 => RstStatus::InternalError,
            7 => RstStatus::FlowControlError,
            8 => RstStatus::StreamInUse,
            9 => RstStatus::StreamAlreadyClosed,
            10 => RstStatus::InvalidCredentials,
            11 => RstStatus::FrameTooLarge,
            other => RstStatus::Unknown(other),
        };
        Some(status)
    }

    pub fn code(self) -> u32 {
        match self {
            RstStatus::ProtocolError => 1,
            RstStatus::InvalidStream => 2,
            RstStatus::RefusedStream => 3,
            RstStatus::UnsupportedVersion => 4,
            RstStatus::Cancel => 5,
            RstStatus::InternalError => 6,
            RstStatus::FlowControlError => 7,
            RstStatus::StreamInUse => 8,
            RstStatus::StreamAlreadyClosed => 9,
            RstStatus::InvalidCredentials => 10,
            RstStatus::FrameTooLarge => 11,
            RstStatus::Unknown(code) => code,
        }
    }
}

impl fmt::Display for RstStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RstStatus::ProtocolError => "PROTOCOL_ERROR",
            RstStatus::InvalidStream => "INVALID_STREAM",
            RstStatus::RefusedStream => "REFUSED_STREAM",
            RstStatus::UnsupportedVersion => "UNSUPPORTED_VERSION",
            RstStatus::Cancel => "CANCEL",
            RstStatus::InternalError => "INTERNAL_ERROR",
            RstStatus::FlowControlError => "FLOW_CONTROL_ERROR",
            RstStatus::StreamInUse => "STREAM_IN_USE",
            RstStatus::StreamAlreadyClosed => "STREAM_ALREADY_CLOSED",
            RstStatus::InvalidCredentials => "INVALID_CREDENTIALS",
            RstStatus::FrameTooLarge => "FRAME_TOO_LARGE",
            RstStatus::Unknown(code) => return write!(f, "UNKNOWN({code})"),
        };
        f.write_str(name)
    }
}

/// RST_STREAM frame (type=3): abnormal termination of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RstStreamFrame {
    pub stream_id: StreamId,
    pub status: RstStatus,
}

impl RstStreamFrame {
    pub fn new(stream_id: StreamId, status: RstStatus) -> Self {
        Self { stream_id, status }
    }

    pub fn name(&self) -> &'static str {
        "RST_STREAM"
    }

    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let header = read_control_header(reader, FrameType::RstStream, Flags::NONE)?;
        expect_length(reader, &header, PAYLOAD_LEN)?;

        let mut buf = [0u8; PAYLOAD_LEN];
        read_exact_into(reader, &mut buf)?;

        let code = read_u32(&buf[4..8]);
        self.stream_id = StreamId(read_u32(&buf[0..4]));
        self.status = RstStatus::from_code(code).ok_or(Error::InvalidField {
            field: "status code",
            value: code,
            mask: u32::MAX,
        })?;

        check_stream_id(self.stream_id)?;

        Ok(HEADER_SIZE + PAYLOAD_LEN)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        check_stream_id(self.stream_id)?;
        if let RstStatus::Unknown(0) = self.status {
            return Err(Error::InvalidField {
                field: "status code",
                value: 0,
                mask: u32::MAX,
            });
        }

        let mut fields = [0u8; PAYLOAD_LEN];
        write_u32(&mut fields[0..4], self.stream_id.value());
        write_u32(&mut fields[4..8], self.status.code());

        write_control(writer, FrameType::RstStream, Flags::NONE, &fields, &[])
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump::open(f, self.name())?;
        dump::field(f, "Stream ID", self.stream_id)?;
        dump::field(f, "Status code", self.status)?;
        dump::close(f)
    }
}
