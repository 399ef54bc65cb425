//! Frame layout and dispatcher tests against the public API.
//!
//! Each test drives `Frame::read_from` / `Frame::write_to` over in-memory
//! byte streams, with no connection state involved.

use spdy::compression::{Header, ZlibCompressor, ZlibDecompressor};
use spdy::frame::{
    DataFrame, Error, Flags, Frame, FrameKind, HeadersFrame, PingFrame, StreamId, SynReplyFrame,
};

fn status(code: &str) -> Header {
    [(":status", code), (":version", "HTTP/1.1")].into_iter().collect()
}

// =============================================================================
// DATA
// =============================================================================

#[test]
fn test_empty_terminal_data_frame() {
    let frame = Frame::from(DataFrame::new(StreamId(1), Flags::FIN, Vec::new()));
    let mut wire = Vec::new();
    assert_eq!(frame.write_to(&mut wire).unwrap(), 8);
    assert_eq!(wire, [0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00]);

    let Frame::Data(parsed) = Frame::read_from(&mut &wire[..]).unwrap() else {
        panic!("expected DATA");
    };
    assert_eq!(parsed.stream_id, StreamId(1));
    assert!(parsed.flags.fin());
    assert!(parsed.data.is_empty());
}

#[test]
fn test_empty_non_terminal_data_frame() {
    let frame = Frame::from(DataFrame::new(StreamId(1), Flags::NONE, Vec::new()));
    let mut wire = Vec::new();
    let err = frame.write_to(&mut wire).unwrap_err();
    assert!(matches!(err, Error::EmptyData));
    assert_eq!(err.to_string(), "empty frame: DATA without payload must carry FLAG_FIN");
    assert!(wire.is_empty());
}

#[test]
fn test_control_bytes_given_to_data_parser() {
    let bytes = [
        0x80, 0x03, 0x00, 0x08, // Control, version 3, type HEADERS
        0x00, 0x00, 0x00, 0x04, // Flags: none, Length: 4
        0x00, 0x00, 0x00, 0x01, // Stream ID: 1
    ];
    let mut src: &[u8] = &bytes;
    let err = DataFrame::default().read_from(&mut src).unwrap_err();
    assert!(matches!(
        err,
        Error::IncorrectFrame {
            got: FrameKind::Control(8),
            expected: FrameKind::Data
        }
    ));
    assert!(!err.is_connection_fatal());
}

// =============================================================================
// Header-bearing frames
// =============================================================================

#[test]
fn test_stream_id_boundaries() {
    let mut c = ZlibCompressor::new();

    for (id, expect) in [
        (0u32, Some("zero")),
        (0x8000_0000, Some("large")),
        (0xFFFF_FFFF, Some("large")),
        (0x7FFF_FFFF, None),
        (1, None),
    ] {
        let mut frame = Frame::from(HeadersFrame::new(StreamId(id), Flags::NONE, status("200")));
        frame.compress(&mut c).unwrap();
        let result = frame.write_to(&mut Vec::new());
        match expect {
            Some("zero") => assert!(matches!(result, Err(Error::StreamIdIsZero))),
            Some(_) => assert!(matches!(result, Err(Error::StreamIdTooLarge))),
            None => assert!(result.is_ok(), "stream id {id:#x} rejected"),
        }
    }
}

#[test]
fn test_write_before_compress_produces_nothing() {
    for frame in [
        Frame::from(HeadersFrame::new(StreamId(1), Flags::NONE, status("200"))),
        Frame::from(SynReplyFrame::new(StreamId(1), Flags::NONE, status("200"))),
    ] {
        let mut wire = Vec::new();
        assert!(matches!(
            frame.write_to(&mut wire),
            Err(Error::HeadersNotWritten)
        ));
        assert!(wire.is_empty());
    }
}

#[test]
fn test_headers_length_three() {
    let bytes = [
        0x80, 0x03, 0x00, 0x08, // Control, version 3, type HEADERS
        0x00, 0x00, 0x00, 0x03, // Flags: none, Length: 3
        0x00, 0x00, 0x01,
    ];
    assert!(matches!(
        Frame::read_from(&mut &bytes[..]),
        Err(Error::IncorrectDataLength {
            got: 3,
            expected: 4
        })
    ));
}

#[test]
fn test_decompress_is_deferred() {
    let mut c = ZlibCompressor::new();
    let mut d = ZlibDecompressor::new();

    let mut frame = Frame::from(SynReplyFrame::new(StreamId(3), Flags::FIN, status("404")));
    frame.compress(&mut c).unwrap();
    let mut wire = Vec::new();
    frame.write_to(&mut wire).unwrap();

    let mut parsed = Frame::read_from(&mut &wire[..]).unwrap();
    assert!(parsed.header().is_none());
    assert!(parsed.block().unwrap().is_encoded());

    parsed.decompress(&mut d).unwrap();
    assert_eq!(parsed.header(), Some(&status("404")));

    // Second call leaves the context untouched
    parsed.decompress(&mut d).unwrap();
    assert_eq!(parsed.header(), Some(&status("404")));
}

// =============================================================================
// Dispatcher
// =============================================================================

#[test]
fn test_unknown_control_type() {
    for code in [0u16, 5, 10, 0x00FF, 0xFFFF] {
        let [hi, lo] = code.to_be_bytes();
        let bytes = [0x80, 0x03, hi, lo, 0x00, 0x00, 0x00, 0x00];
        let err = Frame::read_from(&mut &bytes[..]).unwrap_err();
        assert!(matches!(err, Error::UnknownFrameType(c) if c == code));
        assert!(err.is_connection_fatal());
    }
}

#[test]
fn test_wrong_version() {
    let bytes = [
        0x80, 0x02, 0x00, 0x06, // Control, version 2, type PING
        0x00, 0x00, 0x00, 0x04, // Flags: none, Length: 4
        0x00, 0x00, 0x00, 0x01,
    ];
    let mut src: &[u8] = &bytes;
    assert!(matches!(
        Frame::read_from(&mut src),
        Err(Error::UnsupportedVersion(2))
    ));
    assert!(src.is_empty());
}

#[test]
fn test_truncated_frame_is_fatal() {
    let bytes = [
        0x80, 0x03, 0x00, 0x06, // Control, version 3, type PING
        0x00, 0x00, 0x00, 0x04, // Flags: none, Length: 4
        0x00, 0x00,
    ];
    let err = Frame::read_from(&mut &bytes[..]).unwrap_err();
    assert!(matches!(err, Error::ShortRead { .. }));
    assert!(err.is_connection_fatal());
}

#[test]
fn test_mixed_stream() {
    let mut c = ZlibCompressor::new();
    let mut sent = vec![
        Frame::from(SynReplyFrame::new(StreamId(1), Flags::NONE, status("200"))),
        Frame::from(DataFrame::new(StreamId(1), Flags::NONE, &b"hello"[..])),
        Frame::from(PingFrame::new(2)),
        Frame::from(DataFrame::new(StreamId(1), Flags::FIN, Vec::new())),
    ];

    let mut wire = Vec::new();
    for frame in &mut sent {
        frame.compress(&mut c).unwrap();
        frame.write_to(&mut wire).unwrap();
    }

    let mut src: &[u8] = &wire;
    let mut names = Vec::new();
    loop {
        match Frame::read_from(&mut src) {
            Ok(frame) => names.push(frame.name()),
            Err(Error::Closed) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(names, ["SYN_REPLY", "DATA", "PING", "DATA"]);
}
