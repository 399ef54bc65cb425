//! Reader/writer tests: header compression ordering across a connection and
//! poisoning after fatal errors.

use spdy::compression::{Header, ZlibCompressor, ZlibDecompressor};
use spdy::conn::{FrameReader, FrameWriter};
use spdy::frame::{
    DataFrame, Error, Flags, Frame, HeadersFrame, PingFrame, StreamId, SynReplyFrame,
    SynStreamFrame,
};

fn request(path: &str) -> Header {
    [
        (":method", "GET"),
        (":path", path),
        (":version", "HTTP/1.1"),
        (":host", "example.com"),
        (":scheme", "https"),
        ("user-agent", "spdy-test"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_many_streams_share_one_context() {
    let mut writer = FrameWriter::new(Vec::new(), ZlibCompressor::new());
    for i in 0..50u32 {
        let id = StreamId(2 * i + 1);
        let path = format!("/item/{i}");
        let mut syn = Frame::from(SynStreamFrame::new(id, Flags::FIN, request(&path)));
        writer.write_frame(&mut syn).unwrap();
    }
    let (wire, _) = writer.into_inner();

    let mut reader = FrameReader::new(&wire[..], ZlibDecompressor::new());
    for i in 0..50u32 {
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.stream_id(), Some(StreamId(2 * i + 1)));
        let path = format!("/item/{i}");
        assert_eq!(frame.header(), Some(&request(&path)));
    }
    assert!(reader.read_frame().unwrap().is_none());
}

#[test]
fn test_out_of_order_decompression_fails() {
    let mut c = ZlibCompressor::new();
    let mut first = Frame::from(SynStreamFrame::new(StreamId(1), Flags::NONE, request("/a")));
    let mut second = Frame::from(SynStreamFrame::new(StreamId(3), Flags::NONE, request("/b")));
    first.compress(&mut c).unwrap();
    second.compress(&mut c).unwrap();

    let mut d = ZlibDecompressor::new();
    // A fresh context cannot start in the middle of the stream
    assert!(matches!(
        second.decompress(&mut d),
        Err(Error::Compression(_))
    ));
}

#[test]
fn test_illegal_flags_keep_context_in_step() {
    let mut c = ZlibCompressor::new();
    let mut wire = Vec::new();

    let mut first = HeadersFrame::new(StreamId(1), Flags::NONE, request("/first"));
    first.compress(&mut c).unwrap();
    first.write_to(&mut wire).unwrap();
    // UNIDIRECTIONAL is not legal on HEADERS
    wire[4] = 0x02;

    let mut second = HeadersFrame::new(StreamId(1), Flags::FIN, request("/second"));
    second.compress(&mut c).unwrap();
    second.write_to(&mut wire).unwrap();

    let mut reader = FrameReader::new(&wire[..], ZlibDecompressor::new());
    assert!(matches!(
        reader.read_frame(),
        Err(Error::InvalidField { field: "flags", .. })
    ));
    assert!(!reader.is_poisoned());

    let frame = reader.read_frame().unwrap().unwrap();
    assert_eq!(frame.header(), Some(&request("/second")));
    assert!(reader.read_frame().unwrap().is_none());
}

#[test]
fn test_rejected_syn_stream_keeps_context_in_step() {
    let mut c = ZlibCompressor::new();
    let mut wire = Vec::new();

    let mut first = SynStreamFrame::new(StreamId(1), Flags::NONE, request("/a"));
    first.compress(&mut c).unwrap();
    first.write_to(&mut wire).unwrap();
    // Flag 0x04 is undefined for SYN_STREAM
    wire[4] |= 0x04;

    let mut second = SynStreamFrame::new(StreamId(3), Flags::FIN, request("/b"));
    second.compress(&mut c).unwrap();
    second.write_to(&mut wire).unwrap();

    let mut reader = FrameReader::new(&wire[..], ZlibDecompressor::new());
    assert!(matches!(
        reader.read_frame(),
        Err(Error::InvalidField { field: "flags", .. })
    ));

    let frame = reader.read_frame().unwrap().unwrap();
    assert_eq!(frame.stream_id(), Some(StreamId(3)));
    assert_eq!(frame.header(), Some(&request("/b")));
}

#[test]
fn test_data_frames_do_not_touch_context() {
    let mut writer = FrameWriter::new(Vec::new(), ZlibCompressor::new());
    let mut frames = vec![
        Frame::from(SynReplyFrame::new(StreamId(1), Flags::NONE, request("/"))),
        Frame::from(DataFrame::new(StreamId(1), Flags::NONE, vec![0xAB; 4096])),
        Frame::from(HeadersFrame::new(StreamId(1), Flags::FIN, request("/trailer"))),
    ];
    for frame in &mut frames {
        writer.write_frame(frame).unwrap();
    }
    let (wire, _) = writer.into_inner();

    let mut reader = FrameReader::new(&wire[..], ZlibDecompressor::new());
    let reply = reader.read_frame().unwrap().unwrap();
    let data = reader.read_frame().unwrap().unwrap();
    let trailer = reader.read_frame().unwrap().unwrap();
    assert_eq!(reply.header(), Some(&request("/")));
    assert!(matches!(data, Frame::Data(ref d) if d.data.len() == 4096));
    assert_eq!(trailer.header(), Some(&request("/trailer")));
}

#[test]
fn test_reader_survives_frame_local_errors() {
    let mut bytes = vec![
        0x00, 0x00, 0x00, 0x01, 0x04, 0x00, 0x00, 0x02, // DATA with illegal flag
        0xAA, 0xBB, //
        0x80, 0x03, 0x00, 0x09, 0x00, 0x00, 0x00, 0x08, // WINDOW_UPDATE, length 8
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, // delta 0
    ];
    PingFrame::new(9).write_to(&mut bytes).unwrap();

    let mut reader = FrameReader::new(&bytes[..], ZlibDecompressor::new());
    assert!(matches!(
        reader.read_frame(),
        Err(Error::InvalidField { field: "flags", .. })
    ));
    assert!(matches!(
        reader.read_frame(),
        Err(Error::InvalidField {
            field: "delta window size",
            ..
        })
    ));
    assert_eq!(
        reader.read_frame().unwrap(),
        Some(Frame::Ping(PingFrame::new(9)))
    );
    assert!(!reader.is_poisoned());
}

#[test]
fn test_reader_poisoned_by_truncation() {
    let bytes = [0x80, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00, 0x04, 0x00];
    let mut reader = FrameReader::new(&bytes[..], ZlibDecompressor::new());
    let err = reader.read_frame().unwrap_err();
    assert!(err.is_connection_fatal());
    assert!(reader.is_poisoned());
    assert!(matches!(reader.read_frame(), Err(Error::Poisoned)));
}

#[test]
fn test_writer_poisoned_by_bad_header() {
    let mut writer = FrameWriter::new(Vec::new(), ZlibCompressor::new());
    let mut bad = Header::new();
    bad.add("x-bad", "a\0b");
    let mut frame = Frame::from(HeadersFrame::new(StreamId(1), Flags::NONE, bad));
    assert!(matches!(
        writer.write_frame(&mut frame),
        Err(Error::Compression(_))
    ));

    let mut ping = Frame::from(PingFrame::new(2));
    assert!(matches!(writer.write_frame(&mut ping), Err(Error::Poisoned)));
    assert!(writer.get_ref().is_empty());
}

#[test]
fn test_halves_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<FrameReader<std::net::TcpStream>>();
    assert_send::<FrameWriter<std::net::TcpStream>>();
}
