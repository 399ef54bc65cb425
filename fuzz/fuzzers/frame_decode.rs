#![no_main]

use libfuzzer_sys::fuzz_target;
use spdy::compression::ZlibDecompressor;
use spdy::conn::FrameReader;

fuzz_target!(|data: &[u8]| {
    // Read until EOF or poison; the reader must never panic or loop.
    let mut reader = FrameReader::new(data, ZlibDecompressor::with_max_block_size(64 * 1024));
    loop {
        match reader.read_frame() {
            Ok(Some(frame)) => {
                let _ = frame.dump(false).to_string();
            }
            Ok(None) => break,
            Err(_) if reader.is_poisoned() => break,
            Err(_) => {}
        }
    }
});
