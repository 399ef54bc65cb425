#![no_main]

use libfuzzer_sys::fuzz_target;
use spdy::compression::{Compressor, Decompressor, ZlibCompressor, ZlibDecompressor, decode_block};

fuzz_target!(|data: &[u8]| {
    // Uncompressed block parser
    let _ = decode_block(data);

    // Compressed input, as the inbound context would see it
    let mut d = ZlibDecompressor::with_max_block_size(64 * 1024);
    let _ = d.decompress(data);

    // Anything that decodes must survive a trip through a fresh pair
    if let Ok(header) = decode_block(data) {
        let mut c = ZlibCompressor::new();
        let mut d = ZlibDecompressor::new();
        if let Ok(blob) = c.compress(&header) {
            assert_eq!(d.decompress(&blob).ok(), Some(header));
        }
    }
});
