//! Human-readable frame dumps for diagnostics.

use std::fmt::{self, Write};

use super::Frame;
use super::block::HeaderBlock;
use super::types::Flags;

/// Payloads up to this many bytes are always printed in full.
const SHORT_PAYLOAD: usize = 21;

/// Bytes shown from each end of an abbreviated payload.
const EDGE: usize = 9;

/// Multi-line description of a frame, see [`Frame::dump`].
pub struct Dump<'a> {
    pub(crate) frame: &'a Frame,
    pub(crate) verbose: bool,
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.frame.describe(f, self.verbose)
    }
}

pub(crate) fn open(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    writeln!(f, "{name} {{")
}

pub(crate) fn close(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "}}")
}

pub(crate) fn field(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    let label = format!("{name}:");
    writeln!(f, "\t{label:<22}{value}")
}

/// Names of the set flags from `known`, or `[NONE]`.
pub(crate) fn flag_names(flags: Flags, known: &[(Flags, &str)]) -> String {
    let names: Vec<&str> = known
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        "[NONE]".to_string()
    } else {
        names.join(" ")
    }
}

/// Space-separated hex, abbreviated to both ends unless `verbose`.
pub(crate) fn hex(data: &[u8], verbose: bool) -> String {
    fn join(out: &mut String, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{b:02x}");
        }
    }

    let mut out = String::from("[");
    if verbose || data.len() <= SHORT_PAYLOAD {
        join(&mut out, data);
    } else {
        join(&mut out, &data[..EDGE]);
        out.push_str(" ... ");
        join(&mut out, &data[data.len() - EDGE..]);
    }
    out.push(']');
    out
}

pub(crate) fn block(f: &mut fmt::Formatter<'_>, block: &HeaderBlock, verbose: bool) -> fmt::Result {
    match block {
        HeaderBlock::Decoded(header) => field(f, "Header", header),
        HeaderBlock::Encoded(raw) if verbose => field(f, "Header (compressed)", hex(raw, true)),
        HeaderBlock::Encoded(raw) => {
            field(f, "Header", format!("[compressed, {} bytes]", raw.len()))
        }
    }
}
