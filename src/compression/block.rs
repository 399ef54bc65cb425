//! Uncompressed name/value block serialization.
//!
//! ```text
//! +------------------------------------+
//! | Number of Name/Value pairs (32)    |
//! +------------------------------------+
//! |     Length of name (32)            |
//! +------------------------------------+
//! |           Name (string)            |
//! +------------------------------------+
//! |     Length of value (32)           |
//! +------------------------------------+
//! |          Value   (string)          |
//! +------------------------------------+
//! |           (repeats)                |
//! ```
//!
//! A name with several values is sent once, its values joined by NUL.

use super::{CompressionError, Header};

const NUL: u8 = 0;

/// Serialize `header` into an uncompressed name/value block.
pub fn encode_block(header: &Header) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::with_capacity(64);
    put_len(&mut out, header.len())?;

    for (name, values) in header.iter() {
        if name.is_empty() {
            return Err(CompressionError::EmptyName);
        }
        if values.len() > 1 && values.iter().any(String::is_empty) {
            return Err(CompressionError::EmptyValue(name.to_string()));
        }
        if values.iter().any(|v| v.as_bytes().contains(&NUL)) {
            return Err(CompressionError::NulInValue(name.to_string()));
        }

        put_len(&mut out, name.len())?;
        out.extend_from_slice(name.as_bytes());

        let separators = values.len().saturating_sub(1);
        let value_len = values.iter().map(String::len).sum::<usize>() + separators;
        put_len(&mut out, value_len)?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push(NUL);
            }
            out.extend_from_slice(value.as_bytes());
        }
    }

    Ok(out)
}

/// Parse an uncompressed name/value block.
pub fn decode_block(mut data: &[u8]) -> Result<Header, CompressionError> {
    let count = take_u32(&mut data)? as usize;

    // Each pair needs at least eight bytes of length fields.
    if count > data.len() / 8 {
        return Err(CompressionError::Truncated);
    }

    let mut header = Header::new();
    for _ in 0..count {
        let name_len = take_u32(&mut data)? as usize;
        let name = take_str(&mut data, name_len)?;
        if name.is_empty() {
            return Err(CompressionError::EmptyName);
        }
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(CompressionError::UppercaseName(name.to_string()));
        }
        if header.contains(name) {
            return Err(CompressionError::DuplicateName(name.to_string()));
        }

        let value_len = take_u32(&mut data)? as usize;
        let raw = take_str(&mut data, value_len)?;
        let values = if raw.is_empty() {
            vec![String::new()]
        } else {
            let values: Vec<String> = raw.split('\0').map(str::to_string).collect();
            if values.iter().any(String::is_empty) {
                return Err(CompressionError::EmptyValue(name.to_string()));
            }
            values
        };

        header.push_unique(name.to_string(), values);
    }

    if !data.is_empty() {
        return Err(CompressionError::TrailingBytes(data.len()));
    }

    Ok(header)
}

fn put_len(out: &mut Vec<u8>, len: usize) -> Result<(), CompressionError> {
    let len = u32::try_from(len).map_err(|_| CompressionError::TooLarge {
        size: len,
        max: u32::MAX as usize,
    })?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn take_u32(data: &mut &[u8]) -> Result<u32, CompressionError> {
    if data.len() < 4 {
        return Err(CompressionError::Truncated);
    }
    let (head, rest) = data.split_at(4);
    *data = rest;
    Ok(crate::wire::read_u32(head))
}

fn take_str<'a>(data: &mut &'a [u8], len: usize) -> Result<&'a str, CompressionError> {
    if data.len() < len {
        return Err(CompressionError::Truncated);
    }
    let (head, rest) = data.split_at(len);
    *data = rest;
    std::str::from_utf8(head).map_err(|_| CompressionError::InvalidUtf8)
}
