//! The SPDY/3 zlib priming dictionary.
//!
//! Both ends seed their zlib streams with this dictionary before the first
//! header block so that common header names and values compress to
//! back-references from the very first frame.

use std::sync::OnceLock;

/// Length-prefixed words at the start of the dictionary.
const WORDS: [&str; 65] = [
    "options",
    "head",
    "post",
    "put",
    "delete",
    "trace",
    "accept",
    "accept-charset",
    "accept-encoding",
    "accept-language",
    "accept-ranges",
    "age",
    "allow",
    "authorization",
    "cache-control",
    "connection",
    "content-base",
    "content-encoding",
    "content-language",
    "content-length",
    "content-location",
    "content-md5",
    "content-range",
    "content-type",
    "date",
    "etag",
    "expect",
    "expires",
    "from",
    "host",
    "if-match",
    "if-modified-since",
    "if-none-match",
    "if-range",
    "if-unmodified-since",
    "last-modified",
    "location",
    "max-forwards",
    "pragma",
    "proxy-authenticate",
    "proxy-authorization",
    "range",
    "referer",
    "retry-after",
    "server",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "user-agent",
    "vary",
    "via",
    "warning",
    "www-authenticate",
    "method",
    "get",
    "status",
    "200 OK",
    "version",
    "HTTP/1.1",
    "url",
    "public",
    "set-cookie",
    "keep-alive",
    "origin",
];

/// Unprefixed tail of status codes, reason phrases, dates and media types.
const TAIL: &str = concat!(
    "100101201202205206300302303304305306307402405406407408409410411412413414415416417502504505",
    "203 Non-Authoritative Information",
    "204 No Content",
    "301 Moved Permanently",
    "400 Bad Request",
    "401 Unauthorized",
    "403 Forbidden",
    "404 Not Found",
    "500 Internal Server Error",
    "501 Not Implemented",
    "503 Service Unavailable",
    "Jan Feb Mar Apr May Jun Jul Aug Sept Oct Nov Dec 00:00:00 ",
    "Mon, Tue, Wed, Thu, Fri, Sat, Sun, GMT",
    "chunked,text/html,image/png,image/jpg,image/gif,application/xml,application/xhtml+xml,",
    "text/plain,text/javascript,publicprivatemax-age=gzip,deflate,sdch",
    "charset=utf-8charset=iso-8859-1,utf-,*,enq=0.",
);

/// Size of the assembled dictionary in bytes.
const DICTIONARY_LEN: usize = 1423;

/// The SPDY/3 header compression dictionary.
pub fn dictionary() -> &'static [u8] {
    static DICTIONARY: OnceLock<Vec<u8>> = OnceLock::new();
    DICTIONARY.get_or_init(|| {
        let mut dict = Vec::with_capacity(DICTIONARY_LEN);
        for word in WORDS {
            dict.extend_from_slice(&(word.len() as u32).to_be_bytes());
            dict.extend_from_slice(word.as_bytes());
        }
        dict.extend_from_slice(TAIL.as_bytes());
        dict
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_len() {
        assert_eq!(dictionary().len(), DICTIONARY_LEN);
    }

    #[test]
    fn test_dictionary_prefix() {
        // "\0\0\0\x07options\0\0\0\x04head"
        assert_eq!(
            &dictionary()[..19],
            &[
                0x00, 0x00, 0x00, 0x07, b'o', b'p', b't', b'i', b'o', b'n', b's', 0x00, 0x00,
                0x00, 0x04, b'h', b'e', b'a', b'd'
            ]
        );
    }

    #[test]
    fn test_dictionary_suffix() {
        assert!(dictionary().ends_with(b"utf-,*,enq=0."));
    }
}
