//! SPDY frame field types.

use std::fmt;
use std::ops::BitOr;

/// SPDY/3 control frame types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FrameType {
    SynStream = 1,
    SynReply = 2,
    RstStream = 3,
    Settings = 4,
    Ping = 6,
    GoAway = 7,
    Headers = 8,
    WindowUpdate = 9,
}

impl FrameType {
    /// Try to convert a wire type code to a frame type.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(FrameType::SynStream),
            2 => Some(FrameType::SynReply),
            3 => Some(FrameType::RstStream),
            4 => Some(FrameType::Settings),
            6 => Some(FrameType::Ping),
            7 => Some(FrameType::GoAway),
            8 => Some(FrameType::Headers),
            9 => Some(FrameType::WindowUpdate),
            _ => None,
        }
    }

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            FrameType::SynStream => "SYN_STREAM",
            FrameType::SynReply => "SYN_REPLY",
            FrameType::RstStream => "RST_STREAM",
            FrameType::Settings => "SETTINGS",
            FrameType::Ping => "PING",
            FrameType::GoAway => "GOAWAY",
            FrameType::Headers => "HEADERS",
            FrameType::WindowUpdate => "WINDOW_UPDATE",
        }
    }
}

/// Kind of a frame as seen on the wire: data, or a control frame by type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Data,
    Control(u16),
}

impl From<FrameType> for FrameKind {
    fn from(t: FrameType) -> Self {
        FrameKind::Control(t.code())
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Data => write!(f, "DATA"),
            FrameKind::Control(code) => match FrameType::from_code(*code) {
                Some(t) => write!(f, "{}", t.name()),
                None => write!(f, "control frame {code:#06x}"),
            },
        }
    }
}

/// Stream identifier (31 bits, high bit reserved).
///
/// The raw wire value is kept so that frames carrying an out-of-range id can
/// be represented and rejected by validation rather than silently masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamId(pub u32);

impl StreamId {
    /// Largest legal stream identifier.
    pub const MAX: StreamId = StreamId(0x7FFF_FFFF);

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Check the reserved high bit is clear.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 <= Self::MAX.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for StreamId {
    fn from(id: u32) -> Self {
        StreamId(id)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frame flags byte.
///
/// Bit meanings depend on the frame type; each type accepts only a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(pub u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// DATA, SYN_STREAM, SYN_REPLY, HEADERS: last frame in this direction.
    pub const FIN: Flags = Flags(0x01);
    /// SYN_STREAM: the recipient may not reply on this stream.
    pub const UNIDIRECTIONAL: Flags = Flags(0x02);
    /// SETTINGS: clear previously persisted settings.
    pub const CLEAR_SETTINGS: Flags = Flags(0x01);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check the terminal (FIN) bit.
    #[inline]
    pub fn fin(self) -> bool {
        self.contains(Flags::FIN)
    }

    /// Check if the unidirectional bit is set.
    #[inline]
    pub fn unidirectional(self) -> bool {
        self.contains(Flags::UNIDIRECTIONAL)
    }

    /// Bits set outside `legal`.
    #[inline]
    pub(crate) fn illegal_bits(self, legal: Flags) -> u8 {
        self.0 & !legal.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl From<u8> for Flags {
    fn from(bits: u8) -> Self {
        Flags(bits)
    }
}
