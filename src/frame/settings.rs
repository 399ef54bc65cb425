//! SETTINGS frame.
//!
//! ```text
//! +----------------------------------+
//! |1|   version    |         4       |
//! +----------------------------------+
//! | Flags (8)  |  Length (24 bits)   |
//! +----------------------------------+
//! |         Number of entries        |
//! +----------------------------------+
//! |          ID/Value Pairs          |
//! |             ...                  |
//! ```
//!
//! Each entry is one byte of flags, a 24-bit id and a 32-bit value.

use std::fmt;
use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};

use super::dump;
use super::error::Error;
use super::types::{Flags, FrameType};
use super::validate::{
    check_flags, expect_min_length, read_control_header, skip_payload, write_control,
};
use super::HEADER_SIZE;
use crate::wire::{read_exact_into, read_exactly, read_u24, read_u32};

const COUNT_LEN: usize = 4;
const ENTRY_LEN: usize = 8;
const MAX_SETTING_ID: u32 = 0xFF_FFFF;

/// Known setting identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingId {
    UploadBandwidth,
    DownloadBandwidth,
    RoundTripTime,
    MaxConcurrentStreams,
    CurrentCwnd,
    DownloadRetransRate,
    InitialWindowSize,
    ClientCertificateVectorSize,
    Unknown(u32),
}

impl SettingId {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => SettingId::UploadBandwidth,
            2 => SettingId::DownloadBandwidth,
            3 => SettingId::RoundTripTime,
            4 => SettingId::MaxConcurrentStreams,
            5 => SettingId::CurrentCwnd,
            6 => SettingId::DownloadRetransRate,
            7 => SettingId::InitialWindowSize,
            8 => SettingId::ClientCertificateVectorSize,
            other => SettingId::Unknown(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            SettingId::UploadBandwidth => 1,
            SettingId::DownloadBandwidth => 2,
            SettingId::RoundTripTime => 3,
            SettingId::MaxConcurrentStreams => 4,
            SettingId::CurrentCwnd => 5,
            SettingId::DownloadRetransRate => 6,
            SettingId::InitialWindowSize => 7,
            SettingId::ClientCertificateVectorSize => 8,
            SettingId::Unknown(code) => code,
        }
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingId::UploadBandwidth => "UPLOAD_BANDWIDTH",
            SettingId::DownloadBandwidth => "DOWNLOAD_BANDWIDTH",
            SettingId::RoundTripTime => "ROUND_TRIP_TIME",
            SettingId::MaxConcurrentStreams => "MAX_CONCURRENT_STREAMS",
            SettingId::CurrentCwnd => "CURRENT_CWND",
            SettingId::DownloadRetransRate => "DOWNLOAD_RETRANS_RATE",
            SettingId::InitialWindowSize => "INITIAL_WINDOW_SIZE",
            SettingId::ClientCertificateVectorSize => "CLIENT_CERTIFICATE_VECTOR_SIZE",
            SettingId::Unknown(code) => return write!(f, "UNKNOWN({code})"),
        };
        f.write_str(name)
    }
}

/// One id/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub flags: u8,
    pub id: SettingId,
    pub value: u32,
}

impl Setting {
    /// Ask the recipient to persist this value.
    pub const PERSIST_VALUE: u8 = 0x1;
    /// This value was persisted earlier and is being returned.
    pub const PERSISTED: u8 = 0x2;

    const LEGAL_FLAGS: u8 = Self::PERSIST_VALUE | Self::PERSISTED;

    pub fn new(id: SettingId, value: u32) -> Self {
        Self {
            flags: 0,
            id,
            value,
        }
    }

    fn check(&self) -> Result<(), Error> {
        if self.flags & !Self::LEGAL_FLAGS != 0 {
            return Err(Error::InvalidField {
                field: "setting flags",
                value: self.flags as u32,
                mask: Self::LEGAL_FLAGS as u32,
            });
        }
        if self.id.code() > MAX_SETTING_ID {
            return Err(Error::InvalidField {
                field: "setting id",
                value: self.id.code(),
                mask: MAX_SETTING_ID,
            });
        }
        Ok(())
    }
}

/// SETTINGS frame (type=4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsFrame {
    pub flags: Flags,
    pub settings: Vec<Setting>,
}

impl SettingsFrame {
    pub const LEGAL_FLAGS: Flags = Flags::CLEAR_SETTINGS;

    pub fn new(settings: Vec<Setting>) -> Self {
        Self {
            flags: Flags::NONE,
            settings,
        }
    }

    pub fn name(&self) -> &'static str {
        "SETTINGS"
    }

    pub fn clear_settings(&self) -> bool {
        self.flags.contains(Flags::CLEAR_SETTINGS)
    }

    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        let header = read_control_header(reader, FrameType::Settings, Self::LEGAL_FLAGS)?;
        expect_min_length(reader, &header, COUNT_LEN)?;

        let mut count = [0u8; COUNT_LEN];
        read_exact_into(reader, &mut count)?;
        let count = read_u32(&count) as u64;

        let remaining = header.length - COUNT_LEN;
        let expected = COUNT_LEN as u64 + count * ENTRY_LEN as u64;
        if expected != header.length as u64 {
            let err = Error::IncorrectDataLength {
                got: header.length,
                expected: usize::try_from(expected).unwrap_or(usize::MAX),
            };
            return Err(skip_payload(reader, remaining, err));
        }

        let payload = read_exactly(reader, remaining)?;
        let settings = payload
            .chunks_exact(ENTRY_LEN)
            .map(|entry| Setting {
                flags: entry[0],
                id: SettingId::from_code(read_u24(&entry[1..4])),
                value: read_u32(&entry[4..8]),
            })
            .collect::<Vec<_>>();

        for setting in &settings {
            setting.check()?;
        }

        self.flags = header.flags;
        self.settings = settings;

        Ok(HEADER_SIZE + header.length)
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, Error> {
        check_flags(self.flags, Self::LEGAL_FLAGS)?;

        let mut fields = BytesMut::with_capacity(COUNT_LEN + self.settings.len() * ENTRY_LEN);
        fields.put_u32(self.settings.len() as u32);
        for setting in &self.settings {
            setting.check()?;
            fields.put_u32((setting.flags as u32) << 24 | setting.id.code());
            fields.put_u32(setting.value);
        }

        write_control(writer, FrameType::Settings, self.flags, &fields, &[])
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump::open(f, self.name())?;
        dump::field(
            f,
            "Flags",
            dump::flag_names(self.flags, &[(Flags::CLEAR_SETTINGS, "FLAG_CLEAR_SETTINGS")]),
        )?;
        dump::field(f, "Settings", self.settings.len())?;
        for setting in &self.settings {
            dump::field(f, &setting.id.to_string(), setting.value)?;
        }
        dump::close(f)
    }
}
