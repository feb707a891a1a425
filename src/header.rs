//! Fixed-size file header: one JSON line, zero padded to [`HEADER_SIZE`].

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Size of the header region at the start of every tick file.
pub const HEADER_SIZE: usize = 1024;

/// Version written by [`TickWriter`](crate::TickWriter).
pub const STORAGE_VERSION: u32 = 2;

/// On-disk format version, selected once per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    /// Legacy: gzip payload behind a minute index, 13-byte records.
    V1,
    /// Current: zlib payload right after the header, 31-byte records.
    V2,
}

impl FormatVersion {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            FormatVersion::V1 => 1,
            FormatVersion::V2 => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    /// Length of the v1 minute index that sits between header and payload.
    #[serde(
        rename = "minuteIndexSize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub minute_index_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Hex SHA-256 of the decompressed payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl Header {
    pub fn new(count: u64, sha256: Option<String>) -> Self {
        Self {
            version: STORAGE_VERSION,
            minute_index_size: None,
            count: Some(count),
            sha256,
        }
    }

    pub fn format_version(&self) -> Result<FormatVersion, FormatError> {
        FormatVersion::from_u32(self.version).ok_or(FormatError::UnsupportedVersion(self.version))
    }

    /// Offset of the compressed payload in a file of `file_len` bytes.
    pub fn payload_offset(&self, file_len: usize) -> Result<usize, FormatError> {
        let index_size = match self.version {
            1 => self.minute_index_size.unwrap_or(0),
            _ => 0,
        };

        usize::try_from(index_size)
            .ok()
            .and_then(|size| HEADER_SIZE.checked_add(size))
            .filter(|&offset| offset <= file_len)
            .ok_or(FormatError::Truncated { len: file_len })
    }

    /// Serialize into a zero-padded block of exactly [`HEADER_SIZE`] bytes.
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        if line.len() > HEADER_SIZE {
            return Err(FormatError::HeaderTooLarge(line.len()));
        }

        let mut buf = vec![0u8; HEADER_SIZE];
        buf[..line.len()].copy_from_slice(&line);
        Ok(buf)
    }

    /// Parse the first line of the header region of `file`.
    pub fn decode(file: &[u8]) -> Result<Self, FormatError> {
        if file.len() < HEADER_SIZE {
            return Err(FormatError::Truncated { len: file.len() });
        }

        let region = &file[..HEADER_SIZE];
        let end = region
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(FormatError::UnterminatedHeader)?;

        Ok(serde_json::from_slice(&region[..end])?)
    }
}
