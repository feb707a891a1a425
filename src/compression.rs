//! Payload compression and integrity digest.
//!
//! Version 2 payloads are zlib streams, version 1 payloads are gzip streams.

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::{MultiGzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use sha2::{Digest, Sha256};

use crate::header::FormatVersion;

/// Default zlib level, matching what most zlib bindings use.
pub const DEFAULT_LEVEL: u32 = 6;

pub fn deflate(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 4),
        Compression::new(level.min(9)),
    );
    encoder.write_all(data)?;
    encoder.finish()
}

pub fn inflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 4);
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

pub fn gunzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 4);
    MultiGzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

pub fn decompress(version: FormatVersion, data: &[u8]) -> io::Result<Vec<u8>> {
    match version {
        FormatVersion::V1 => gunzip(data),
        FormatVersion::V2 => inflate(data),
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;

    fn sample() -> Vec<u8> {
        (0..4096u32).flat_map(|i| (i % 97).to_le_bytes()).collect()
    }

    #[test]
    fn test_deflate_inflate() {
        let data = sample();
        let compressed = deflate(&data, DEFAULT_LEVEL).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn test_deflate_is_deterministic() {
        let data = sample();
        assert_eq!(
            deflate(&data, DEFAULT_LEVEL).unwrap(),
            deflate(&data, DEFAULT_LEVEL).unwrap()
        );
    }

    #[test]
    fn test_gunzip() {
        let data = sample();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data).unwrap();
        let gz = encoder.finish().unwrap();

        assert_eq!(decompress(FormatVersion::V1, &gz).unwrap(), data);
        assert!(decompress(FormatVersion::V2, &gz).is_err());
    }

    #[test]
    fn test_inflate_garbage() {
        assert!(inflate(b"definitely not zlib").is_err());
    }

    #[test]
    fn test_digest() {
        assert_eq!(
            digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
