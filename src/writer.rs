//! Tick file writer.

use std::io::Write;
use std::path::Path;

use crate::buffer::TickBuffer;
use crate::compression::{self, DEFAULT_LEVEL};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::persist;
use crate::record::{self, RecordLayout};
use crate::types::RawTick;

/// Configuration for tick writing.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Initial size of the in-memory record buffer in bytes.
    pub initial_capacity: usize,
    /// zlib compression level (0-9).
    pub compression_level: u32,
    /// Store a SHA-256 of the decoded payload in the header.
    pub checksum: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 10 * 1024 * 1024,
            compression_level: DEFAULT_LEVEL,
            checksum: true,
        }
    }
}

/// Accumulates ticks in memory and saves them as a version 2 tick file.
///
/// Usage:
/// ```no_run
/// use tickstore::{RawTick, TickWriter};
///
/// let mut writer = TickWriter::new();
/// writer.add_tick(RawTick {
///     unixtime: 1_294_134_747_123u64.into(),
///     volume: 100.into(),
///     price: 465000.into(),
///     is_market: true,
///     ..Default::default()
/// });
/// writer.save("/tmp/LVS/20110104.ticks")?;
/// # Ok::<(), tickstore::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TickWriter {
    buffer: TickBuffer,
    config: WriterConfig,
    num_ticks: usize,
}

impl Default for TickWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickWriter {
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            buffer: TickBuffer::with_capacity(config.initial_capacity),
            config,
            num_ticks: 0,
        }
    }

    /// Append a tick.
    ///
    /// Returns false if the tick was dropped because its volume or price is
    /// negative after coercion.
    pub fn add_tick(&mut self, tick: impl Into<RawTick>) -> bool {
        match record::encode_v2(&tick.into()) {
            Some(rec) => {
                self.buffer.extend_from_slice(&rec);
                self.num_ticks += 1;
                true
            }
            None => false,
        }
    }

    /// Number of ticks retained so far.
    pub fn len(&self) -> usize {
        self.num_ticks
    }

    pub fn is_empty(&self) -> bool {
        self.num_ticks == 0
    }

    /// Current buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Header followed by the compressed payload.
    ///
    /// Only the written prefix of the buffer is compressed, and the same
    /// buffer always produces the same bytes.
    pub fn finalize(&self) -> Result<Vec<u8>> {
        let payload = self.buffer.as_slice();
        debug_assert_eq!(payload.len(), self.num_ticks * RecordLayout::V2_SIZE);

        let sha256 = self
            .config
            .checksum
            .then(|| compression::digest(payload));
        let header = Header::new(self.num_ticks as u64, sha256).encode()?;

        let compressed = compression::deflate(payload, self.config.compression_level)
            .map_err(Error::Compression)?;

        let mut out = Vec::with_capacity(header.len() + compressed.len());
        out.extend_from_slice(&header);
        out.extend_from_slice(&compressed);
        Ok(out)
    }

    /// Atomically replace `path` with the tick file, creating parent
    /// directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.finalize()?;
        persist::write_atomic(path, &bytes)?;
        log::debug!(
            "saved {} ticks ({} bytes) to {}",
            self.num_ticks,
            bytes.len(),
            path.display()
        );
        Ok(())
    }

    /// Write the tick file to `w`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize> {
        let bytes = self.finalize()?;
        w.write_all(&bytes)?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HEADER_SIZE;
    use crate::types::Tick;

    fn tick(price: u32) -> Tick {
        Tick {
            unixtime: 1_700_000_000_250,
            volume: 10,
            price,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_tick_filters() {
        let mut writer = TickWriter::new();
        assert!(writer.add_tick(tick(1)));
        assert!(!writer.add_tick(RawTick {
            volume: (-1).into(),
            price: 1.into(),
            ..Default::default()
        }));
        assert!(!writer.add_tick(RawTick {
            volume: 1.into(),
            price: (-1).into(),
            ..Default::default()
        }));
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn test_buffer_growth() {
        let mut writer = TickWriter::with_config(WriterConfig {
            initial_capacity: 62,
            ..Default::default()
        });
        writer.add_tick(tick(1));
        writer.add_tick(tick(2));
        assert_eq!(writer.capacity(), 62);

        writer.add_tick(tick(3));
        assert_eq!(writer.capacity(), 124);
        assert_eq!(writer.len(), 3);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut writer = TickWriter::new();
        for p in 0..100 {
            writer.add_tick(tick(p));
        }

        let first = writer.finalize().unwrap();
        let second = writer.finalize().unwrap();
        assert_eq!(first, second);
        assert!(first.len() > HEADER_SIZE);
    }

    #[test]
    fn test_finalize_header() {
        let mut writer = TickWriter::with_config(WriterConfig {
            checksum: false,
            ..Default::default()
        });
        writer.add_tick(tick(5));

        let bytes = writer.finalize().unwrap();
        let header = Header::decode(&bytes).unwrap();
        assert_eq!(header.version, 2);
        assert_eq!(header.count, Some(1));
        assert_eq!(header.sha256, None);

        let payload = compression::inflate(&bytes[HEADER_SIZE..]).unwrap();
        assert_eq!(payload.len(), RecordLayout::V2_SIZE);
    }

    #[test]
    fn test_write_to() {
        let mut writer = TickWriter::new();
        writer.add_tick(tick(5));

        let mut out = Vec::new();
        let written = writer.write_to(&mut out).unwrap();
        assert_eq!(written, out.len());
        assert_eq!(out, writer.finalize().unwrap());
    }

    #[test]
    fn test_empty_writer() {
        let writer = TickWriter::new();
        assert!(writer.is_empty());
        let bytes = writer.finalize().unwrap();
        let payload = compression::inflate(&bytes[HEADER_SIZE..]).unwrap();
        assert!(payload.is_empty());
    }
}
