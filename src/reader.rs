//! Tick file reader.

use std::fs;
use std::io::{self, Read};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use crate::compression;
use crate::error::{Error, FormatError, Result};
use crate::header::Header;
use crate::record::RecordLayout;
use crate::types::{Tick, TickMetadata};

struct Loaded {
    layout: RecordLayout,
    ticks: Vec<u8>,
    metadata: TickMetadata,
}

/// Reads version 1 and version 2 tick files.
///
/// Call [`load`](Self::load) before anything else; every read method fails
/// with [`Error::NotLoaded`] until a load succeeds.
///
/// ```no_run
/// use tickstore::TickReader;
///
/// let mut reader = TickReader::new("/tmp/LVS/20110104.ticks");
/// reader.load()?;
///
/// let mut total_volume = 0u64;
/// while let Some(tick) = reader.next_tick()? {
///     if tick.is_market {
///         total_volume += tick.volume as u64;
///     }
/// }
/// # Ok::<(), tickstore::Error>(())
/// ```
pub struct TickReader {
    path: PathBuf,
    loaded: Option<Loaded>,
    position: usize,
}

impl TickReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            loaded: None,
            position: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the whole file. Loading again replaces the decoded
    /// ticks and rewinds the cursor.
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Err(Error::NotFound(self.path.clone()));
        }

        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(self.path.clone()),
            _ => Error::Io(e),
        })?;
        self.load_bytes(&bytes)
    }

    /// Same as [`load`](Self::load) but reads the file from `r`.
    pub fn load_from<R: Read>(&mut self, mut r: R) -> Result<()> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        self.load_bytes(&bytes)
    }

    fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let header = Header::decode(bytes)?;
        let version = header.format_version()?;
        let layout = RecordLayout::for_version(version);

        let offset = header.payload_offset(bytes.len())?;
        let compressed = &bytes[offset..];

        let ticks =
            compression::decompress(version, compressed).map_err(FormatError::Decompress)?;

        let stride = layout.stride();
        if ticks.len() % stride != 0 {
            return Err(FormatError::PartialRecord {
                len: ticks.len(),
                stride,
            }
            .into());
        }
        let num_ticks = ticks.len() / stride;

        if let Some(expected) = header.count {
            if expected != num_ticks as u64 {
                return Err(FormatError::CountMismatch {
                    expected,
                    actual: num_ticks as u64,
                }
                .into());
            }
        }
        if let Some(sha256) = &header.sha256 {
            if !sha256.eq_ignore_ascii_case(&compression::digest(&ticks)) {
                return Err(FormatError::ChecksumMismatch.into());
            }
        }

        log::debug!(
            "loaded {} v{} ticks from {} ({} compressed bytes)",
            num_ticks,
            version.as_u32(),
            self.path.display(),
            compressed.len()
        );

        self.loaded = Some(Loaded {
            layout,
            metadata: TickMetadata {
                version,
                num_ticks,
                compressed_size: compressed.len(),
                decoded_size: ticks.len(),
            },
            ticks,
        });
        self.position = 0;
        Ok(())
    }

    fn loaded(&self, op: &'static str) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or(Error::NotLoaded(op))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Number of ticks; 0 until loaded.
    pub fn len(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.metadata.num_ticks)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metadata(&self) -> Result<&TickMetadata> {
        Ok(&self.loaded("metadata")?.metadata)
    }

    /// Tick at `position`, or `None` past the end. Does not move the cursor.
    pub fn tick_at(&self, position: usize) -> Result<Option<Tick>> {
        let loaded = self.loaded("tick_at")?;
        Ok(decode(loaded, position))
    }

    /// Tick at the cursor, advancing it. Returns `None` once every tick has
    /// been read, and keeps returning `None` after that.
    pub fn next_tick(&mut self) -> Result<Option<Tick>> {
        let loaded = self.loaded("next_tick")?;
        let tick = decode(loaded, self.position);
        if tick.is_some() {
            self.position += 1;
        }
        Ok(tick)
    }

    /// Cursor position used by [`next_tick`](Self::next_tick).
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Decoded records, one fixed-stride struct per tick, for bulk consumers.
    ///
    /// Version 2 records are 31 bytes: seconds (4), milliseconds (2), volume
    /// (4), price (4), bid (4), ask (4), bid size (4), ask size (4), flags
    /// (1). Version 1 records are 13 bytes: seconds, volume, price, flags.
    pub fn buffer(&self) -> Result<&[u8]> {
        Ok(&self.loaded("buffer")?.ticks)
    }

    /// Iterate over all ticks without touching the cursor.
    pub fn ticks(&self) -> Result<Ticks<'_>> {
        Ok(Ticks {
            loaded: self.loaded("ticks")?,
            current: 0,
        })
    }
}

fn decode(loaded: &Loaded, position: usize) -> Option<Tick> {
    (position < loaded.metadata.num_ticks)
        .then(|| loaded.layout.decode_at(&loaded.ticks, position * loaded.layout.stride()))
}

/// Iterator over the ticks of a loaded [`TickReader`].
pub struct Ticks<'a> {
    loaded: &'a Loaded,
    current: usize,
}

impl Iterator for Ticks<'_> {
    type Item = Tick;

    fn next(&mut self) -> Option<Self::Item> {
        let tick = decode(self.loaded, self.current)?;
        self.current += 1;
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.loaded.metadata.num_ticks - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ticks<'_> {}

impl FusedIterator for Ticks<'_> {}
