//! Compact binary storage for market ticks.
//!
//! A tick file is a 1024-byte header holding one JSON line (zero padded),
//! followed by a compressed payload of fixed-size little-endian records.
//!
//! ```text
//! [ header: {"version":2,...}\n 0 0 0 ... ]        1024 bytes
//! [ v1 only: minuteIndexSize bytes of index ]     skipped
//! [ payload: zlib (v2) or gzip (v1) ]             31-byte (v2) / 13-byte (v1) records
//! ```
//!
//! [`TickWriter`] always produces version 2 files. [`TickReader`] reads both.

mod buffer;
mod compression;
mod error;
mod header;
mod persist;
mod reader;
mod record;
mod types;
mod writer;

pub use error::{Error, ErrorKind, FormatError, Result};
pub use header::{FormatVersion, HEADER_SIZE, Header, STORAGE_VERSION};
pub use reader::{TickReader, Ticks};
pub use record::RecordLayout;
pub use types::{RawTick, RawValue, Tick, TickMetadata};
pub use writer::{TickWriter, WriterConfig};
