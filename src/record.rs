//! Fixed-stride record codecs, one per format version.
//!
//! All multi-byte fields are little-endian unsigned integers.
//!
//! ```text
//! field      v1 offset/size   v2 offset/size
//! seconds    0 / 4            0 / 4
//! millis     -                4 / 2
//! volume     4 / 4            6 / 4
//! price      8 / 4            10 / 4
//! bid        -                14 / 4
//! ask        -                18 / 4
//! bid size   -                22 / 4
//! ask size   -                26 / 4
//! flags      12 / 1           30 / 1
//! ```

use crate::header::FormatVersion;
use crate::types::{RawTick, Tick};

const FLAG_MARKET: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    V1,
    V2,
}

impl RecordLayout {
    pub const V1_SIZE: usize = 13;
    pub const V2_SIZE: usize = 31;

    pub fn for_version(version: FormatVersion) -> Self {
        match version {
            FormatVersion::V1 => RecordLayout::V1,
            FormatVersion::V2 => RecordLayout::V2,
        }
    }

    pub fn stride(self) -> usize {
        match self {
            RecordLayout::V1 => Self::V1_SIZE,
            RecordLayout::V2 => Self::V2_SIZE,
        }
    }

    /// Decode the record starting at `offset`. The caller guarantees that a
    /// full stride is available.
    pub fn decode_at(self, buf: &[u8], offset: usize) -> Tick {
        let rec = &buf[offset..offset + self.stride()];
        match self {
            RecordLayout::V1 => Tick {
                unixtime: read_u32(rec, 0) as u64 * 1000,
                volume: read_u32(rec, 4),
                price: read_u32(rec, 8),
                is_market: rec[12] == FLAG_MARKET,
                ..Default::default()
            },
            RecordLayout::V2 => Tick {
                unixtime: read_u32(rec, 0) as u64 * 1000 + read_u16(rec, 4) as u64,
                volume: read_u32(rec, 6),
                price: read_u32(rec, 10),
                bid: read_u32(rec, 14),
                ask: read_u32(rec, 18),
                bid_size: read_u32(rec, 22),
                ask_size: read_u32(rec, 26),
                is_market: rec[30] == FLAG_MARKET,
            },
        }
    }
}

/// Encode one v2 record, or `None` if the tick fails the volume/price filter.
pub fn encode_v2(tick: &RawTick) -> Option<[u8; RecordLayout::V2_SIZE]> {
    let volume = tick.volume.coerce();
    let price = tick.price.coerce();
    if volume < 0 || price < 0 {
        return None;
    }

    let unixtime = tick.unixtime.coerce().max(0);
    let seconds = (unixtime / 1000).min(u32::MAX as i64) as u32;
    let millis = (unixtime % 1000) as u16;

    let mut rec = [0u8; RecordLayout::V2_SIZE];
    rec[0..4].copy_from_slice(&seconds.to_le_bytes());
    rec[4..6].copy_from_slice(&millis.to_le_bytes());
    rec[6..10].copy_from_slice(&saturate(volume).to_le_bytes());
    rec[10..14].copy_from_slice(&saturate(price).to_le_bytes());
    rec[14..18].copy_from_slice(&tick.bid.coerce_u32().to_le_bytes());
    rec[18..22].copy_from_slice(&tick.ask.coerce_u32().to_le_bytes());
    rec[22..26].copy_from_slice(&tick.bid_size.coerce_u32().to_le_bytes());
    rec[26..30].copy_from_slice(&tick.ask_size.coerce_u32().to_le_bytes());
    rec[30] = if tick.is_market { FLAG_MARKET } else { 0 };
    Some(rec)
}

fn saturate(v: i64) -> u32 {
    v.min(u32::MAX as i64) as u32
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}
