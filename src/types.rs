use crate::header::FormatVersion;

/// A single decoded market tick.
///
/// Prices are integers scaled by a caller-chosen factor (10000 by convention,
/// so $1 is stored as 10000). Version 1 files carry no quote fields and no
/// millisecond precision; those decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tick {
    /// Milliseconds since the Unix epoch.
    pub unixtime: u64,
    pub volume: u32,
    pub price: u32,
    pub bid: u32,
    pub ask: u32,
    pub bid_size: u32,
    pub ask_size: u32,
    pub is_market: bool,
}

/// Loosely typed input value, coerced to an integer when a tick is added.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
}

impl RawValue {
    /// Integer value after coercion.
    ///
    /// Floats truncate toward zero, text yields its leading integer (`"150.2"`
    /// gives 150) and anything unparseable gives 0.
    pub fn coerce(&self) -> i64 {
        match self {
            RawValue::Int(v) => *v,
            RawValue::Float(v) if v.is_finite() => v.trunc() as i64,
            RawValue::Float(_) => 0,
            RawValue::Text(s) => parse_leading_int(s),
            RawValue::Missing => 0,
        }
    }

    /// Coerced value saturated into the unsigned 32-bit range.
    pub fn coerce_u32(&self) -> u32 {
        self.coerce().clamp(0, u32::MAX as i64) as u32
    }
}

fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }

    if negative { -value } else { value }
}

macro_rules! raw_value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for RawValue {
            fn from(v: $t) -> Self {
                RawValue::Int(v as i64)
            }
        })*
    };
}

raw_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for RawValue {
    fn from(v: u64) -> Self {
        RawValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        RawValue::Float(v as f64)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawValue::Missing, Into::into)
    }
}

/// Writer input: every numeric field is a [`RawValue`] so feeds with sloppy
/// typing can be stored without pre-cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTick {
    /// Milliseconds since the Unix epoch.
    pub unixtime: RawValue,
    pub volume: RawValue,
    pub price: RawValue,
    pub bid: RawValue,
    pub ask: RawValue,
    pub bid_size: RawValue,
    pub ask_size: RawValue,
    pub is_market: bool,
}

impl From<Tick> for RawTick {
    fn from(t: Tick) -> Self {
        RawTick {
            unixtime: t.unixtime.into(),
            volume: t.volume.into(),
            price: t.price.into(),
            bid: t.bid.into(),
            ask: t.ask.into(),
            bid_size: t.bid_size.into(),
            ask_size: t.ask_size.into(),
            is_market: t.is_market,
        }
    }
}

impl From<&Tick> for RawTick {
    fn from(t: &Tick) -> Self {
        (*t).into()
    }
}

/// Summary of a loaded tick file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickMetadata {
    pub version: FormatVersion,
    pub num_ticks: usize,
    pub compressed_size: usize,
    pub decoded_size: usize,
}
