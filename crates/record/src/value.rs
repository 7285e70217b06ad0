use std::fmt;

use crate::field::NumericKind;
use crate::text::until_nul;

/// A number of one of the supported native widths.
///
/// Equality is numeric: integers of different widths compare by value, and
/// when either side is a float both are compared as `f64`.
#[derive(Debug, Clone, Copy)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn kind(self) -> NumericKind {
        match self {
            Scalar::I8(_) => NumericKind::I8,
            Scalar::I16(_) => NumericKind::I16,
            Scalar::I32(_) => NumericKind::I32,
            Scalar::I64(_) => NumericKind::I64,
            Scalar::U8(_) => NumericKind::U8,
            Scalar::U16(_) => NumericKind::U16,
            Scalar::U32(_) => NumericKind::U32,
            Scalar::U64(_) => NumericKind::U64,
            Scalar::F32(_) => NumericKind::F32,
            Scalar::F64(_) => NumericKind::F64,
        }
    }

    /// Integer value, with floats truncated toward zero.
    ///
    /// `None` for NaN and infinities.
    pub fn as_i128(self) -> Option<i128> {
        match self {
            Scalar::I8(v) => Some(i128::from(v)),
            Scalar::I16(v) => Some(i128::from(v)),
            Scalar::I32(v) => Some(i128::from(v)),
            Scalar::I64(v) => Some(i128::from(v)),
            Scalar::U8(v) => Some(i128::from(v)),
            Scalar::U16(v) => Some(i128::from(v)),
            Scalar::U32(v) => Some(i128::from(v)),
            Scalar::U64(v) => Some(i128::from(v)),
            Scalar::F32(v) => truncate(f64::from(v)),
            Scalar::F64(v) => truncate(v),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::I8(v) => f64::from(v),
            Scalar::I16(v) => f64::from(v),
            Scalar::I32(v) => f64::from(v),
            Scalar::I64(v) => v as f64,
            Scalar::U8(v) => f64::from(v),
            Scalar::U16(v) => f64::from(v),
            Scalar::U32(v) => f64::from(v),
            Scalar::U64(v) => v as f64,
            Scalar::F32(v) => f64::from(v),
            Scalar::F64(v) => v,
        }
    }
}

fn truncate(v: f64) -> Option<i128> {
    v.is_finite().then(|| v.trunc() as i128)
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        if self.kind().is_float() || other.kind().is_float() {
            return self.as_f64() == other.as_f64();
        }
        self.as_i128() == other.as_i128()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => fmt::Display::fmt(v, f),
            Scalar::I16(v) => fmt::Display::fmt(v, f),
            Scalar::I32(v) => fmt::Display::fmt(v, f),
            Scalar::I64(v) => fmt::Display::fmt(v, f),
            Scalar::U8(v) => fmt::Display::fmt(v, f),
            Scalar::U16(v) => fmt::Display::fmt(v, f),
            Scalar::U32(v) => fmt::Display::fmt(v, f),
            Scalar::U64(v) => fmt::Display::fmt(v, f),
            Scalar::F32(v) => fmt::Display::fmt(v, f),
            Scalar::F64(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// A field value or a query probe.
///
/// Text is carried as raw bytes; only the bytes before the first NUL take
/// part in comparisons.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Text(&'a [u8]),
    Scalar(Scalar),
}

impl<'a> Value<'a> {
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Scalar(s) => Some(*s),
            Value::Text(_) => None,
        }
    }

    /// Text bytes up to the first NUL, or `None` for numbers.
    pub fn as_text(&self) -> Option<&'a [u8]> {
        match self {
            Value::Text(bytes) => Some(until_nul(*bytes)),
            Value::Scalar(_) => None,
        }
    }

    /// Type-directed equality: text against text, number against number,
    /// never across kinds.
    pub fn matches(&self, other: &Value<'_>) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => until_nul(a) == until_nul(b),
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a, 'b> PartialEq<Value<'b>> for Value<'a> {
    fn eq(&self, other: &Value<'b>) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(bytes) => f.write_str(&String::from_utf8_lossy(until_nul(bytes))),
            Value::Scalar(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s.as_bytes())
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Text(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Value::Text(bytes)
    }
}
