use std::io::{self, Read, Write};

use crate::value::{Scalar, Value};

/// Native numeric type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumericKind {
    /// Encoded width in bytes.
    pub const fn byte_size(self) -> usize {
        match self {
            NumericKind::I8 | NumericKind::U8 => 1,
            NumericKind::I16 | NumericKind::U16 => 2,
            NumericKind::I32 | NumericKind::U32 | NumericKind::F32 => 4,
            NumericKind::I64 | NumericKind::U64 | NumericKind::F64 => 8,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }
}

/// Kind tag of a record field, used to dispatch comparison, assignment and
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// NUL-terminated text in a buffer of `capacity` bytes.
    Text { capacity: usize },
    /// Fixed-width number.
    Scalar(NumericKind),
}

impl FieldKind {
    /// Static encoded size of a field of this kind.
    pub const fn byte_size(self) -> usize {
        match self {
            FieldKind::Text { capacity } => capacity,
            FieldKind::Scalar(kind) => kind.byte_size(),
        }
    }
}

/// Object-safe access to one field of a record.
pub trait Field {
    fn kind(&self) -> FieldKind;

    /// Borrowed view of the current value.
    fn value(&self) -> Value<'_>;

    /// Overwrites the field with `value` when the kinds are compatible.
    ///
    /// Returns `false`, leaving the field untouched, when the value cannot be
    /// stored: text into a number, a number into text, or a value outside
    /// the target range. Floats stored into integer fields are truncated
    /// toward zero first.
    fn assign(&mut self, value: &Value<'_>) -> bool;

    /// Writes exactly `kind().byte_size()` bytes, little-endian.
    fn encode(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Reads exactly `kind().byte_size()` bytes written by [`Field::encode`].
    fn decode(&mut self, input: &mut dyn Read) -> io::Result<()>;
}

/// A concrete field type with a kind known at compile time.
pub trait FieldType: Field + Default {
    const KIND: FieldKind;
}

macro_rules! integer_fields {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Field for $ty {
            fn kind(&self) -> FieldKind {
                <$ty as FieldType>::KIND
            }

            fn value(&self) -> Value<'_> {
                Value::Scalar(Scalar::$kind(*self))
            }

            fn assign(&mut self, value: &Value<'_>) -> bool {
                let converted = value
                    .as_scalar()
                    .and_then(Scalar::as_i128)
                    .and_then(|v| <$ty>::try_from(v).ok());
                match converted {
                    Some(v) => {
                        *self = v;
                        true
                    }
                    None => false,
                }
            }

            fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
                out.write_all(&self.to_le_bytes())
            }

            fn decode(&mut self, input: &mut dyn Read) -> io::Result<()> {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                input.read_exact(&mut raw)?;
                *self = <$ty>::from_le_bytes(raw);
                Ok(())
            }
        }

        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::Scalar(NumericKind::$kind);
        }

        impl From<$ty> for Value<'_> {
            fn from(v: $ty) -> Self {
                Value::Scalar(Scalar::$kind(v))
            }
        }
    )*};
}

macro_rules! float_fields {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Field for $ty {
            fn kind(&self) -> FieldKind {
                <$ty as FieldType>::KIND
            }

            fn value(&self) -> Value<'_> {
                Value::Scalar(Scalar::$kind(*self))
            }

            fn assign(&mut self, value: &Value<'_>) -> bool {
                match value.as_scalar() {
                    Some(s) => {
                        *self = s.as_f64() as $ty;
                        true
                    }
                    None => false,
                }
            }

            fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
                out.write_all(&self.to_le_bytes())
            }

            fn decode(&mut self, input: &mut dyn Read) -> io::Result<()> {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                input.read_exact(&mut raw)?;
                *self = <$ty>::from_le_bytes(raw);
                Ok(())
            }
        }

        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::Scalar(NumericKind::$kind);
        }

        impl From<$ty> for Value<'_> {
            fn from(v: $ty) -> Self {
                Value::Scalar(Scalar::$kind(v))
            }
        }
    )*};
}

integer_fields! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

float_fields! {
    f32 => F32,
    f64 => F64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_sizes_match_native_widths() {
        assert_eq!(i8::KIND.byte_size(), 1);
        assert_eq!(u16::KIND.byte_size(), 2);
        assert_eq!(f32::KIND.byte_size(), 4);
        assert_eq!(u64::KIND.byte_size(), 8);
        assert_eq!(FieldKind::Text { capacity: 30 }.byte_size(), 30);
    }

    #[test]
    fn integer_assign_checks_range() {
        let mut v: u8 = 1;
        assert!(v.assign(&Value::from(200i32)));
        assert_eq!(v, 200);
        assert!(!v.assign(&Value::from(300i32)));
        assert!(!v.assign(&Value::from(-1i64)));
        assert_eq!(v, 200);
    }

    #[test]
    fn integer_refuses_text() {
        let mut v: i32 = 5;
        assert!(!v.assign(&Value::from("7")));
        assert_eq!(v, 5);
    }

    #[test]
    fn integer_truncates_floats() {
        let mut v: i32 = 5;
        assert!(v.assign(&Value::from(7.9f64)));
        assert_eq!(v, 7);
        assert!(v.assign(&Value::from(-2.5f32)));
        assert_eq!(v, -2);

        let mut small: u8 = 1;
        assert!(!small.assign(&Value::from(256.0f64)));
        assert!(!small.assign(&Value::from(-1.5f64)));
        assert!(!small.assign(&Value::from(f64::NAN)));
        assert_eq!(small, 1);
    }

    #[test]
    fn float_accepts_any_number() {
        let mut v: f64 = 0.0;
        assert!(v.assign(&Value::from(3u8)));
        assert_eq!(v, 3.0);
        assert!(v.assign(&Value::from(1.5f32)));
        assert_eq!(v, 1.5);
        assert!(!v.assign(&Value::from("1.5")));
    }

    #[test]
    fn encode_is_little_endian() {
        let mut out = Vec::new();
        0x0102_0304u32.encode(&mut out).unwrap();
        assert_eq!(out, vec![0x04, 0x03, 0x02, 0x01]);

        let mut back = 0u32;
        back.decode(&mut out.as_slice()).unwrap();
        assert_eq!(back, 0x0102_0304);
    }

    #[test]
    fn decode_short_input_fails() {
        let mut v = 0i64;
        let err = v.decode(&mut [1u8, 2, 3].as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
