//! Types and traits for decoding values from the database.

use std::convert::TryFrom;
use std::fmt::{self, Display};

use crate::error::BoxDynError;
use crate::value::RawValue;

/// Decode a single value from a column.
///
/// Implementing this trait is what registers a type as a scalar converter: wherever a
/// field of such a type is read from a row, the raw column value is converted directly
/// and generic record decoding is never attempted.
pub trait Decode: Sized {
    fn decode(value: &RawValue) -> Result<Self, DecodeError>;
}

/// The ways a single raw value can fail to convert.
#[derive(Debug)]
pub enum DecodeError {
    /// The value was null and the target type does not admit null.
    UnexpectedNull,

    /// The value's storage kind cannot represent the target type.
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Any other conversion failure (out of range, unparsable text, ...).
    Other(BoxDynError),
}

impl DecodeError {
    pub fn mismatch(expected: &'static str, value: &RawValue) -> Self {
        if value.is_null() {
            DecodeError::UnexpectedNull
        } else {
            DecodeError::Mismatch {
                expected,
                found: value.kind(),
            }
        }
    }

    pub fn other(error: impl Into<BoxDynError>) -> Self {
        DecodeError::Other(error.into())
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedNull => f.write_str("unexpected null"),

            DecodeError::Mismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }

            DecodeError::Other(error) => Display::fmt(error, f),
        }
    }
}

impl std::error::Error for DecodeError {}

// implement `Decode` for Option<T> for all column types
impl<T> Decode for Option<T>
where
    T: Decode,
{
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::decode(value).map(Some)
        }
    }
}

impl Decode for RawValue {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl Decode for bool {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        match *value {
            RawValue::Bool(v) => Ok(v),
            RawValue::Int(0) | RawValue::UInt(0) => Ok(false),
            RawValue::Int(1) | RawValue::UInt(1) => Ok(true),
            _ => Err(DecodeError::mismatch("bool", value)),
        }
    }
}

macro_rules! impl_decode_for_integer {
    ($($ty:ident),*) => {
        $(
            impl Decode for $ty {
                fn decode(value: &RawValue) -> Result<Self, DecodeError> {
                    let result = match *value {
                        RawValue::Int(v) => $ty::try_from(v).ok(),
                        RawValue::UInt(v) => $ty::try_from(v).ok(),
                        RawValue::Float(v) if v.fract() == 0.0 => float_to_integer(v),
                        _ => return Err(DecodeError::mismatch(stringify!($ty), value)),
                    };

                    result.ok_or_else(|| {
                        DecodeError::other(format!(
                            "{:?} is out of range for {}",
                            value,
                            stringify!($ty)
                        ))
                    })
                }
            }
        )*
    };
}

impl_decode_for_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

// Only integral floats that fit in an i64 or u64 without loss convert.
fn float_to_integer<T>(v: f64) -> Option<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63

    if v >= -LIMIT && v < LIMIT {
        T::try_from(v as i64).ok()
    } else if v >= 0.0 && v < LIMIT * 2.0 {
        T::try_from(v as u64).ok()
    } else {
        None
    }
}

impl Decode for f64 {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        match *value {
            RawValue::Float(v) => Ok(v),
            RawValue::Int(v) => Ok(v as f64),
            RawValue::UInt(v) => Ok(v as f64),
            _ => Err(DecodeError::mismatch("f64", value)),
        }
    }
}

impl Decode for f32 {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        match *value {
            RawValue::Float(v) => Ok(v as f32),
            RawValue::Int(v) => Ok(v as f32),
            RawValue::UInt(v) => Ok(v as f32),
            _ => Err(DecodeError::mismatch("f32", value)),
        }
    }
}

impl Decode for String {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        match value {
            RawValue::Text(v) => Ok(v.clone()),
            _ => Err(DecodeError::mismatch("text", value)),
        }
    }
}

impl Decode for char {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        let text = match value {
            RawValue::Text(v) => v,
            _ => return Err(DecodeError::mismatch("char", value)),
        };

        let mut chars = text.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DecodeError::other(format!(
                "expected a single character, found {:?}",
                text
            ))),
        }
    }
}

impl Decode for Vec<u8> {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        match value {
            RawValue::Blob(v) => Ok(v.clone()),
            RawValue::Text(v) => Ok(v.as_bytes().to_vec()),
            _ => Err(DecodeError::mismatch("blob", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Decode, DecodeError};
    use crate::value::RawValue;

    #[test]
    fn it_decodes_integers_within_range() {
        assert_eq!(i8::decode(&RawValue::Int(-128)).unwrap(), -128);
        assert_eq!(u16::decode(&RawValue::UInt(65_535)).unwrap(), 65_535);
        assert_eq!(u64::decode(&RawValue::Int(7)).unwrap(), 7);
        assert_eq!(i64::decode(&RawValue::Float(3.0)).unwrap(), 3);

        assert!(matches!(
            u8::decode(&RawValue::Int(256)),
            Err(DecodeError::Other(_))
        ));
        assert!(matches!(
            u32::decode(&RawValue::Int(-1)),
            Err(DecodeError::Other(_))
        ));
        assert!(matches!(
            i32::decode(&RawValue::Float(1.5)),
            Err(DecodeError::Mismatch { .. })
        ));
    }

    #[test]
    fn it_rejects_mismatched_kinds() {
        assert!(matches!(
            i32::decode(&RawValue::Text("1".into())),
            Err(DecodeError::Mismatch {
                expected: "i32",
                found: "text"
            })
        ));
        assert!(matches!(
            String::decode(&RawValue::Int(1)),
            Err(DecodeError::Mismatch { .. })
        ));
        assert!(matches!(
            bool::decode(&RawValue::Int(2)),
            Err(DecodeError::Mismatch { .. })
        ));
    }

    #[test]
    fn it_reports_null_as_unexpected() {
        assert!(matches!(
            i64::decode(&RawValue::Null),
            Err(DecodeError::UnexpectedNull)
        ));
        assert_eq!(Option::<i64>::decode(&RawValue::Null).unwrap(), None);
        assert_eq!(Option::<i64>::decode(&RawValue::Int(4)).unwrap(), Some(4));
    }

    #[test]
    fn it_decodes_other_scalars() {
        assert!(bool::decode(&RawValue::Int(1)).unwrap());
        assert!(!bool::decode(&RawValue::Bool(false)).unwrap());
        assert_eq!(f64::decode(&RawValue::Int(2)).unwrap(), 2.0);
        assert_eq!(f32::decode(&RawValue::Float(0.5)).unwrap(), 0.5);
        assert_eq!(char::decode(&RawValue::Text("x".into())).unwrap(), 'x');
        assert!(char::decode(&RawValue::Text("xy".into())).is_err());
        assert_eq!(
            Vec::<u8>::decode(&RawValue::Text("ab".into())).unwrap(),
            b"ab".to_vec()
        );
    }
}
