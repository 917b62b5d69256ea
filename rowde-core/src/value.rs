//! Raw storage values as they come out of a row.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// A single nullable value stored in a column.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Name of the storage kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Int(_) => "integer",
            RawValue::UInt(_) => "unsigned integer",
            RawValue::Float(_) => "float",
            RawValue::Text(_) => "text",
            RawValue::Blob(_) => "blob",
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Null
    }
}

macro_rules! impl_from_for_raw_value {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    RawValue::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_for_raw_value!(Bool: bool);
impl_from_for_raw_value!(Int: i8, i16, i32, i64);
impl_from_for_raw_value!(UInt: u8, u16, u32, u64);
impl_from_for_raw_value!(Float: f32, f64);
impl_from_for_raw_value!(Text: String, &str);
impl_from_for_raw_value!(Blob: Vec<u8>, &[u8]);

impl<T> From<Option<T>> for RawValue
where
    T: Into<RawValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

// Lets a `Decode` converter sit behind any self-describing deserializer,
// see `de::decode`.
impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawValueVisitor;

        impl<'de> Visitor<'de> for RawValueVisitor {
            type Value = RawValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a raw column value")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawValue, E> {
                Ok(RawValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
                Ok(RawValue::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
                Ok(RawValue::UInt(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
                Ok(RawValue::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
                Ok(RawValue::Text(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
                Ok(RawValue::Text(v))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<RawValue, E> {
                Ok(RawValue::Blob(v.to_vec()))
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<RawValue, E> {
                Ok(RawValue::Blob(v))
            }

            fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
                Ok(RawValue::Null)
            }

            fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
                Ok(RawValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<RawValue, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawValue::deserialize(deserializer)
            }
        }

        deserializer.deserialize_any(RawValueVisitor)
    }
}
