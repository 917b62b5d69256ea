//! Encoding records into synthetic rows through serde.
//!
//! The shape mirrors what [`from_row`](crate::de::from_row) reads: scalar fields become
//! columns, nested structs and maps become scopes, and `None` becomes a null column.

use serde::ser::{self, Impossible, Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::error::Error;
use crate::path::FieldPath;
use crate::row::Row;
use crate::value::RawValue;

/// Encodes a struct or a map into a [`Row`].
///
/// ```rust
/// use rowde_core::{from_row, to_row};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let row = to_row(&Point { x: 1, y: 2 })?;
///
/// assert_eq!(row.try_get::<i32>("y")?, 2);
/// assert_eq!(from_row::<Point>(&row)?, Point { x: 1, y: 2 });
/// # Ok::<(), rowde_core::Error>(())
/// ```
pub fn to_row<T>(value: &T) -> crate::Result<Row>
where
    T: ?Sized + Serialize,
{
    match value.serialize(ValueSerializer)? {
        Encoded::Scope(row) => Ok(row),
        Encoded::Value(value) => Err(Error::mismatch(
            FieldPath::root(),
            "a struct or a map",
            value.kind(),
        )),
    }
}

enum Encoded {
    Value(RawValue),
    Scope(Row),
}

struct ValueSerializer;

impl ValueSerializer {
    fn value(value: impl Into<RawValue>) -> crate::Result<Encoded> {
        Ok(Encoded::Value(value.into()))
    }
}

impl Serializer for ValueSerializer {
    type Ok = Encoded;
    type Error = Error;

    type SerializeSeq = Impossible<Encoded, Error>;
    type SerializeTuple = Impossible<Encoded, Error>;
    type SerializeTupleStruct = Impossible<Encoded, Error>;
    type SerializeTupleVariant = Impossible<Encoded, Error>;
    type SerializeMap = ScopeSerializer;
    type SerializeStruct = ScopeSerializer;
    type SerializeStructVariant = Impossible<Encoded, Error>;

    fn serialize_bool(self, v: bool) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_i8(self, v: i8) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_i16(self, v: i16) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_i32(self, v: i32) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_i64(self, v: i64) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_u8(self, v: u8) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_u16(self, v: u16) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_u32(self, v: u32) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_u64(self, v: u64) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_f32(self, v: f32) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_f64(self, v: f64) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_char(self, v: char) -> crate::Result<Encoded> {
        Self::value(v.to_string())
    }

    fn serialize_str(self, v: &str) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> crate::Result<Encoded> {
        Self::value(v)
    }

    fn serialize_none(self) -> crate::Result<Encoded> {
        Self::value(RawValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> crate::Result<Encoded>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> crate::Result<Encoded> {
        Self::value(RawValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> crate::Result<Encoded> {
        Self::value(RawValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> crate::Result<Encoded> {
        Self::value(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> crate::Result<Encoded>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> crate::Result<Encoded>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported(FieldPath::root(), "an enum variant with data"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> crate::Result<Self::SerializeSeq> {
        Err(Error::unsupported(FieldPath::root(), "a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> crate::Result<Self::SerializeTuple> {
        Err(Error::unsupported(FieldPath::root(), "a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> crate::Result<Self::SerializeTupleStruct> {
        Err(Error::unsupported(FieldPath::root(), "a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> crate::Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported(FieldPath::root(), "an enum variant with data"))
    }

    fn serialize_map(self, _len: Option<usize>) -> crate::Result<ScopeSerializer> {
        Ok(ScopeSerializer::default())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> crate::Result<ScopeSerializer> {
        Ok(ScopeSerializer::default())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> crate::Result<Self::SerializeStructVariant> {
        Err(Error::unsupported(FieldPath::root(), "an enum variant with data"))
    }
}

#[derive(Default)]
struct ScopeSerializer {
    row: Row,
    key: Option<String>,
}

impl ScopeSerializer {
    fn insert<T>(&mut self, name: &str, value: &T) -> crate::Result<()>
    where
        T: ?Sized + Serialize,
    {
        match value
            .serialize(ValueSerializer)
            .map_err(|error| error.prefixed(name))?
        {
            Encoded::Value(value) => self.row.push_column(name, value),
            Encoded::Scope(scope) => self.row.push_scope(name, scope),
        }

        Ok(())
    }
}

impl SerializeStruct for ScopeSerializer {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> crate::Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key, value)
    }

    fn end(self) -> crate::Result<Encoded> {
        Ok(Encoded::Scope(self.row))
    }
}

impl SerializeMap for ScopeSerializer {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> crate::Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match key.serialize(ValueSerializer)? {
            Encoded::Value(RawValue::Text(key)) => key,
            Encoded::Value(RawValue::Int(key)) => key.to_string(),
            Encoded::Value(RawValue::UInt(key)) => key.to_string(),
            _ => return Err(ser::Error::custom("map keys must be strings or integers")),
        };

        self.key = Some(key);

        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> crate::Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| <Error as ser::Error>::custom("value serialized before its key"))?;

        self.insert(&key, value)
    }

    fn end(self) -> crate::Result<Encoded> {
        Ok(Encoded::Scope(self.row))
    }
}
