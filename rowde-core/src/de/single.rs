use serde::de::value::BorrowedStrDeserializer;
use serde::de::{Deserialize, Deserializer, Visitor};

use crate::de::RowDeserializer;
use crate::decode::{Decode, DecodeError};
use crate::error::Error;
use crate::path::FieldPath;
use crate::value::RawValue;

static NULL: RawValue = RawValue::Null;

/// One column of a row, seen as a single scalar.
///
/// A missing column reads as null.
#[derive(Debug, Clone)]
pub struct SingleValueView<'r> {
    source: RowDeserializer<'r>,
}

impl<'r> SingleValueView<'r> {
    pub(crate) fn new(source: RowDeserializer<'r>) -> Self {
        SingleValueView { source }
    }

    pub fn path(&self) -> &FieldPath {
        self.source.path()
    }

    /// Returns true if the column is missing or null.
    pub fn is_null(&self) -> bool {
        self.raw().is_null()
    }

    /// Converts the column through `T`'s [`Decode`] impl.
    ///
    /// Errors carry the full path of the field.
    pub fn decode<T>(&self) -> crate::Result<T>
    where
        T: Decode,
    {
        self.convert().map_err(|error| error.within(self.path()))
    }

    /// Decodes the field through `T`'s `Deserialize` impl, from a fresh deserializer at
    /// the same path.
    ///
    /// Errors carry the full path of the field.
    pub fn decode_generic<T>(&self) -> crate::Result<T>
    where
        T: Deserialize<'r>,
    {
        T::deserialize(self.source.clone()).map_err(|error| error.within(self.path()))
    }

    // Errors are relative to this field, for the caller to prefix.
    fn convert<T>(&self) -> crate::Result<T>
    where
        T: Decode,
    {
        T::decode(self.raw()).map_err(|error| Error::from_decode(FieldPath::root(), error))
    }

    fn raw(&self) -> &'r RawValue {
        self.source.column().unwrap_or(&NULL)
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::from_decode(FieldPath::root(), DecodeError::mismatch(expected, self.raw()))
    }
}

macro_rules! deserialize_scalar {
    ($($method:ident => $visit:ident($ty:ty);)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Error>
            where
                V: Visitor<'r>,
            {
                visitor.$visit(self.convert::<$ty>()?)
            }
        )*
    };
}

impl<'r> Deserializer<'r> for SingleValueView<'r> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        match self.raw() {
            RawValue::Null => visitor.visit_none(),
            RawValue::Bool(v) => visitor.visit_bool(*v),
            RawValue::Int(v) => visitor.visit_i64(*v),
            RawValue::UInt(v) => visitor.visit_u64(*v),
            RawValue::Float(v) => visitor.visit_f64(*v),
            RawValue::Text(v) => visitor.visit_borrowed_str(v),
            RawValue::Blob(v) => visitor.visit_borrowed_bytes(v),
        }
    }

    deserialize_scalar! {
        deserialize_bool => visit_bool(bool);
        deserialize_i8 => visit_i8(i8);
        deserialize_i16 => visit_i16(i16);
        deserialize_i32 => visit_i32(i32);
        deserialize_i64 => visit_i64(i64);
        deserialize_u8 => visit_u8(u8);
        deserialize_u16 => visit_u16(u16);
        deserialize_u32 => visit_u32(u32);
        deserialize_u64 => visit_u64(u64);
        deserialize_f32 => visit_f32(f32);
        deserialize_f64 => visit_f64(f64);
        deserialize_char => visit_char(char);
        deserialize_string => visit_string(String);
        deserialize_byte_buf => visit_byte_buf(Vec<u8>);
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        match self.raw() {
            RawValue::Text(v) => visitor.visit_borrowed_str(v),
            _ => Err(self.mismatch("text")),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        match self.raw() {
            RawValue::Blob(v) => visitor.visit_borrowed_bytes(v),
            RawValue::Text(v) => visitor.visit_borrowed_bytes(v.as_bytes()),
            _ => Err(self.mismatch("blob")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        if self.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        if self.is_null() {
            visitor.visit_unit()
        } else {
            Err(self.mismatch("null"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        Err(Error::unsupported(FieldPath::root(), "a sequence"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        Err(Error::unsupported(FieldPath::root(), "a tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        Err(Error::unsupported(FieldPath::root(), "a tuple struct"))
    }

    // A scalar column cannot stand in for a scope.
    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        Err(Error::mismatch(FieldPath::root(), "a scope", self.raw().kind()))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        match self.raw() {
            RawValue::Text(v) => visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(v)),
            _ => Err(self.mismatch("text")),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        visitor.visit_unit()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use crate::de::RowDeserializer;
    use crate::error::Error;
    use crate::options::DEFAULT_OPTIONS;
    use crate::path::FieldPath;
    use crate::row::Row;
    use crate::value::RawValue;

    fn view_of<'r>(row: &'r Row, name: &str) -> super::SingleValueView<'r> {
        RowDeserializer::at(row, FieldPath::from(name), &DEFAULT_OPTIONS).single_value()
    }

    #[test]
    fn it_treats_missing_and_null_columns_as_null() {
        let row = Row::new()
            .with_column("a", RawValue::Null)
            .with_column("b", 0);

        assert!(view_of(&row, "a").is_null());
        assert!(view_of(&row, "missing").is_null());
        assert!(!view_of(&row, "b").is_null());
    }

    #[test]
    fn it_decodes_scalars() -> crate::Result<()> {
        let row = Row::new()
            .with_column("n", 12)
            .with_column("s", "text")
            .with_column("null", RawValue::Null);

        assert_eq!(view_of(&row, "n").decode::<u8>()?, 12);
        assert_eq!(view_of(&row, "s").decode::<String>()?, "text");
        assert_eq!(view_of(&row, "null").decode::<Option<i64>>()?, None);

        assert!(matches!(
            view_of(&row, "null").decode::<i64>(),
            Err(Error::ValueMissing { .. })
        ));
        assert!(matches!(
            view_of(&row, "s").decode::<i64>(),
            Err(Error::TypeMismatch { .. })
        ));

        Ok(())
    }

    #[test]
    fn it_decodes_generic_types_at_the_same_path() -> crate::Result<()> {
        #[derive(Debug, Deserialize, PartialEq)]
        struct UserId(i64);

        let row = Row::new().with_column("id", 5);

        assert_eq!(view_of(&row, "id").decode_generic::<UserId>()?, UserId(5));
        assert_eq!(view_of(&row, "id").path().to_string(), "id");

        Ok(())
    }

    #[test]
    fn it_refuses_to_read_a_column_as_a_record() {
        #[derive(Debug, Deserialize)]
        struct Record {
            #[allow(dead_code)]
            id: i64,
        }

        let row = Row::new().with_column("id", 5);

        assert!(matches!(
            Record::deserialize(view_of(&row, "id")),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            Vec::<i64>::deserialize(view_of(&row, "id")),
            Err(Error::Unsupported { .. })
        ));
    }

    #[test]
    fn it_reports_errors_at_the_field_path() {
        let row = Row::new()
            .with_column("s", "text")
            .with_scope("author", Row::new().with_column("id", "seven"));

        let error = view_of(&row, "s").decode::<i64>().unwrap_err();
        assert_eq!(error.path().to_string(), "s");

        let error = view_of(&row, "missing").decode::<i64>().unwrap_err();
        assert!(matches!(error, Error::ValueMissing { .. }));
        assert_eq!(error.path().to_string(), "missing");

        let error = RowDeserializer::at(&row, FieldPath::from("author"), &DEFAULT_OPTIONS)
            .keyed()
            .and_then(|view| view.field("id").single_value().decode::<i64>())
            .unwrap_err();
        assert_eq!(error.path().to_string(), "author.id");

        let error = view_of(&row, "s").decode_generic::<i64>().unwrap_err();
        assert!(matches!(error, Error::TypeMismatch { .. }));
        assert_eq!(error.path().to_string(), "s");
    }
}
