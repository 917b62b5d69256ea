//! Decoding rows through serde.
//!
//! [`RowDeserializer`] is the entry point of the generic decoding protocol. Depending on
//! what the target type asks for, it hands out a [`KeyedView`] of the row's columns and
//! scopes (for structs and maps) or a [`SingleValueView`] of one column (for scalars).
//!
//! ```rust
//! use rowde_core::{from_row, Row};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Book {
//!     id: i64,
//!     title: String,
//!     author: Author,
//!     subtitle: Option<String>,
//! }
//!
//! #[derive(Deserialize)]
//! struct Author {
//!     name: String,
//! }
//!
//! let row = Row::new()
//!     .with_column("id", 1)
//!     .with_column("title", "Dune")
//!     .with_scope("author", Row::new().with_column("name", "Frank Herbert"));
//!
//! let book: Book = from_row(&row)?;
//!
//! assert_eq!(book.author.name, "Frank Herbert");
//! assert_eq!(book.subtitle, None);
//! # Ok::<(), rowde_core::Error>(())
//! ```

use std::any::type_name;
use std::convert::Infallible;

use serde::de::{self, Deserialize, Deserializer, Visitor};

use crate::decode::Decode;
use crate::error::Error;
use crate::options::{DecodeOptions, DEFAULT_OPTIONS};
use crate::path::FieldPath;
use crate::row::Row;
use crate::value::RawValue;

mod keyed;
mod single;

pub use keyed::KeyedView;
pub use single::SingleValueView;

/// Decodes a `T` from a row with the default options.
pub fn from_row<'r, T>(row: &'r Row) -> crate::Result<T>
where
    T: Deserialize<'r>,
{
    from_row_with(row, &DEFAULT_OPTIONS)
}

/// Decodes a `T` from a row.
pub fn from_row_with<'r, T>(row: &'r Row, options: &'r DecodeOptions) -> crate::Result<T>
where
    T: Deserialize<'r>,
{
    log::trace!(
        "decoding {} from a row with {} columns",
        type_name::<T>(),
        row.len()
    );

    T::deserialize(RowDeserializer::with_options(row, options)).map_err(|error| {
        log::debug!("failed to decode {}: {}", type_name::<T>(), error);
        error
    })
}

/// Reads a field through a [`Decode`] converter instead of its `Deserialize` impl.
///
/// Use it with `#[serde(deserialize_with = "rowde::de::decode")]` on a field whose type
/// converts from a raw column value. Add `#[serde(default)]` when the column may be
/// missing from the row.
pub fn decode<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Decode,
{
    let value = RawValue::deserialize(deserializer)?;

    T::decode(&value).map_err(de::Error::custom)
}

/// Like [`decode`], for an `Option<T>` field: a null column is `None`.
pub fn decode_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Decode,
{
    decode::<D, Option<T>>(deserializer)
}

/// A `serde::Deserializer` over a row, or over one named field of a row.
///
/// At the top level the path is empty and the whole row decodes as a map of its columns
/// and scopes. For a field, the last segment of the path names a column, a scope, or
/// both, of the held row; which of them is read depends on what the target type asks
/// for:
///
/// * a struct or a map reads the scope,
/// * a scalar reads the column,
/// * an `Option` is `None` when the column is null, or when there is no column and the
///   scope is missing or holds only nulls,
/// * a sequence or a tuple always fails.
#[derive(Debug, Clone)]
pub struct RowDeserializer<'r> {
    row: &'r Row,
    path: FieldPath,
    column: Option<&'r RawValue>,
    scope: Option<&'r Row>,
    options: &'r DecodeOptions,
}

impl<'r> RowDeserializer<'r> {
    pub fn new(row: &'r Row) -> Self {
        RowDeserializer::with_options(row, &DEFAULT_OPTIONS)
    }

    pub fn with_options(row: &'r Row, options: &'r DecodeOptions) -> Self {
        RowDeserializer::at(row, FieldPath::root(), options)
    }

    /// A deserializer for the field named by the last segment of `path` in `row`.
    ///
    /// With an empty path, the single value is the leftmost column of the row.
    pub fn at(row: &'r Row, path: FieldPath, options: &'r DecodeOptions) -> Self {
        let (column, scope) = match path.last() {
            Some(name) => (row.raw_value(name), row.scope(name)),
            None => (row.raw_value_at(0), None),
        };

        RowDeserializer {
            row,
            path,
            column,
            scope,
            options,
        }
    }

    pub(crate) fn field(
        row: &'r Row,
        path: FieldPath,
        column: Option<&'r RawValue>,
        scope: Option<&'r Row>,
        options: &'r DecodeOptions,
    ) -> Self {
        RowDeserializer {
            row,
            path,
            column,
            scope,
            options,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn column(&self) -> Option<&'r RawValue> {
        self.column
    }

    pub(crate) fn options(&self) -> &'r DecodeOptions {
        self.options
    }

    /// The keyed view of this field's scope, or of the whole row at the top level.
    ///
    /// Fails with [`Error::KeyNotFound`] if the field has no scope.
    pub fn keyed(&self) -> crate::Result<KeyedView<'r>> {
        if self.path.is_root() {
            return Ok(KeyedView::nested(self.row, self.path.clone(), self.options));
        }

        self.scope
            .map(|scope| KeyedView::nested(scope, self.path.clone(), self.options))
            .ok_or_else(|| Error::key_not_found(FieldPath::root()))
    }

    /// Rows are record-shaped: positional decoding always fails.
    pub fn unkeyed(&self) -> crate::Result<Infallible> {
        Err(Error::unsupported(FieldPath::root(), "a sequence"))
    }

    /// The single value view of this field's column. Always succeeds; the column is only
    /// read when a value is decoded.
    pub fn single_value(self) -> SingleValueView<'r> {
        SingleValueView::new(self)
    }

    fn is_absent(&self) -> bool {
        match self.column {
            Some(value) => value.is_null(),
            None => self
                .scope
                .map_or(true, |scope| !scope.contains_non_null_value()),
        }
    }
}

macro_rules! forward_to_single_value {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Error>
            where
                V: Visitor<'r>,
            {
                self.single_value().$method(visitor)
            }
        )*
    };
}

impl<'r> Deserializer<'r> for RowDeserializer<'r> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        if self.path.is_root() || (self.column.is_none() && self.scope.is_some()) {
            return self.deserialize_map(visitor);
        }

        if self.column.is_none() {
            return Err(Error::key_not_found(FieldPath::root()));
        }

        self.single_value().deserialize_any(visitor)
    }

    forward_to_single_value! {
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_f32 deserialize_f64
        deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf
        deserialize_identifier
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        if !self.path.is_root() && self.is_absent() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        if self.path.is_root() {
            visitor.visit_unit()
        } else {
            self.single_value().deserialize_unit(visitor)
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

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        visitor.visit_map(self.keyed()?.into_map_access(None))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        visitor.visit_map(self.keyed()?.into_map_access(Some(fields)))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        self.single_value().deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'r>,
    {
        visitor.visit_unit()
    }
}
