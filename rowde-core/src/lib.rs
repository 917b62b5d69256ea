//! Core of rowde, the row decoding adapter. Not intended to be used directly.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;

pub mod de;
pub mod decode;
pub mod from_row;
pub mod options;
pub mod path;
pub mod row;
pub mod ser;
pub mod types;
pub mod value;

pub use de::{from_row, from_row_with, KeyedView, RowDeserializer, SingleValueView};
pub use decode::{Decode, DecodeError};
pub use error::{BoxDynError, Error};
pub use from_row::FromRow;
pub use options::{DecodeOptions, KeyDecodingStrategy};
pub use path::FieldPath;
pub use row::Row;
pub use ser::to_row;
pub use value::RawValue;

/// A specialized `Result` type for rowde.
pub type Result<T> = std::result::Result<T, Error>;
