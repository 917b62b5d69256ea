//! Decode typed records from database rows.
//!
//! A [`Row`] holds named columns and named scopes, each scope being a nested row for an
//! associated record. Records are read from it either through serde, with [`from_row`],
//! or through [`FromRow`], usually derived:
//!
//! ```rust
//! use rowde::{FromRow, Row};
//!
//! #[derive(FromRow)]
//! struct Book {
//!     id: i64,
//!     title: String,
//!     #[row(scope)]
//!     author: Author,
//! }
//!
//! #[derive(FromRow)]
//! struct Author {
//!     name: String,
//!     born: Option<i32>,
//! }
//!
//! let row = Row::new()
//!     .with_column("id", 1)
//!     .with_column("title", "Dune")
//!     .with_scope("author", Row::new().with_column("name", "Frank Herbert"));
//!
//! let book: Book = row.decode()?;
//!
//! assert_eq!(book.author.name, "Frank Herbert");
//! assert_eq!(book.author.born, None);
//! # Ok::<(), rowde::Error>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use serde::Deserialize;

pub use rowde_core::de;
pub use rowde_core::decode;
pub use rowde_core::error;
pub use rowde_core::ser;
pub use rowde_core::types;

pub use rowde_core::{
    from_row, from_row_with, to_row, BoxDynError, Decode, DecodeError, DecodeOptions, Error,
    FieldPath, FromRow, KeyDecodingStrategy, KeyedView, RawValue, Result, Row, RowDeserializer,
    SingleValueView,
};

#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
pub use rowde_core::types::Json;

#[cfg(feature = "macros")]
#[cfg_attr(docsrs, doc(cfg(feature = "macros")))]
pub use rowde_macros::FromRow;

/// Decodes a `T` from a row, for callers that treat a row of the wrong shape as a bug.
///
/// # Panics
///
/// Panics with the decoding error, including the path of the field that failed, if the
/// row cannot be decoded as a `T`.
pub fn from_row_or_panic<'r, T>(row: &'r Row) -> T
where
    T: Deserialize<'r>,
{
    match from_row(row) {
        Ok(value) => value,
        Err(error) => {
            log::error!(
                "cannot decode {} from row: {}",
                std::any::type_name::<T>(),
                error
            );

            panic!("cannot decode {}: {}", std::any::type_name::<T>(), error)
        }
    }
}

/// Convenience re-export of common traits.
pub mod prelude {
    pub use super::Decode;
    pub use super::FromRow;
}
