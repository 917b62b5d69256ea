//! Conversions between Rust and column types.
//!
//! # Types
//!
//! | Rust type                             | Column value                             |
//! |---------------------------------------|------------------------------------------|
//! | `bool`                                | boolean, integer `0` / `1`               |
//! | `i8`, `i16`, `i32`, `i64`             | integer, unsigned integer, integral float |
//! | `u8`, `u16`, `u32`, `u64`             | integer, unsigned integer, integral float |
//! | `f32`, `f64`                          | float, integer, unsigned integer         |
//! | `char`                                | text of one character                    |
//! | `String`                              | text                                     |
//! | `Vec<u8>`                             | blob, text                               |
//! | `Option<T>`                           | null, or any value `T` accepts           |
//!
//! ### [`chrono`](https://crates.io/crates/chrono)
//!
//! Requires the `chrono` Cargo feature flag.
//!
//! | Rust type                             | Column value                             |
//! |---------------------------------------|------------------------------------------|
//! | `chrono::NaiveDate`                   | text `YYYY-MM-DD`                        |
//! | `chrono::NaiveTime`                   | text `HH:MM[:SS[.SSS]]`                  |
//! | `chrono::NaiveDateTime`               | text `YYYY-MM-DD HH:MM[:SS[.SSS]]`, with a space or a `T` |
//! | `chrono::DateTime<Utc>`               | RFC 3339 text, naive text read as UTC, unix timestamp integer |
//!
//! ### [`uuid`](https://crates.io/crates/uuid)
//!
//! Requires the `uuid` Cargo feature flag.
//!
//! | Rust type                             | Column value                             |
//! |---------------------------------------|------------------------------------------|
//! | `uuid::Uuid`                          | hyphenated or simple text, 16 byte blob  |
//!
//! ### [`json`](https://crates.io/crates/serde_json)
//!
//! Requires the `json` Cargo feature flag.
//!
//! | Rust type                             | Column value                             |
//! |---------------------------------------|------------------------------------------|
//! | [`Json<T>`]                           | JSON text or blob                        |
//! | `serde_json::Value`                   | JSON text or blob                        |

#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
mod chrono;

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid;

#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
mod json;

#[cfg(feature = "json")]
pub use json::Json;
