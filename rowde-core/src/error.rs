//! Error and Result types.

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};

use crate::decode::DecodeError;
use crate::path::FieldPath;

/// A boxed error from a scalar converter.
pub type BoxDynError = Box<dyn StdError + Send + Sync + 'static>;

/// A generic error that represents all the ways a row can fail to decode.
///
/// Every variant carries the [`FieldPath`] of the field that failed. Paths are relative to
/// the row the error was raised in and grow as the error travels out of nested scopes, so
/// the error returned from the top-level decode names the field from the outermost row.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A raw value is present but cannot be converted to the requested kind or type.
    TypeMismatch {
        path: FieldPath,
        expected: String,
        found: String,
    },

    /// A field required to be present is neither a column nor a scope of the row.
    KeyNotFound { path: FieldPath },

    /// A scalar required to be non-null was null.
    ValueMissing { path: FieldPath },

    /// The requested container shape can never be decoded from a row.
    Unsupported {
        path: FieldPath,
        what: &'static str,
    },

    /// A scalar converter failed for a reason other than a kind mismatch.
    Decode { path: FieldPath, source: BoxDynError },

    /// A message raised by a `Deserialize` or `Serialize` implementation.
    Message { path: FieldPath, message: String },
}

impl Error {
    pub(crate) fn key_not_found(path: FieldPath) -> Self {
        Error::KeyNotFound { path }
    }

    pub(crate) fn value_missing(path: FieldPath) -> Self {
        Error::ValueMissing { path }
    }

    pub(crate) fn unsupported(path: FieldPath, what: &'static str) -> Self {
        Error::Unsupported { path, what }
    }

    pub(crate) fn mismatch(
        path: FieldPath,
        expected: impl Display,
        found: impl Display,
    ) -> Self {
        Error::TypeMismatch {
            path,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Lifts a converter error into an error at `path`.
    pub fn from_decode(path: FieldPath, error: DecodeError) -> Self {
        match error {
            DecodeError::UnexpectedNull => Error::ValueMissing { path },

            DecodeError::Mismatch { expected, found } => Error::TypeMismatch {
                path,
                expected: expected.into(),
                found: found.into(),
            },

            DecodeError::Other(source) => Error::Decode { path, source },
        }
    }

    /// The path of the field that failed to decode.
    pub fn path(&self) -> &FieldPath {
        match self {
            Error::TypeMismatch { path, .. }
            | Error::KeyNotFound { path }
            | Error::ValueMissing { path }
            | Error::Unsupported { path, .. }
            | Error::Decode { path, .. }
            | Error::Message { path, .. } => path,
        }
    }

    /// Puts `name` in front of the path, used when the error leaves the scope or field
    /// called `name`.
    pub fn prefixed(self, name: &str) -> Self {
        match self {
            Error::TypeMismatch {
                path,
                expected,
                found,
            } => Error::TypeMismatch {
                path: path.prepend(name),
                expected,
                found,
            },

            Error::KeyNotFound { path } => Error::KeyNotFound {
                path: path.prepend(name),
            },

            Error::ValueMissing { path } => Error::ValueMissing {
                path: path.prepend(name),
            },

            Error::Unsupported { path, what } => Error::Unsupported {
                path: path.prepend(name),
                what,
            },

            Error::Decode { path, source } => Error::Decode {
                path: path.prepend(name),
                source,
            },

            Error::Message { path, message } => Error::Message {
                path: path.prepend(name),
                message,
            },
        }
    }

    /// Prefixes the path of this error with every segment of `path`.
    pub(crate) fn within(self, path: &FieldPath) -> Self {
        let segments: Vec<&str> = path.segments().collect();

        segments
            .into_iter()
            .rev()
            .fold(self, |error, segment| error.prefixed(segment))
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Decode { source, .. } => Some(&**source),

            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "type mismatch at {}: expected {}, found {}",
                path, expected, found
            ),

            Error::KeyNotFound { path } => {
                write!(f, "no column or scope found for {}", path)
            }

            Error::ValueMissing { path } => {
                write!(f, "unexpected null value at {}", path)
            }

            Error::Unsupported { path, what } => {
                write!(f, "{} cannot be decoded from a row (at {})", what, path)
            }

            Error::Decode { path, source } => {
                write!(f, "error occurred while decoding {}: {}", path, source)
            }

            Error::Message { path, message } if path.is_root() => f.write_str(message),

            Error::Message { path, message } => write!(f, "{} (at {})", message, path),
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message {
            path: FieldPath::root(),
            message: msg.to_string(),
        }
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::mismatch(FieldPath::root(), exp, unexp)
    }

    fn invalid_value(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::mismatch(FieldPath::root(), exp, unexp)
    }

    fn missing_field(field: &'static str) -> Self {
        Error::KeyNotFound {
            path: FieldPath::from(field),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message {
            path: FieldPath::root(),
            message: msg.to_string(),
        }
    }
}
