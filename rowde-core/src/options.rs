//! Options that control how rows are decoded.

use std::borrow::Cow;
use std::fmt::{self, Debug};

use convert_case::{Case, Casing};

/// How column and scope names map to the field keys of the decoded type.
#[derive(Clone, Copy)]
pub enum KeyDecodingStrategy {
    /// Names are used as keys, unchanged.
    UseDefaultKeys,

    /// `camelCase` or `PascalCase` names become `snake_case` keys: the `playerId` column
    /// fills the `player_id` field.
    ConvertToSnakeCase,

    /// Keys are computed by the given function.
    Custom(fn(&str) -> String),
}

impl KeyDecodingStrategy {
    /// The field key for a column or scope name.
    pub fn key<'n>(&self, name: &'n str) -> Cow<'n, str> {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => Cow::Borrowed(name),
            KeyDecodingStrategy::ConvertToSnakeCase => Cow::Owned(name.to_case(Case::Snake)),
            KeyDecodingStrategy::Custom(convert) => Cow::Owned(convert(name)),
        }
    }
}

impl Default for KeyDecodingStrategy {
    fn default() -> Self {
        KeyDecodingStrategy::UseDefaultKeys
    }
}

impl Debug for KeyDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => f.write_str("UseDefaultKeys"),
            KeyDecodingStrategy::ConvertToSnakeCase => f.write_str("ConvertToSnakeCase"),
            KeyDecodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options for [`from_row_with`](crate::de::from_row_with) and
/// [`KeyedView::with_options`](crate::de::KeyedView::with_options).
///
/// ```rust
/// use rowde_core::{DecodeOptions, KeyDecodingStrategy};
///
/// let options = DecodeOptions::new().key_strategy(KeyDecodingStrategy::ConvertToSnakeCase);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub(crate) key_strategy: KeyDecodingStrategy,
}

pub(crate) static DEFAULT_OPTIONS: DecodeOptions = DecodeOptions::new();

impl DecodeOptions {
    pub const fn new() -> Self {
        DecodeOptions {
            key_strategy: KeyDecodingStrategy::UseDefaultKeys,
        }
    }

    /// Sets how column and scope names map to field keys.
    pub fn key_strategy(mut self, strategy: KeyDecodingStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    pub fn get_key_strategy(&self) -> KeyDecodingStrategy {
        self.key_strategy
    }
}
