use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::decode::{Decode, DecodeError};
use crate::value::RawValue;

/// A column holding JSON text, decoded into `T`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> AsRef<T> for Json<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> Decode for Json<T>
where
    T: DeserializeOwned,
{
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        let parsed = match value {
            RawValue::Text(text) => serde_json::from_str(text),
            RawValue::Blob(bytes) => serde_json::from_slice(bytes),
            _ => return Err(DecodeError::mismatch("json", value)),
        };

        parsed.map(Json).map_err(DecodeError::other)
    }
}

impl Decode for JsonValue {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        Json::<JsonValue>::decode(value).map(|json| json.0)
    }
}
