use uuid::Uuid;

use crate::decode::{Decode, DecodeError};
use crate::value::RawValue;

impl Decode for Uuid {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        match value {
            RawValue::Text(text) => Uuid::parse_str(text).map_err(DecodeError::other),
            RawValue::Blob(bytes) => Uuid::from_slice(bytes).map_err(DecodeError::other),
            _ => Err(DecodeError::mismatch("uuid", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::decode::Decode;
    use crate::value::RawValue;

    #[test]
    fn it_decodes_text_and_blobs() {
        let text = "936da01f-9abd-4d9d-80c7-02af85c822a8";
        let expected = Uuid::parse_str(text).unwrap();

        assert_eq!(Uuid::decode(&RawValue::Text(text.into())).unwrap(), expected);
        assert_eq!(
            Uuid::decode(&RawValue::Blob(expected.as_bytes().to_vec())).unwrap(),
            expected
        );
        assert!(Uuid::decode(&RawValue::Blob(vec![1, 2, 3])).is_err());
        assert!(Uuid::decode(&RawValue::Int(1)).is_err());
    }
}
