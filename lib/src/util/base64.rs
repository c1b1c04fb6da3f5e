//! Standard, padded base64. This is the text form used for serialized master
//! keys, group identifiers and the credential blobs returned by the server.
use base64ct::{Base64, Encoding};

use crate::error::ProtoError;

pub fn encode<Bytes: AsRef<[u8]>>(bytes: Bytes) -> String {
    Base64::encode_string(bytes.as_ref())
}

pub fn decode(s: &str) -> Result<Vec<u8>, ProtoError> {
    Base64::decode_vec(s).map_err(|_| ProtoError)
}

/// `#[serde(with = "lib::util::base64::serde_bytes")]` for byte fields that
/// travel as base64 strings inside JSON bodies.
pub mod serde_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<Bytes, S>(bytes: Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        Bytes: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        super::decode(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_base64_test() {
        let test = vec![1, 2, 3, 4];
        let encoded = encode(&test);

        assert_eq!(encoded, "AQIDBA==", "Standard base64 keeps its padding");
        assert_eq!(decode(&encoded), Ok(test));
    }

    #[test]
    fn rejects_url_safe_and_garbage() {
        assert!(decode("-_-_").is_err(), "URL-safe alphabet is not accepted");
        assert!(decode("AQIDBA").is_err(), "Missing padding is not accepted");
        assert!(decode("not base64!").is_err());
    }
}
