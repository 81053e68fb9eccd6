//! Blob codec
//!
//! Serializes one value to an opaque byte blob and back. The rest of
//! the crate never looks inside a blob; the index records where each
//! one lives in the value log.
//!
//! Decode failure is a distinct, catchable condition: the caller maps
//! it to [`DuraError::Corrupt`] with the affected key attached.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DuraError, Result};

/// Encode a value to its blob representation
pub fn encode<V: Serialize>(value: &V) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| DuraError::Encode(e.to_string()))
}

/// Decode a blob back into a value
///
/// The error carries no key; callers attach the key they were reading.
pub fn decode<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    bincode::deserialize(bytes).map_err(|e| DuraError::Corrupt {
        key: String::new(),
        detail: e.to_string(),
    })
}

/// Attach a key to a decode failure
pub fn decode_for_key<V: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<V> {
    decode(bytes).map_err(|e| match e {
        DuraError::Corrupt { detail, .. } => DuraError::Corrupt {
            key: key.to_string(),
            detail,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let blob = encode(&("hello".to_string(), 42u32)).unwrap();
        let back: (String, u32) = decode(&blob).unwrap();
        assert_eq!(back, ("hello".to_string(), 42));
    }

    #[test]
    fn garbage_is_corrupt() {
        let result: Result<String> = decode_for_key("k1", &[0xff; 3]);
        match result {
            Err(DuraError::Corrupt { key, .. }) => assert_eq!(key, "k1"),
            other => panic!("expected Corrupt, got {:?}", other.map(|_| ())),
        }
    }
}
