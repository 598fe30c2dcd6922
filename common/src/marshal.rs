use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("failed to serialize value: {0}")]
    Serialize(String),

    #[error("failed to deserialize value: {0}")]
    Deserialize(String),
}

/// Encoding boundary injected into every component that persists or parses
/// structured data. The same marshaller instance must be used for write and
/// later read of the same record.
pub trait Marshaller: Send + Sync {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, MarshalError>;

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, MarshalError>;
}

/// JSON marshaller, the default encoding of the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaller;

impl Marshaller for JsonMarshaller {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, MarshalError> {
        serde_json::to_vec(value).map_err(|err| MarshalError::Serialize(err.to_string()))
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, MarshalError> {
        serde_json::from_slice(bytes).map_err(|err| MarshalError::Deserialize(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;

    #[test]
    fn test_json_round_trip() {
        let marshaller = JsonMarshaller;
        let batch = Batch::chunk(vec![1, 2, 3], 0, 4, b"payload".to_vec());

        let bytes = marshaller.marshal(&batch).unwrap();
        let decoded: Batch = marshaller.unmarshal(&bytes).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_unmarshal_rejects_garbage() {
        let marshaller = JsonMarshaller;
        let result: Result<Batch, _> = marshaller.unmarshal(b"not json");
        assert!(matches!(result, Err(MarshalError::Deserialize(_))));
    }
}
