use serde::{Deserialize, Serialize};

/// One network chunk of a payload too large for a single message.
///
/// `reference` is the content hash of the complete payload; a valid chunk
/// batch carries exactly one buffer in `data`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub reference: Vec<u8>,
    pub chunk_index: u32,
    pub max_chunks: u32,
    pub data: Vec<Vec<u8>>,
}

impl Batch {
    /// Convenience constructor for a single-buffer chunk batch.
    pub fn chunk(reference: Vec<u8>, chunk_index: u32, max_chunks: u32, buffer: Vec<u8>) -> Self {
        Self {
            reference,
            chunk_index,
            max_chunks,
            data: vec![buffer],
        }
    }
}
