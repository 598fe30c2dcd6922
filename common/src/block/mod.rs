use serde::{Deserialize, Serialize};

/// Kind of payload a mini-block (and the intermediate transactions grouped
/// under it) carries. The numeric code is the stable wire representation used
/// as a map key in persisted scheduled state.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum BlockType {
    #[default]
    TxBlock = 0,
    SmartContractResultBlock = 1,
    ReceiptBlock = 2,
    InvalidBlock = 3,
    PeerBlock = 4,
}

impl BlockType {
    /// Stable numeric code used in persisted map keys.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::TxBlock),
            1 => Some(Self::SmartContractResultBlock),
            2 => Some(Self::ReceiptBlock),
            3 => Some(Self::InvalidBlock),
            4 => Some(Self::PeerBlock),
            _ => None,
        }
    }

    /// Intermediate transactions of these kinds are consumed locally when
    /// sender and receiver live in the same shard and must not re-enter the
    /// scheduled stream.
    pub fn is_consumed_intra_shard(self) -> bool {
        matches!(self, Self::SmartContractResultBlock | Self::ReceiptBlock)
    }
}

/// Group of transaction hashes moving between two shards inside a block.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniBlock {
    pub tx_hashes: Vec<Vec<u8>>,
    pub receiver_shard_id: u32,
    pub sender_shard_id: u32,
    pub block_type: BlockType,
}

pub type MiniBlockSlice = Vec<MiniBlock>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_codes_round_trip() {
        for block_type in [
            BlockType::TxBlock,
            BlockType::SmartContractResultBlock,
            BlockType::ReceiptBlock,
            BlockType::InvalidBlock,
            BlockType::PeerBlock,
        ] {
            assert_eq!(BlockType::from_code(block_type.code()), Some(block_type));
        }
        assert_eq!(BlockType::from_code(42), None);
    }

    #[test]
    fn test_intra_shard_consumption_is_limited_to_scrs_and_receipts() {
        assert!(BlockType::SmartContractResultBlock.is_consumed_intra_shard());
        assert!(BlockType::ReceiptBlock.is_consumed_intra_shard());
        assert!(!BlockType::TxBlock.is_consumed_intra_shard());
        assert!(!BlockType::InvalidBlock.is_consumed_intra_shard());
        assert!(!BlockType::PeerBlock.is_consumed_intra_shard());
    }
}
