use std::collections::BTreeMap;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::block::MiniBlockSlice;
use crate::transaction::SmartContractResult;

/// Gas and fee accounting accumulated while executing one scheduled batch.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasAndFees {
    pub accumulated_fees: U256,
    pub developer_fees: U256,
    pub gas_provided: u64,
    pub gas_penalized: u64,
    pub gas_refunded: u64,
}

/// Smart contract results grouped under one block type in the persisted
/// scheduled state.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartContractResults {
    pub tx_handlers: Vec<SmartContractResult>,
}

/// Persisted scheduled state for one header, keyed externally by the header
/// hash. The map key is the numeric code of the block type.
///
/// `mini_blocks` defaults to an empty sequence on read so that state recorded
/// before mini-blocks were tracked still decodes to a stable shape.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledScrs {
    pub root_hash: Vec<u8>,
    pub scrs: BTreeMap<i32, SmartContractResults>,
    pub gas_and_fees: GasAndFees,
    #[serde(default)]
    pub mini_blocks: MiniBlockSlice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockType, MiniBlock};

    #[test]
    fn test_scheduled_scrs_round_trip() {
        let record = ScheduledScrs {
            root_hash: b"root hash".to_vec(),
            scrs: BTreeMap::from([(
                BlockType::SmartContractResultBlock.code(),
                SmartContractResults {
                    tx_handlers: vec![SmartContractResult {
                        nonce: 1,
                        ..SmartContractResult::default()
                    }],
                },
            )]),
            gas_and_fees: GasAndFees {
                accumulated_fees: U256::from(101u64),
                developer_fees: U256::from(102u64),
                gas_provided: 103,
                gas_penalized: 104,
                gas_refunded: 105,
            },
            mini_blocks: vec![MiniBlock {
                block_type: BlockType::InvalidBlock,
                ..MiniBlock::default()
            }],
        };

        let bytes = serde_json::to_vec(&record).unwrap();
        let decoded: ScheduledScrs = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_missing_mini_blocks_decode_to_empty_slice() {
        let record = ScheduledScrs {
            root_hash: b"root hash".to_vec(),
            ..ScheduledScrs::default()
        };
        let mut encoded: serde_json::Value = serde_json::to_value(&record).unwrap();
        encoded
            .as_object_mut()
            .unwrap()
            .remove("mini_blocks")
            .unwrap();

        let decoded: ScheduledScrs = serde_json::from_value(encoded).unwrap();
        assert!(decoded.mini_blocks.is_empty());
    }
}
