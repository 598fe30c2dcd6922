use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use norn_common::block::BlockType;
use norn_common::transaction::{Transaction, TransactionHandler};

use crate::core::error::ProcessError;

/// Outcome code reported by the transaction processor alongside its error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    #[default]
    Ok,
    UserError,
    OutOfGas,
    ExecutionFailed,
}

/// All intermediate transactions currently tracked by the coordinator,
/// grouped by block type and keyed by transaction hash.
pub type IntermediateTxMap = IndexMap<BlockType, IndexMap<Vec<u8>, Arc<TransactionHandler>>>;

/// Executes a single transaction against the VM and account state.
#[async_trait]
pub trait TxProcessor: Send + Sync {
    async fn process_transaction(&self, tx: &Transaction) -> Result<ReturnCode, ProcessError>;
}

/// Source of the intermediate transactions produced during a processing
/// round. Queried before and after scheduled execution to isolate what the
/// scheduled transactions themselves produced.
pub trait TransactionCoordinator: Send + Sync {
    fn all_intermediate_txs(&self) -> IntermediateTxMap;
}

/// Shard topology oracle.
pub trait ShardCoordinator: Send + Sync {
    fn self_id(&self) -> u32;

    fn same_shard(&self, sender: &[u8], receiver: &[u8]) -> bool;
}

/// Outbound request pipeline towards peers.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn request_trie_node(&self, shard_id: u32, reference: &[u8], topic: &str, chunk_index: u32);
}
