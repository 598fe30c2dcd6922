use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use norn_common::block::BlockType;
use norn_common::marshal::Marshaller;
use norn_common::transaction::TransactionHandler;

use crate::core::storage::Storer;
use crate::core::traits::{
    IntermediateTxMap, ShardCoordinator, TransactionCoordinator, TxProcessor,
};

use super::ScheduledTxsExecution;

impl<P, C, S, M, D> ScheduledTxsExecution<P, C, S, M, D>
where
    P: TxProcessor,
    C: TransactionCoordinator,
    S: Storer,
    M: Marshaller,
    D: ShardCoordinator,
{
    /// Classifies the intermediate transactions produced by the scheduled
    /// round: everything present in `after` but not in `before`, minus
    /// intra-shard smart contract results and receipts, which are consumed
    /// locally and must not re-enter the scheduled stream.
    ///
    /// The previous classification is replaced wholesale; an empty `after`
    /// map therefore clears the scheduled intermediate transactions.
    pub fn compute_scheduled_intermediate_txs(
        &self,
        before: &IntermediateTxMap,
        after: &IntermediateTxMap,
    ) {
        let mut state = self.state_write();
        state.intermediate_txs.clear();

        let mut num_scheduled_intermediate_txs = 0;
        for (block_type, txs_after) in after {
            let new_txs = self.intermediate_txs_created_by_round(
                before.get(block_type),
                txs_after,
                *block_type,
            );
            if new_txs.is_empty() {
                continue;
            }

            num_scheduled_intermediate_txs += new_txs.len();
            state.intermediate_txs.insert(*block_type, new_txs);
        }

        debug!(
            "classified {} scheduled intermediate transactions across {} block types",
            num_scheduled_intermediate_txs,
            state.intermediate_txs.len()
        );
    }

    pub(crate) fn intermediate_txs_created_by_round(
        &self,
        before: Option<&IndexMap<Vec<u8>, Arc<TransactionHandler>>>,
        after: &IndexMap<Vec<u8>, Arc<TransactionHandler>>,
        block_type: BlockType,
    ) -> Vec<Arc<TransactionHandler>> {
        let mut created = Vec::new();
        for (tx_hash, handler) in after {
            let already_present = before.is_some_and(|txs| txs.contains_key(tx_hash));
            if already_present {
                continue;
            }

            let consumed_locally = block_type.is_consumed_intra_shard()
                && self
                    .shard_coordinator
                    .same_shard(handler.sender_addr(), handler.receiver_addr());
            if consumed_locally {
                continue;
            }

            created.push(handler.clone());
        }

        created
    }
}
