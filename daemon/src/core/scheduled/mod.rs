// Scheduled Transactions Execution Engine
//
// Holds the ordered list of transactions whose execution was deferred to the
// current block, drives their execution through the transaction processor,
// classifies the intermediate transactions the round produced and snapshots
// enough state per header to roll back to any recent scheduled frontier.

mod execution;
mod intermediate;
mod snapshot;


use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use log::debug;

use norn_common::block::{BlockType, MiniBlockSlice};
use norn_common::marshal::Marshaller;
use norn_common::scheduled::GasAndFees;
use norn_common::transaction::TransactionHandler;

use crate::core::storage::Storer;
use crate::core::traits::{ShardCoordinator, TransactionCoordinator, TxProcessor};

/// Intermediate transactions produced by one scheduled round, flattened per
/// block type in classification order.
pub type ScheduledIntermediateTxs = IndexMap<BlockType, Vec<Arc<TransactionHandler>>>;

/// Minimal state needed to resume or roll back scheduled execution at a
/// given header.
#[derive(Debug, Clone, Default)]
pub struct ScheduledInfo {
    pub root_hash: Vec<u8>,
    pub intermediate_txs: ScheduledIntermediateTxs,
    pub gas_and_fees: GasAndFees,
    pub mini_blocks: MiniBlockSlice,
}

struct ScheduledState {
    // Insertion-ordered scheduled transactions and their hash index. Both
    // always hold the same set.
    scheduled_txs: Vec<(Vec<u8>, Arc<TransactionHandler>)>,
    tx_index: HashMap<Vec<u8>, Arc<TransactionHandler>>,
    intermediate_txs: ScheduledIntermediateTxs,
    root_hash: Vec<u8>,
    gas_and_fees: GasAndFees,
    mini_blocks: MiniBlockSlice,
}

impl ScheduledState {
    fn new() -> Self {
        Self {
            scheduled_txs: Vec::new(),
            tx_index: HashMap::new(),
            intermediate_txs: IndexMap::new(),
            root_hash: Vec::new(),
            gas_and_fees: GasAndFees::default(),
            mini_blocks: MiniBlockSlice::new(),
        }
    }
}

/// Ordered, re-entrant executor for scheduled transactions.
///
/// All collaborators are injected at construction. Mutation is serialized by
/// the block processing driver; getters may be called concurrently from
/// inspection APIs and take the shared side of the lock. The transaction
/// processor is always invoked outside the lock.
pub struct ScheduledTxsExecution<P, C, S, M, D> {
    tx_processor: P,
    tx_coordinator: C,
    storer: S,
    marshaller: M,
    shard_coordinator: D,
    state: RwLock<ScheduledState>,
}

impl<P, C, S, M, D> ScheduledTxsExecution<P, C, S, M, D>
where
    P: TxProcessor,
    C: TransactionCoordinator,
    S: Storer,
    M: Marshaller,
    D: ShardCoordinator,
{
    pub fn new(
        tx_processor: P,
        tx_coordinator: C,
        storer: S,
        marshaller: M,
        shard_coordinator: D,
    ) -> Self {
        Self {
            tx_processor,
            tx_coordinator,
            storer,
            marshaller,
            shard_coordinator,
            state: RwLock::new(ScheduledState::new()),
        }
    }

    /// Drops all scheduled transactions, returning the engine to its idle
    /// state for the next header.
    pub fn init(&self) {
        let mut state = self.state_write();
        state.scheduled_txs.clear();
        state.tx_index.clear();
    }

    /// Registers a transaction for scheduled execution. Returns false without
    /// touching the list when the hash is already registered; the hash is
    /// content-addressed identity, so a duplicate hash with a different
    /// payload is rejected all the same.
    pub fn add_scheduled_tx(&self, tx_hash: &[u8], tx: Arc<TransactionHandler>) -> bool {
        let mut state = self.state_write();
        if state.tx_index.contains_key(tx_hash) {
            return false;
        }

        state.tx_index.insert(tx_hash.to_vec(), tx.clone());
        state.scheduled_txs.push((tx_hash.to_vec(), tx));

        debug_assert_eq!(state.scheduled_txs.len(), state.tx_index.len());
        true
    }

    pub fn is_scheduled_tx(&self, tx_hash: &[u8]) -> bool {
        self.state_read().tx_index.contains_key(tx_hash)
    }

    pub fn num_scheduled_txs(&self) -> usize {
        self.state_read().scheduled_txs.len()
    }

    pub fn get_scheduled_intermediate_txs(&self) -> ScheduledIntermediateTxs {
        self.state_read().intermediate_txs.clone()
    }

    pub fn get_scheduled_root_hash(&self) -> Vec<u8> {
        self.state_read().root_hash.clone()
    }

    pub fn set_scheduled_root_hash(&self, root_hash: Vec<u8>) {
        self.state_write().root_hash = root_hash;
    }

    pub fn get_scheduled_gas_and_fees(&self) -> GasAndFees {
        self.state_read().gas_and_fees.clone()
    }

    pub fn set_scheduled_gas_and_fees(&self, gas_and_fees: GasAndFees) {
        self.state_write().gas_and_fees = gas_and_fees;
    }

    pub fn get_scheduled_mini_blocks(&self) -> MiniBlockSlice {
        self.state_read().mini_blocks.clone()
    }

    pub fn set_scheduled_mini_blocks(&self, mini_blocks: MiniBlockSlice) {
        self.state_write().mini_blocks = mini_blocks;
    }

    /// Installs a recovered scheduled frontier into the live fields.
    pub fn set_scheduled_info(&self, scheduled_info: ScheduledInfo) {
        let mut state = self.state_write();
        state.root_hash = scheduled_info.root_hash;
        state.intermediate_txs = scheduled_info.intermediate_txs;
        state.gas_and_fees = scheduled_info.gas_and_fees;
        state.mini_blocks = scheduled_info.mini_blocks;

        debug!(
            "installed scheduled info with root hash {}",
            hex::encode(&state.root_hash)
        );
    }

    pub fn set_transaction_processor(&mut self, tx_processor: P) {
        self.tx_processor = tx_processor;
    }

    pub fn set_transaction_coordinator(&mut self, tx_coordinator: C) {
        self.tx_coordinator = tx_coordinator;
    }

    fn scheduled_info(&self, state: &ScheduledState) -> ScheduledInfo {
        ScheduledInfo {
            root_hash: state.root_hash.clone(),
            intermediate_txs: state.intermediate_txs.clone(),
            gas_and_fees: state.gas_and_fees.clone(),
            mini_blocks: state.mini_blocks.clone(),
        }
    }

    fn state_read(&self) -> RwLockReadGuard<'_, ScheduledState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_write(&self) -> RwLockWriteGuard<'_, ScheduledState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
