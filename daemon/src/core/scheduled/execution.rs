use log::debug;

use norn_common::marshal::Marshaller;
use norn_common::transaction::TransactionHandler;

use crate::core::error::ProcessError;
use crate::core::storage::Storer;
use crate::core::traits::{ShardCoordinator, TransactionCoordinator, TxProcessor};

use super::ScheduledTxsExecution;

impl<P, C, S, M, D> ScheduledTxsExecution<P, C, S, M, D>
where
    P: TxProcessor,
    C: TransactionCoordinator,
    S: Storer,
    M: Marshaller,
    D: ShardCoordinator,
{
    /// Executes one scheduled transaction by hash.
    ///
    /// A VM-level failure reported as `FailedTransaction` has already been
    /// accounted by the processor and is treated as success here; every other
    /// processing error is surfaced unchanged.
    pub async fn execute(&self, tx_hash: &[u8]) -> Result<(), ProcessError> {
        let handler = self
            .state_read()
            .tx_index
            .get(tx_hash)
            .cloned()
            .ok_or(ProcessError::MissingTransaction)?;

        match self.execute_handler(&handler).await {
            Err(ProcessError::FailedTransaction) => {
                debug!(
                    "scheduled transaction {} failed at the VM level",
                    hex::encode(tx_hash)
                );
                Ok(())
            }
            result => result,
        }
    }

    /// Executes all scheduled transactions in insertion order, within the
    /// time budget reported by `have_time` (remaining nanoseconds; a value
    /// of zero or below stops the batch with `TimeIsOut`).
    ///
    /// On completion the intermediate transactions produced by the round are
    /// classified against the coordinator's pre-round snapshot.
    pub async fn execute_all<F>(&self, have_time: F) -> Result<(), ProcessError>
    where
        F: Fn() -> i64,
    {
        let intermediate_txs_before = self.tx_coordinator.all_intermediate_txs();

        // Snapshot under the read lock; the processor runs outside of it.
        let scheduled_txs = self.state_read().scheduled_txs.clone();

        for (tx_hash, handler) in &scheduled_txs {
            if have_time() <= 0 {
                return Err(ProcessError::TimeIsOut);
            }

            match self.execute_handler(handler).await {
                Ok(()) => {}
                Err(ProcessError::FailedTransaction) => {
                    debug!(
                        "scheduled transaction {} failed at the VM level",
                        hex::encode(tx_hash)
                    );
                }
                Err(err) => return Err(err),
            }
        }

        let intermediate_txs_after = self.tx_coordinator.all_intermediate_txs();
        self.compute_scheduled_intermediate_txs(&intermediate_txs_before, &intermediate_txs_after);

        Ok(())
    }

    pub(crate) async fn execute_handler(
        &self,
        handler: &TransactionHandler,
    ) -> Result<(), ProcessError> {
        match handler {
            TransactionHandler::Transaction(tx) => {
                self.tx_processor.process_transaction(tx).await.map(|_| ())
            }
            _ => Err(ProcessError::WrongTypeAssertion),
        }
    }
}
