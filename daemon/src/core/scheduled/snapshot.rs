use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, error};

use norn_common::block::BlockType;
use norn_common::marshal::Marshaller;
use norn_common::scheduled::{ScheduledScrs, SmartContractResults};
use norn_common::transaction::TransactionHandler;

use crate::core::error::ProcessError;
use crate::core::storage::Storer;
use crate::core::traits::{ShardCoordinator, TransactionCoordinator, TxProcessor};

use super::{ScheduledInfo, ScheduledTxsExecution};

impl<P, C, S, M, D> ScheduledTxsExecution<P, C, S, M, D>
where
    P: TxProcessor,
    C: TransactionCoordinator,
    S: Storer,
    M: Marshaller,
    D: ShardCoordinator,
{
    /// Snapshots the live scheduled frontier under the given header hash, but
    /// only when there is at least one scheduled transaction registered.
    pub async fn save_state_if_needed(&self, header_hash: &[u8]) {
        let (num_scheduled_txs, scheduled_info) = {
            let state = self.state_read();
            (state.scheduled_txs.len(), self.scheduled_info(&state))
        };

        debug!(
            "{} scheduled transactions registered for header {}",
            num_scheduled_txs,
            hex::encode(header_hash)
        );
        if num_scheduled_txs > 0 {
            self.save_state(header_hash, &scheduled_info).await;
        }
    }

    /// Persists the given scheduled frontier under the header hash. Failures
    /// are logged and swallowed: a lost snapshot only narrows how far the
    /// node can roll back.
    pub async fn save_state(&self, header_hash: &[u8], scheduled_info: &ScheduledInfo) {
        let bytes = match self.marshalled_scheduled_info(scheduled_info) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(
                    "failed to marshal scheduled info for header {}: {err}",
                    hex::encode(header_hash)
                );
                return;
            }
        };

        if let Err(err) = self.storer.put(header_hash, &bytes).await {
            error!(
                "failed to persist scheduled info for header {}: {err}",
                hex::encode(header_hash)
            );
        }
    }

    /// Restores the scheduled frontier recorded for the given header into
    /// the live fields.
    pub async fn roll_back_to_block(&self, header_hash: &[u8]) -> Result<(), ProcessError> {
        let scheduled_info = self.get_scheduled_info_for_header(header_hash).await?;
        self.set_scheduled_info(scheduled_info);
        Ok(())
    }

    /// Read-only variant of the rollback: parses the scheduled frontier
    /// recorded for the given header without touching the live fields.
    pub async fn get_scheduled_info_for_header(
        &self,
        header_hash: &[u8],
    ) -> Result<ScheduledInfo, ProcessError> {
        let bytes = self.storer.get(header_hash).await?;
        let record: ScheduledScrs = self.marshaller.unmarshal(&bytes)?;

        scheduled_info_from_record(record)
    }

    pub(crate) fn marshalled_scheduled_info(
        &self,
        scheduled_info: &ScheduledInfo,
    ) -> Result<Vec<u8>, ProcessError> {
        let record = scheduled_record_from_info(scheduled_info)?;
        Ok(self.marshaller.marshal(&record)?)
    }
}

// Only smart contract results survive persistence: the scheduled stream of a
// committed header carries nothing else by the time it is snapshotted.
fn scheduled_record_from_info(info: &ScheduledInfo) -> Result<ScheduledScrs, ProcessError> {
    let mut scrs = BTreeMap::new();
    for (block_type, handlers) in &info.intermediate_txs {
        let mut tx_handlers = Vec::with_capacity(handlers.len());
        for handler in handlers {
            match handler.as_ref() {
                TransactionHandler::SmartContractResult(scr) => tx_handlers.push(scr.clone()),
                _ => return Err(ProcessError::WrongTypeAssertion),
            }
        }
        scrs.insert(block_type.code(), SmartContractResults { tx_handlers });
    }

    Ok(ScheduledScrs {
        root_hash: info.root_hash.clone(),
        scrs,
        gas_and_fees: info.gas_and_fees.clone(),
        mini_blocks: info.mini_blocks.clone(),
    })
}

fn scheduled_info_from_record(record: ScheduledScrs) -> Result<ScheduledInfo, ProcessError> {
    let mut intermediate_txs = IndexMap::new();
    for (code, group) in record.scrs {
        let block_type = BlockType::from_code(code).ok_or(ProcessError::WrongTypeAssertion)?;
        let handlers = group
            .tx_handlers
            .into_iter()
            .map(|scr| Arc::new(TransactionHandler::SmartContractResult(scr)))
            .collect();
        intermediate_txs.insert(block_type, handlers);
    }

    Ok(ScheduledInfo {
        root_hash: record.root_hash,
        intermediate_txs,
        gas_and_fees: record.gas_and_fees,
        mini_blocks: record.mini_blocks,
    })
}
