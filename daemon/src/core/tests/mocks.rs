// Hand-rolled collaborator stubs for processing-layer tests. Each stub holds
// optional closures that override the default behavior per test.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use norn_common::marshal::{Marshaller, MarshalError};
use norn_common::transaction::Transaction;

use crate::core::error::ProcessError;
use crate::core::storage::{StorageError, Storer};
use crate::core::traits::{
    IntermediateTxMap, RequestHandler, ReturnCode, ShardCoordinator, TransactionCoordinator,
    TxProcessor,
};

type ProcessTransactionFn =
    dyn Fn(&Transaction) -> Result<ReturnCode, ProcessError> + Send + Sync;
type SameShardFn = dyn Fn(&[u8], &[u8]) -> bool + Send + Sync;
type GetFn = dyn Fn(&[u8]) -> Result<Vec<u8>, StorageError> + Send + Sync;
type PutFn = dyn Fn(&[u8], &[u8]) -> Result<(), StorageError> + Send + Sync;

#[derive(Default)]
pub struct TxProcessorStub {
    pub process_transaction_called: Option<Box<ProcessTransactionFn>>,
}

#[async_trait]
impl TxProcessor for TxProcessorStub {
    async fn process_transaction(&self, tx: &Transaction) -> Result<ReturnCode, ProcessError> {
        match &self.process_transaction_called {
            Some(called) => called(tx),
            None => Ok(ReturnCode::Ok),
        }
    }
}

#[derive(Default)]
pub struct TransactionCoordinatorStub {
    pub all_intermediate_txs_called: Option<Box<dyn Fn() -> IntermediateTxMap + Send + Sync>>,
}

impl TransactionCoordinator for TransactionCoordinatorStub {
    fn all_intermediate_txs(&self) -> IntermediateTxMap {
        match &self.all_intermediate_txs_called {
            Some(called) => called(),
            None => IntermediateTxMap::new(),
        }
    }
}

#[derive(Default)]
pub struct ShardCoordinatorStub {
    pub same_shard_called: Option<Box<SameShardFn>>,
    pub self_shard_id: u32,
}

impl ShardCoordinator for ShardCoordinatorStub {
    fn self_id(&self) -> u32 {
        self.self_shard_id
    }

    fn same_shard(&self, sender: &[u8], receiver: &[u8]) -> bool {
        match &self.same_shard_called {
            Some(called) => called(sender, receiver),
            None => false,
        }
    }
}

#[derive(Default)]
pub struct StorerStub {
    pub get_called: Option<Box<GetFn>>,
    pub put_called: Option<Box<PutFn>>,
}

#[async_trait]
impl Storer for StorerStub {
    async fn get(&self, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        match &self.get_called {
            Some(called) => called(key),
            None => Err(StorageError::KeyNotFound),
        }
    }

    async fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match &self.put_called {
            Some(called) => called(key, value),
            None => Ok(()),
        }
    }
}

/// JSON marshaller with switchable failure injection.
#[derive(Default)]
pub struct MarshallerStub {
    pub fail_marshal: bool,
    pub fail_unmarshal: bool,
}

impl Marshaller for MarshallerStub {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, MarshalError> {
        if self.fail_marshal {
            return Err(MarshalError::Serialize("forced marshal failure".into()));
        }
        serde_json::to_vec(value).map_err(|err| MarshalError::Serialize(err.to_string()))
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, MarshalError> {
        if self.fail_unmarshal {
            return Err(MarshalError::Deserialize("forced unmarshal failure".into()));
        }
        serde_json::from_slice(bytes).map_err(|err| MarshalError::Deserialize(err.to_string()))
    }
}

/// Records every trie-node request it receives.
#[derive(Default, Clone)]
pub struct RequestHandlerStub {
    pub requests: Arc<Mutex<Vec<(u32, Vec<u8>, String, u32)>>>,
}

impl RequestHandlerStub {
    pub fn recorded(&self) -> Vec<(u32, Vec<u8>, String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestHandler for RequestHandlerStub {
    async fn request_trie_node(
        &self,
        shard_id: u32,
        reference: &[u8],
        topic: &str,
        chunk_index: u32,
    ) {
        self.requests.lock().unwrap().push((
            shard_id,
            reference.to_vec(),
            topic.to_string(),
            chunk_index,
        ));
    }
}
