use std::time::Duration;

use thiserror::Error;

use norn_common::marshal::MarshalError;

use crate::core::storage::StorageError;

/// Processing-layer error taxonomy shared by the scheduled execution engine
/// and the chunk reassembly processor.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("missing transaction")]
    MissingTransaction,

    #[error("wrong type assertion")]
    WrongTypeAssertion,

    #[error("time is out")]
    TimeIsOut,

    /// VM-level transaction failure already accounted by the processor.
    /// Absorbed at the execution driver boundary, never surfaced from it.
    #[error("failed transaction")]
    FailedTransaction,

    #[error("chunk reference length {actual} does not match the hasher output size {expected}")]
    IncompatibleReference { expected: usize, actual: usize },

    #[error("empty topic")]
    EmptyTopic,

    #[error("request interval {0:?} is below the minimum accepted interval")]
    InvalidRequestInterval(Duration),

    #[error("system busy")]
    SystemBusy,

    #[error("empty request value")]
    EmptyRequestValue,

    #[error("chunks processor is stopped")]
    ProcessorStopped,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
