pub mod error;
pub mod scheduled;
pub mod storage;
pub mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use error::ProcessError;
pub use traits::{
    IntermediateTxMap, RequestHandler, ReturnCode, ShardCoordinator, TransactionCoordinator,
    TxProcessor,
};
