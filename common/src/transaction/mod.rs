use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// User-signed transaction payload, as it enters the processing layer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub value: U256,
    pub receiver: Vec<u8>,
    pub sender: Vec<u8>,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub data: Vec<u8>,
}

/// Follow-on artifact produced by smart contract execution, routed to the
/// shard of its receiver.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartContractResult {
    pub nonce: u64,
    pub value: U256,
    pub receiver: Vec<u8>,
    pub sender: Vec<u8>,
    pub data: Vec<u8>,
    pub original_tx_hash: Vec<u8>,
    pub gas_price: u64,
    pub gas_limit: u64,
}

/// Execution receipt, addressed back to the sender of the originating
/// transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub value: U256,
    pub sender: Vec<u8>,
    pub data: Vec<u8>,
    pub tx_hash: Vec<u8>,
}

/// Any payload the processing layer moves around: user transactions and the
/// intermediate artifacts execution produces from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionHandler {
    Transaction(Transaction),
    SmartContractResult(SmartContractResult),
    Receipt(Receipt),
}

impl TransactionHandler {
    pub fn nonce(&self) -> u64 {
        match self {
            Self::Transaction(tx) => tx.nonce,
            Self::SmartContractResult(scr) => scr.nonce,
            Self::Receipt(_) => 0,
        }
    }

    pub fn value(&self) -> U256 {
        match self {
            Self::Transaction(tx) => tx.value,
            Self::SmartContractResult(scr) => scr.value,
            Self::Receipt(receipt) => receipt.value,
        }
    }

    pub fn sender_addr(&self) -> &[u8] {
        match self {
            Self::Transaction(tx) => &tx.sender,
            Self::SmartContractResult(scr) => &scr.sender,
            Self::Receipt(receipt) => &receipt.sender,
        }
    }

    /// Receipts carry no receiver of their own: they travel back to the
    /// sender of the originating transaction.
    pub fn receiver_addr(&self) -> &[u8] {
        match self {
            Self::Transaction(tx) => &tx.receiver,
            Self::SmartContractResult(scr) => &scr.receiver,
            Self::Receipt(receipt) => &receipt.sender,
        }
    }
}

impl From<Transaction> for TransactionHandler {
    fn from(tx: Transaction) -> Self {
        Self::Transaction(tx)
    }
}

impl From<SmartContractResult> for TransactionHandler {
    fn from(scr: SmartContractResult) -> Self {
        Self::SmartContractResult(scr)
    }
}

impl From<Receipt> for TransactionHandler {
    fn from(receipt: Receipt) -> Self {
        Self::Receipt(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_exposes_sender_and_receiver() {
        let handler = TransactionHandler::from(Transaction {
            sender: b"alice".to_vec(),
            receiver: b"bob".to_vec(),
            ..Transaction::default()
        });
        assert_eq!(handler.sender_addr(), b"alice");
        assert_eq!(handler.receiver_addr(), b"bob");
    }

    #[test]
    fn test_receipt_is_addressed_back_to_sender() {
        let handler = TransactionHandler::from(Receipt {
            sender: b"alice".to_vec(),
            ..Receipt::default()
        });
        assert_eq!(handler.receiver_addr(), handler.sender_addr());
    }
}
