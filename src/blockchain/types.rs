//! Ledger-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export NodeConfig from config module to avoid duplication
pub use crate::config::schema::NodeConfig;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Transport-level failure talking to the node.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Node answered with a non-success HTTP status.
    #[error("Node returned {status}: {message}")]
    Node { status: u16, message: String },

    /// Request to the node timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Node response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The pending pool dropped the transaction. Not retryable.
    #[error("Transaction {tx_id} rejected: {message}")]
    TransactionRejected { tx_id: String, message: String },

    /// Round budget exhausted. The transaction may still confirm later.
    #[error("Transaction {tx_id} not confirmed after {rounds} rounds")]
    ConfirmationTimeout { tx_id: String, rounds: u64 },

    /// Caller cancelled the wait.
    #[error("Wait for transaction {0} cancelled")]
    Cancelled(String),

    /// Account loading or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Mnemonic could not be turned into a key.
    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    /// Malformed account address.
    #[error("Invalid address: {0}")]
    Address(String),

    /// Transaction could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl BlockchainError {
    /// Node refused a submission because it already holds the transaction.
    pub fn is_duplicate_submission(&self) -> bool {
        match self {
            BlockchainError::Node { status: 400, message } => {
                message.contains("already in ledger") || message.contains("already in pool")
            }
            _ => false,
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Node status as reported by `/v2/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatus {
    pub last_round: u64,
    #[serde(default)]
    pub time_since_last_round: u64,
    #[serde(default)]
    pub catchup_time: u64,
    #[serde(default)]
    pub last_version: String,
}

/// Pending-pool view of a single transaction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingStatus {
    /// Round the transaction was included in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_round: Option<u64>,

    /// Reason the pool dropped the transaction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_error: Option<String>,

    /// Application created by the transaction, if it was a create call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_index: Option<u64>,

    /// The signed transaction as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn: Option<serde_json::Value>,
}

impl PendingStatus {
    /// Nonzero confirmed round, if the transaction is finalized.
    pub fn confirmed(&self) -> Option<u64> {
        self.confirmed_round.filter(|round| *round > 0)
    }

    /// Non-empty pool error, if the transaction was rejected.
    pub fn rejection(&self) -> Option<&str> {
        self.pool_error.as_deref().filter(|msg| !msg.is_empty())
    }

    /// Application id the transaction called (`txn.txn.apid`).
    pub fn app_id(&self) -> Option<u64> {
        self.txn
            .as_ref()
            .and_then(|signed| signed.get("txn"))
            .and_then(|txn| txn.get("apid"))
            .and_then(|apid| apid.as_u64())
            .or(self.application_index)
    }
}

/// Suggested parameters from `/v2/transactions/params`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuggestedParams {
    /// Per-byte fee suggestion.
    pub fee: u64,
    pub min_fee: u64,
    pub last_round: u64,
    pub genesis_id: String,
    /// Base64 genesis hash.
    pub genesis_hash: String,
    #[serde(default)]
    pub consensus_version: String,
}

/// Response to a raw transaction submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "txId")]
    pub tx_id: String,
}

/// Error body returned by algod on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeErrorBody {
    pub message: String,
}
