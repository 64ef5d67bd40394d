//! Algorand token-info application call tool.
//!
//! Builds the `token-info` application call, signs it with an injected
//! account, submits it to algod and waits a bounded number of ledger rounds
//! for confirmation.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use blockchain::{await_confirmation, AlgodClient, BlockchainError, NodeQuery, TxBuilder};
pub use config::TokenInfoConfig;
pub use lifecycle::Shutdown;
