//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (mnemonic, algod token)
//!     → wallet.rs (mnemonic.rs key recovery, signing)
//!     → client.rs (algod REST with timeouts and failover)
//!     → transaction.rs (build, sign via codec.rs, submit)
//!     → confirmation.rs (round-bounded wait for inclusion)
//! ```
//!
//! # Security Constraints
//! - Mnemonics and API tokens ONLY from environment variables
//! - Never log keys, mnemonics or tokens
//! - All node calls have configurable timeouts

pub mod client;
pub mod codec;
pub mod confirmation;
pub mod mnemonic;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::AlgodClient;
pub use codec::Address;
pub use confirmation::{await_confirmation, NodeQuery};
pub use transaction::{AppCallRequest, ConfirmedCall, TokenInfo, TxBuilder};
pub use types::{BlockchainError, BlockchainResult, NodeStatus, PendingStatus};
pub use wallet::Wallet;
