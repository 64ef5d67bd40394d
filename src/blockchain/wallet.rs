//! Account loading and transaction signing.
//!
//! # Security
//! - The mnemonic is supplied at invocation time, from the environment
//! - Keys and mnemonics are never logged or serialized
//! - `Debug` shows the address only

use ed25519_dalek::{Signer, SigningKey};

use crate::blockchain::codec::Address;
use crate::blockchain::mnemonic::seed_from_mnemonic;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable holding the 25-word account mnemonic.
pub const MNEMONIC_ENV_VAR: &str = "TOKEN_INFO_MNEMONIC";

/// Signing account.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Create a wallet from a raw 32-byte ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let address = Address(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Create a wallet from a 25-word mnemonic.
    pub fn from_mnemonic(phrase: &str) -> BlockchainResult<Self> {
        let seed = seed_from_mnemonic(phrase)?;
        let wallet = Self::from_seed(&seed);
        tracing::info!(address = %wallet.address, "Wallet initialized");
        Ok(wallet)
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `TOKEN_INFO_MNEMONIC` from environment.
    pub fn from_env() -> BlockchainResult<Self> {
        let phrase = std::env::var(MNEMONIC_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", MNEMONIC_ENV_VAR))
        })?;
        Self::from_mnemonic(&phrase)
    }

    /// Get the account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign raw bytes, returning the 64-byte ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address.to_string())
            .finish()
    }
}
