//! Wire encodings: addresses, canonical msgpack, transaction ids.
//!
//! Transactions are hashed and signed over `"TX" || msgpack(txn)` where the
//! msgpack form is canonical: map keys sorted, empty fields omitted, byte
//! strings as `bin`. Struct fields in `transaction.rs` are declared in key
//! order so serde emits them sorted.

use data_encoding::BASE32_NOPAD;
use serde::Serialize;
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Domain separation prefix for transactions.
pub const TX_PREFIX: &[u8] = b"TX";

const CHECKSUM_LEN: usize = 4;

/// 32-byte ed25519 public key, rendered as a 58-char checksummed address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = sha512_256(&self.0);
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[32 - CHECKSUM_LEN..]);
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = Vec::with_capacity(32 + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&raw))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| BlockchainError::Address(format!("{}: {}", s, e)))?;
        if raw.len() != 32 + CHECKSUM_LEN {
            return Err(BlockchainError::Address(format!(
                "{}: expected {} bytes, got {}",
                s,
                32 + CHECKSUM_LEN,
                raw.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&raw[..32]);
        let address = Address(key);
        if address.checksum()[..] != raw[32..] {
            return Err(BlockchainError::Address(format!("{}: checksum mismatch", s)));
        }
        Ok(address)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

/// SHA-512/256 digest.
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha512_256::digest(data));
    out
}

/// Canonical msgpack encoding of a serializable value.
pub fn encode_msgpack<T: Serialize>(value: &T) -> BlockchainResult<Vec<u8>> {
    rmp_serde::to_vec_named(value).map_err(|e| BlockchainError::Encoding(e.to_string()))
}

/// Bytes that get hashed for the id and signed: `"TX" || msgpack(txn)`.
pub fn bytes_to_sign<T: Serialize>(txn: &T) -> BlockchainResult<Vec<u8>> {
    let encoded = encode_msgpack(txn)?;
    let mut out = Vec::with_capacity(TX_PREFIX.len() + encoded.len());
    out.extend_from_slice(TX_PREFIX);
    out.extend_from_slice(&encoded);
    Ok(out)
}

/// Transaction id: base32 (no padding) of the SHA-512/256 of the signing bytes.
pub fn transaction_id<T: Serialize>(txn: &T) -> BlockchainResult<String> {
    let digest = sha512_256(&bytes_to_sign(txn)?);
    Ok(BASE32_NOPAD.encode(&digest))
}

/// Big-endian 8-byte encoding used for uint64 application arguments.
pub fn encode_u64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}
