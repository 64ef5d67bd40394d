//! 25-word account mnemonics.
//!
//! The 32-byte seed is packed little-endian into 11-bit indices of the
//! BIP-39 English word list (24 words, the last byte of the 33-byte
//! unpacked form must be zero). The 25th word is the first 11 bits of
//! `sha512_256(seed)`.

use bip39::Language;

use crate::blockchain::codec::sha512_256;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Number of words in an account mnemonic.
pub const MNEMONIC_LEN: usize = 25;

const KEY_WORDS: usize = MNEMONIC_LEN - 1;

/// Recover the 32-byte ed25519 seed from a mnemonic.
pub fn seed_from_mnemonic(phrase: &str) -> BlockchainResult<[u8; 32]> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() != MNEMONIC_LEN {
        return Err(BlockchainError::Mnemonic(format!(
            "expected {} words, got {}",
            MNEMONIC_LEN,
            words.len()
        )));
    }

    let mut indices = Vec::with_capacity(MNEMONIC_LEN);
    for (position, word) in words.iter().enumerate() {
        let index = Language::English
            .find_word(&word.to_lowercase())
            .ok_or_else(|| {
                // Position only; the word itself is secret material.
                BlockchainError::Mnemonic(format!("unknown word at position {}", position + 1))
            })?;
        indices.push(index);
    }

    let unpacked = from_11_bit(&indices[..KEY_WORDS]);
    if unpacked.len() != 33 || unpacked[32] != 0 {
        return Err(BlockchainError::Mnemonic("malformed key words".to_string()));
    }

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&unpacked[..32]);

    if checksum_index(&seed) != indices[KEY_WORDS] {
        return Err(BlockchainError::Mnemonic("checksum word mismatch".to_string()));
    }
    Ok(seed)
}

/// Render a 32-byte seed as a 25-word mnemonic.
pub fn mnemonic_from_seed(seed: &[u8; 32]) -> String {
    let list = Language::English.word_list();
    let mut words: Vec<&str> = to_11_bit(seed)
        .into_iter()
        .map(|index| list[index as usize])
        .collect();
    words.push(list[checksum_index(seed) as usize]);
    words.join(" ")
}

fn checksum_index(seed: &[u8; 32]) -> u16 {
    let digest = sha512_256(seed);
    to_11_bit(&digest[..2])[0]
}

fn to_11_bit(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / 11 + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for byte in bytes {
        buffer |= (*byte as u32) << bits;
        bits += 8;
        if bits >= 11 {
            out.push((buffer & 0x7ff) as u16);
            buffer >>= 11;
            bits -= 11;
        }
    }
    if bits != 0 {
        out.push((buffer & 0x7ff) as u16);
    }
    out
}

fn from_11_bit(indices: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len() * 11 / 8 + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for index in indices {
        buffer |= (*index as u32) << bits;
        bits += 11;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}
