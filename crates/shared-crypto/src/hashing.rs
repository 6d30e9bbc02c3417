//! # Hashing
//!
//! SHA-256 backs every document tree; Keccak-256 backs the anchor commit hash
//! so ledgers that natively speak Keccak can recompute it.

use sha2::{Digest, Sha256};
use sha3::Keccak256;
use shared_types::Hash;

/// SHA-256 over the concatenation of several inputs.
pub fn sha256_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}

/// Keccak-256 of a single input.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Keccak-256 over the concatenation of several inputs.
pub fn keccak256_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}
