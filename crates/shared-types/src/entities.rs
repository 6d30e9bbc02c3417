//! # Core Entities
//!
//! Primitive value types shared by the tree, document and processor crates.
//!
//! ## Clusters
//!
//! - **Hashing**: `Hash`, `HASH_SIZE`, `random_hash`
//! - **Keys**: `PublicKey`, `Signature`
//! - **Identity**: `CollaboratorId`

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::IdentifierError;

// =============================================================================
// HASHING
// =============================================================================

/// Size in bytes of every hash, identifier and root.
pub const HASH_SIZE: usize = 32;

/// A 32-byte hash (SHA-256 or Keccak-256).
pub type Hash = [u8; HASH_SIZE];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Generate 32 random bytes, used for fresh document identifiers and versions.
pub fn random_hash() -> Hash {
    let mut bytes = [0u8; HASH_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Size in bytes of a collaborator identity.
pub const COLLABORATOR_ID_SIZE: usize = 20;

/// Identity of a party taking part in a document.
///
/// Textual form is `0x`-prefixed hex; parsing accepts either case and an
/// optional prefix so differently formatted inputs compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct CollaboratorId(pub [u8; COLLABORATOR_ID_SIZE]);

impl CollaboratorId {
    /// Create from raw bytes.
    pub fn new(bytes: [u8; COLLABORATOR_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice of exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentifierError> {
        let arr: [u8; COLLABORATOR_ID_SIZE] =
            bytes
                .try_into()
                .map_err(|_| IdentifierError::InvalidLength {
                    expected: COLLABORATOR_ID_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self, IdentifierError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits).map_err(|e| IdentifierError::InvalidHex {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    /// Generate a random identity (test and bootstrap helper).
    pub fn random() -> Self {
        let mut bytes = [0u8; COLLABORATOR_ID_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; COLLABORATOR_ID_SIZE] {
        &self.0
    }

    /// Canonical `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for CollaboratorId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for CollaboratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CollaboratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollaboratorId({})", self.to_hex())
    }
}
