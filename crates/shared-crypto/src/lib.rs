//! # Shared Crypto
//!
//! Key material and hash primitives used by the document crates.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256, Keccak-256 | Tree hashing, anchor commit hashes |
//! | `signatures` | Ed25519 | Collaborator signatures over signing roots |
//! | `ecdsa` | secp256k1 | Anchor commit authentication (transaction key) |
//!
//! ## Security Properties
//!
//! - **Ed25519**: deterministic nonces, so re-signing the same root yields the same bytes
//! - **secp256k1**: RFC 6979 deterministic, low-S normalised
//! - Secret key bytes are zeroized on drop

#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{keccak256, keccak256_many, sha256_many};
pub use signatures::{verify_ed25519, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
