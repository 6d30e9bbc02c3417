//! # Document Tree (cd-01)
//!
//! Field-level Merkle trees for structured documents. Each named field of a
//! document becomes a salted leaf; the tree root fingerprints the document and
//! any single field can later be disclosed together with a proof that it was
//! part of that fingerprint.
//!
//! ## Hashing Scheme
//!
//! ```text
//! leaf   = SHA-256(compact_property || value || salt)
//! parent = SHA-256(min(left, right) || max(left, right))
//! ```
//!
//! Siblings are sorted before hashing, so a proof is a plain list of sibling
//! hashes with no left/right markers. Leaves are ordered by their compact
//! property code, which makes the root independent of insertion order.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Salted leaves | A value leaf cannot be added without a salt for its property |
//! | Generate once | Leaves cannot be added after `generate` |
//! | Unique properties | Duplicate readable or compact names are rejected |
//! | Proof validity | Every proof from `create_proof` verifies against `root` |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): pure tree logic, no I/O

pub mod domain;

pub use domain::{
    hash_leaf, hash_sorted_pair, verify_sorted_hashes, DocumentTree, LeafNode, Property, Proof,
    Salt, Salts, TreeError, TreeResult, LENGTH_CODE, SALT_SIZE, ZERO_SALT,
};
