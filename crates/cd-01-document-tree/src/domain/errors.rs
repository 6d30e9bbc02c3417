//! # Domain Errors
//!
//! Error types for tree construction and proofs.

use thiserror::Error;

/// Errors that can occur while building trees or proving fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No salt is available for a salted leaf.
    #[error("salt missing for property {property}")]
    SaltMissing { property: String },

    /// The property is not a leaf of this tree.
    ///
    /// Callers proving across several trees treat this as "try the next tree".
    #[error("no such field in tree: {property}")]
    FieldNotFound { property: String },

    /// Two leaves share a readable name or compact code.
    #[error("duplicate property in tree: {property}")]
    DuplicateProperty { property: String },

    /// Leaves cannot be added after the tree was generated.
    #[error("tree already generated")]
    AlreadyGenerated,

    /// Root or proofs requested before `generate`.
    #[error("tree not generated")]
    NotGenerated,

    /// A tree needs at least one leaf.
    #[error("cannot generate a tree without leaves")]
    EmptyTree,

    /// A proof does not hash up to the expected root.
    #[error("proof for {property} does not verify against root {root}")]
    InvalidProof { property: String, root: String },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
