//! # Domain Entities
//!
//! Leaves, the document tree and field proofs.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::sha256_many;
use shared_types::Hash;

use super::errors::{TreeError, TreeResult};
use super::property::Property;
use super::salts::Salts;
use super::value_objects::Salt;

/// Hash a salted leaf: `SHA-256(compact || value || salt)`.
pub fn hash_leaf(property: &Property, value: &[u8], salt: &Salt) -> Hash {
    sha256_many(&[property.compact(), value, salt])
}

/// Hash two nodes after sorting them: `SHA-256(min || max)`.
pub fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    sha256_many(&[lo, hi])
}

/// Fold `hashes` onto `leaf` with sorted pair hashing and compare to `root`.
pub fn verify_sorted_hashes(leaf: &Hash, hashes: &[Hash], root: &Hash) -> bool {
    let computed = hashes
        .iter()
        .fold(*leaf, |acc, sibling| hash_sorted_pair(&acc, sibling));
    computed == *root
}

/// A single leaf of a document tree.
///
/// Salted leaves carry their value and salt; hashed leaves carry a
/// pre-computed hash (typically the root of another tree).
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafNode {
    pub property: Property,
    #[serde_as(as = "Bytes")]
    pub value: Vec<u8>,
    pub salt: Option<Salt>,
    pub hash: Hash,
    pub hashed: bool,
}

impl LeafNode {
    /// Salted value leaf.
    pub fn salted(property: Property, value: Vec<u8>, salt: Salt) -> Self {
        let hash = hash_leaf(&property, &value, &salt);
        Self {
            property,
            value,
            salt: Some(salt),
            hash,
            hashed: false,
        }
    }

    /// Leaf whose hash is supplied by the caller.
    pub fn hashed(property: Property, hash: Hash) -> Self {
        Self {
            property,
            value: Vec::new(),
            salt: None,
            hash,
            hashed: true,
        }
    }
}

/// A field-level Merkle tree.
///
/// ALGORITHM: leaves sorted by compact property code; every level pairs
/// neighbours with sorted hashing; an unpaired last node moves up unchanged.
#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    leaves: Vec<LeafNode>,
    /// `levels[0]` are leaf hashes, the last level holds only the root.
    levels: Vec<Vec<Hash>>,
    generated: bool,
}

impl DocumentTree {
    /// An empty, ungenerated tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prepared leaf.
    pub fn add_leaf(&mut self, leaf: LeafNode) -> TreeResult<()> {
        if self.generated {
            return Err(TreeError::AlreadyGenerated);
        }
        let duplicate = self.leaves.iter().any(|l| {
            l.property.readable() == leaf.property.readable()
                || l.property.compact() == leaf.property.compact()
        });
        if duplicate {
            return Err(TreeError::DuplicateProperty {
                property: leaf.property.readable().to_string(),
            });
        }
        self.leaves.push(leaf);
        Ok(())
    }

    /// Add a value leaf salted from `salts`.
    pub fn add_salted(&mut self, property: Property, value: Vec<u8>, salts: &Salts) -> TreeResult<()> {
        let salt = *salts
            .get(property.readable())
            .ok_or_else(|| TreeError::SaltMissing {
                property: property.readable().to_string(),
            })?;
        self.add_leaf(LeafNode::salted(property, value, salt))
    }

    /// Add several prepared leaves.
    pub fn add_leaves<I: IntoIterator<Item = LeafNode>>(&mut self, leaves: I) -> TreeResult<()> {
        for leaf in leaves {
            self.add_leaf(leaf)?;
        }
        Ok(())
    }

    /// Sort leaves and compute every level up to the root.
    pub fn generate(&mut self) -> TreeResult<()> {
        if self.generated {
            return Err(TreeError::AlreadyGenerated);
        }
        if self.leaves.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        self.leaves
            .sort_by(|a, b| a.property.compact().cmp(b.property.compact()));

        let mut levels = vec![self.leaves.iter().map(|l| l.hash).collect::<Vec<_>>()];
        while let Some(current) = levels.last() {
            if current.len() <= 1 {
                break;
            }
            let next = current
                .chunks(2)
                .map(|pair| match pair.get(1) {
                    Some(right) => hash_sorted_pair(&pair[0], right),
                    None => pair[0],
                })
                .collect();
            levels.push(next);
        }

        self.levels = levels;
        self.generated = true;
        Ok(())
    }

    /// Whether `generate` has run.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Root hash.
    pub fn root(&self) -> TreeResult<Hash> {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .ok_or(TreeError::NotGenerated)
    }

    /// Leaves in tree order (sorted once generated).
    pub fn leaves(&self) -> &[LeafNode] {
        &self.leaves
    }

    /// Leaf by readable name.
    pub fn leaf(&self, readable: &str) -> Option<&LeafNode> {
        self.leaves
            .iter()
            .find(|l| l.property.readable() == readable)
    }

    /// Sibling hashes from the named leaf up to the root.
    pub fn sorted_hashes(&self, readable: &str) -> TreeResult<Vec<Hash>> {
        if !self.generated {
            return Err(TreeError::NotGenerated);
        }
        let mut index = self
            .leaves
            .iter()
            .position(|l| l.property.readable() == readable)
            .ok_or_else(|| TreeError::FieldNotFound {
                property: readable.to_string(),
            })?;

        let mut hashes = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if let Some(hash) = level.get(sibling) {
                hashes.push(*hash);
            }
            index /= 2;
        }
        Ok(hashes)
    }

    /// Proof of inclusion for the named leaf.
    pub fn create_proof(&self, readable: &str) -> TreeResult<Proof> {
        let sorted_hashes = self.sorted_hashes(readable)?;
        let leaf = self
            .leaf(readable)
            .ok_or_else(|| TreeError::FieldNotFound {
                property: readable.to_string(),
            })?;

        Ok(Proof {
            property: leaf.property.clone(),
            value: leaf.value.clone(),
            salt: leaf.salt,
            hash: leaf.hashed.then_some(leaf.hash),
            sorted_hashes,
        })
    }
}

/// Proof that a field had a value under some root.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// The proven property.
    pub property: Property,
    /// Disclosed value (empty for hashed leaves).
    #[serde_as(as = "Bytes")]
    pub value: Vec<u8>,
    /// Salt of a salted leaf.
    pub salt: Option<Salt>,
    /// Leaf hash of a hashed leaf.
    pub hash: Option<Hash>,
    /// Sibling hashes from the leaf to the root, in order.
    pub sorted_hashes: Vec<Hash>,
}

impl Proof {
    /// Recompute the leaf hash from the disclosed data.
    pub fn leaf_hash(&self) -> Hash {
        match (self.hash, self.salt) {
            (Some(hash), _) => hash,
            (None, Some(salt)) => hash_leaf(&self.property, &self.value, &salt),
            (None, None) => hash_leaf(&self.property, &self.value, &super::value_objects::ZERO_SALT),
        }
    }

    /// Verify this proof against `root`.
    pub fn verify(&self, root: &Hash) -> TreeResult<()> {
        if verify_sorted_hashes(&self.leaf_hash(), &self.sorted_hashes, root) {
            Ok(())
        } else {
            Err(TreeError::InvalidProof {
                property: self.property.readable().to_string(),
                root: hex::encode(root),
            })
        }
    }
}
