//! # Properties
//!
//! Every leaf is named twice: a readable dotted path used by callers
//! (`roles[0].collaborators[1]`) and a compact byte code hashed into the leaf.
//! Compact codes are what keep proofs stable across implementations, so they
//! are part of the wire format and must never be renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value_objects::{LENGTH_CODE, LENGTH_SUFFIX};

/// Name of a leaf in a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    readable: String,
    compact: Vec<u8>,
}

impl Property {
    /// A top-level property with a 4-byte big-endian field code.
    pub fn with_code(readable: impl Into<String>, code: u32) -> Self {
        Self {
            readable: readable.into(),
            compact: code.to_be_bytes().to_vec(),
        }
    }

    /// A property whose compact form is given verbatim.
    ///
    /// Used for free-form payload attributes where the name is the identity.
    pub fn with_compact(readable: impl Into<String>, compact: impl Into<Vec<u8>>) -> Self {
        Self {
            readable: readable.into(),
            compact: compact.into(),
        }
    }

    /// Nested field `self.name`, compact code `self || code`.
    pub fn field(&self, name: &str, code: u32) -> Self {
        let mut compact = self.compact.clone();
        compact.extend_from_slice(&code.to_be_bytes());
        Self {
            readable: format!("{}.{}", self.readable, name),
            compact,
        }
    }

    /// List element `self[index]`, compact code `self || u64(index)`.
    pub fn element(&self, index: usize) -> Self {
        let mut compact = self.compact.clone();
        compact.extend_from_slice(&(index as u64).to_be_bytes());
        Self {
            readable: format!("{}[{}]", self.readable, index),
            compact,
        }
    }

    /// Length leaf of a repeated property.
    pub fn length(&self) -> Self {
        self.field(LENGTH_SUFFIX, LENGTH_CODE)
    }

    /// Readable dotted path.
    pub fn readable(&self) -> &str {
        &self.readable
    }

    /// Compact byte code.
    pub fn compact(&self) -> &[u8] {
        &self.compact
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{})", self.readable, hex::encode(&self.compact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_code_is_four_bytes() {
        let p = Property::with_code("cd_root", 0x0000_0007);
        assert_eq!(p.compact(), &[0, 0, 0, 7]);
        assert_eq!(p.readable(), "cd_root");
    }

    #[test]
    fn test_nested_paths() {
        let roles = Property::with_code("roles", 0x0D);
        let key = roles.element(2).field("role_key", 1);

        assert_eq!(key.readable(), "roles[2].role_key");
        assert_eq!(
            key.compact(),
            &[0, 0, 0, 0x0D, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_length_property() {
        let collaborators = Property::with_code("collaborators", 0x0C);
        let length = collaborators.length();

        assert_eq!(length.readable(), "collaborators.length");
        assert_eq!(&length.compact()[4..], &LENGTH_CODE.to_be_bytes());
    }
}
