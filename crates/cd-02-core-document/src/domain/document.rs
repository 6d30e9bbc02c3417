//! # Core Document
//!
//! The envelope every business document travels in. It carries the version
//! chain, collaborators and their read rules, the signatures over the signing
//! root and the opaque business payload.
//!
//! Roots and salts are `Option`: a fresh document has none until the
//! corresponding step of the lifecycle computed them.

use cd_01_document_tree::Salts;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::Ed25519KeyPair;
use shared_types::{CollaboratorId, Hash, PublicKey, Signature};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{DocumentError, DocumentResult};

/// Versioned document envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDocument {
    /// Stable across all versions
    pub document_identifier: Option<Hash>,
    pub previous_version: Option<Hash>,
    pub current_version: Option<Hash>,
    /// Pre-announced identifier of the next version
    pub next_version: Option<Hash>,
    pub data_root: Option<Hash>,
    pub signing_root: Option<Hash>,
    pub document_root: Option<Hash>,
    /// Document root of the previous version
    pub previous_root: Option<Hash>,
    pub collaborators: Vec<CollaboratorId>,
    pub roles: Vec<Role>,
    pub read_rules: Vec<ReadRule>,
    pub access_tokens: Vec<AccessToken>,
    pub signature_data: SignatureData,
    pub signature_data_salts: Option<Salts>,
    /// Salts of the core-document tree
    pub salts: Option<Salts>,
    pub embedded_data: Option<EmbeddedData>,
    pub embedded_data_salts: Option<Salts>,
}

/// A named group of collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_key: u32,
    pub collaborators: Vec<CollaboratorId>,
}

/// What a read rule grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    ReadAndSign,
}

impl Action {
    /// Leaf encoding.
    pub fn code(self) -> u8 {
        match self {
            Action::ReadAndSign => 1,
        }
    }
}

/// Grants `action` to every member of `roles`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRule {
    pub roles: Vec<u32>,
    pub action: Action,
}

/// Delegated access to a document for a non-collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub identifier: Hash,
    pub granter: CollaboratorId,
    pub grantee: CollaboratorId,
    pub role_key: u32,
    pub document_identifier: Hash,
    pub signature: Vec<u8>,
    pub key: Vec<u8>,
}

/// A collaborator's signature over the signing root
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSignature {
    pub signer_id: CollaboratorId,
    pub public_key: PublicKey,
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
    /// Unix seconds
    pub timestamp: u64,
}

impl DocumentSignature {
    /// Sign `message` (normally the signing root) on behalf of `signer_id`.
    pub fn sign(signer_id: CollaboratorId, keys: &Ed25519KeyPair, message: &[u8]) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            signer_id,
            public_key: *keys.public_key().as_bytes(),
            signature: keys.sign(message).to_bytes(),
            timestamp,
        }
    }

    /// Same signer, key and signature bytes. Timestamps are ignored.
    pub fn matches(&self, other: &DocumentSignature) -> bool {
        self.signer_id == other.signer_id
            && self.public_key == other.public_key
            && self.signature == other.signature
    }
}

/// Signatures collected for the current version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureData {
    pub signatures: Vec<DocumentSignature>,
}

/// Typed opaque business payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedData {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl CoreDocument {
    /// Signatures collected so far.
    pub fn signatures(&self) -> &[DocumentSignature] {
        &self.signature_data.signatures
    }

    /// Encode for transport or storage.
    pub fn to_bytes(&self) -> DocumentResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| DocumentError::Codec(e.to_string()))
    }

    /// Decode a document produced by [`CoreDocument::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> DocumentResult<Self> {
        bincode::deserialize(bytes).map_err(|e| DocumentError::Codec(e.to_string()))
    }
}
