//! Error types for the CoreDocument subsystem
//!
//! Three layers of errors:
//! - [`DocumentError`]: building, versioning and hashing a single document
//! - [`ValidationErrors`]: keyed findings of the validator chain
//! - [`ProcessorError`]: one failed lifecycle step, wrapping the cause

use cd_01_document_tree::TreeError;
use shared_types::{CollaboratorId, IdentifierError};
use std::fmt;
use thiserror::Error;

use crate::ports::outbound::{AnchorError, IdentityError, NetworkError};

/// Errors raised by document operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The model holds no core document
    #[error("nil document")]
    NilDocument,

    /// A tree was requested before its salts were generated
    #[error("{tree} salts missing")]
    SaltsMissing { tree: &'static str },

    /// The signing root needs the embedded document type
    #[error("embedded data missing: document type unknown")]
    EmbeddedDataMissing,

    /// The data root was never calculated
    #[error("data root missing")]
    DataRootMissing,

    /// The data tree does not hash to the document's data root
    #[error("data tree root does not match the document data root")]
    DataRootMismatch,

    /// The document root needs a signing root
    #[error("signing root missing")]
    SigningRootMissing,

    /// A new version needs a complete previous version
    #[error("cannot prepare new version: {field} missing on previous version")]
    IncompleteDocument { field: &'static str },

    /// Read rules need at least one collaborator
    #[error("need at least one collaborator")]
    ZeroCollaborators,

    /// No read rule grants the peer access
    #[error("peer {peer} not found in read rules")]
    PeerNotFound { peer: CollaboratorId },

    /// A collaborator identifier could not be decoded
    #[error("invalid collaborator: {0}")]
    InvalidCollaborator(#[from] IdentifierError),

    /// Embedded payload belongs to a different model type
    #[error("embedded data type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Serialization failure
    #[error("codec error: {0}")]
    Codec(String),

    /// Tree construction or proof failure
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field or check key, e.g. `cd_identifier`
    pub key: String,
    /// Human readable message
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Aggregated findings of one or more validators.
///
/// An empty collection means the document passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection holding exactly one finding.
    pub fn single(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(key, message);
        errors
    }

    pub fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            key: key.into(),
            message: message.into(),
        });
    }

    /// Append every finding of `other`.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any finding carries `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.errors.iter().any(|e| e.key == key)
    }

    /// Messages recorded under `key`.
    pub fn messages_for(&self, key: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.key == key)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no validation errors");
        }
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl std::error::Error for ValidationErrors {}

/// A recipient the document could not be delivered to
#[derive(Debug)]
pub struct SendFailure {
    pub recipient: CollaboratorId,
    pub error: ProcessorError,
}

impl fmt::Display for SendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.recipient, self.error)
    }
}

fn join_failures(failures: &[SendFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Processor errors, one variant per failing lifecycle step
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Packing the model into a core document failed
    #[error("failed to pack core document: {0}")]
    Pack(DocumentError),

    /// Unpacking the mutated core document into the model failed
    #[error("failed to unpack core document: {0}")]
    Unpack(DocumentError),

    /// Sending a document without identifiers
    #[error("nil document")]
    NilDocument,

    /// Computing the signing root failed
    #[error("failed to calculate signing root: {0}")]
    SigningRoot(DocumentError),

    /// Computing the document root or its proofs failed
    #[error("failed to calculate document root: {0}")]
    DocumentRoot(DocumentError),

    #[error("failed to validate document: {0}")]
    PreSignatureValidation(ValidationErrors),

    #[error("failed to validate signatures: {0}")]
    SignatureValidation(ValidationErrors),

    #[error("failed to validate document for anchoring: {0}")]
    PreAnchorValidation(ValidationErrors),

    #[error("failed to validate anchored document: {0}")]
    PostAnchorValidation(ValidationErrors),

    /// Collecting signatures from collaborators failed
    #[error("failed to collect signatures: {0}")]
    SignatureCollection(NetworkError),

    /// The recipient's identity could not be resolved
    #[error("failed to look up identity of {recipient}: {source}")]
    IdentityLookup {
        recipient: CollaboratorId,
        source: IdentityError,
    },

    /// The caller's own identity could not be resolved
    #[error("failed to resolve own identity: {0}")]
    SelfIdentity(IdentityError),

    /// No client could be opened to the recipient
    #[error("failed to open client to {recipient}: {source}")]
    OpenClient {
        recipient: CollaboratorId,
        source: NetworkError,
    },

    /// Transport failure while delivering the document
    #[error("failed to send document to {recipient}: {source}")]
    SendDocument {
        recipient: CollaboratorId,
        source: NetworkError,
    },

    /// The recipient answered but refused the document
    #[error("{recipient} did not accept the document")]
    NotAccepted { recipient: CollaboratorId },

    /// Anchor id or document root could not be derived
    #[error("failed to derive anchor data: {0}")]
    AnchorData(AnchorError),

    /// The ledger refused the commit
    #[error("failed to commit anchor: {0}")]
    CommitAnchor(AnchorError),

    /// The commit was not confirmed
    #[error("anchor not confirmed: {0}")]
    AnchorConfirmation(AnchorError),

    /// Some recipients did not receive the document
    #[error("failed to send document to {} of {total} collaborators: {}", failures.len(), join_failures(failures))]
    PartialSend {
        total: usize,
        failures: Vec<SendFailure>,
    },
}

/// Result type for processor operations
pub type ProcessorResult<T> = Result<T, ProcessorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_aggregate() {
        let mut errors = ValidationErrors::single("cd_identifier", "document identifier missing");
        errors.extend(ValidationErrors::single("cd_salts", "core document salts missing"));

        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("cd_salts"));
        assert_eq!(
            errors.to_string(),
            "cd_identifier: document identifier missing; cd_salts: core document salts missing"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_empty_validation_errors_pass() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_partial_send_lists_recipients() {
        let recipient = CollaboratorId::new([1u8; 20]);
        let err = ProcessorError::PartialSend {
            total: 2,
            failures: vec![SendFailure {
                recipient,
                error: ProcessorError::NotAccepted { recipient },
            }],
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to send document to 1 of 2 collaborators"));
        assert!(message.contains(&recipient.to_hex()));
    }

    #[test]
    fn test_tree_error_is_transparent() {
        let err: DocumentError = TreeError::NotGenerated.into();
        assert_eq!(err.to_string(), "tree not generated");
    }
}
