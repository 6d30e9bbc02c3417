//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The processor depends on three external services:
//! - [`IdentityService`]: collaborator lookup and signature checks
//! - [`NetworkClient`]: peer-to-peer delivery and signature collection
//! - [`AnchorRepository`]: the ledger holding anchored document roots

use async_trait::async_trait;
use shared_crypto::keccak256_many;
use shared_types::{CollaboratorId, Hash};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::context::ProcessorContext;
use crate::domain::{CoreDocument, DocumentSignature};

// =============================================================================
// IDENTITY
// =============================================================================

/// Identity service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("identity {0} not found")]
    NotFound(CollaboratorId),

    #[error("identity {0} has no p2p key")]
    NoP2pKey(CollaboratorId),

    /// The signing key is not registered for the signer
    #[error("key not registered for {signer}")]
    KeyNotRegistered { signer: CollaboratorId },

    #[error("invalid signature from {signer}: {reason}")]
    InvalidSignature {
        signer: CollaboratorId,
        reason: String,
    },

    #[error("identity lookup failed: {0}")]
    Lookup(String),
}

/// Public identity of a collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    pub id: CollaboratorId,
    /// Peer-to-peer keys, oldest first
    pub p2p_keys: Vec<String>,
}

impl PeerInfo {
    /// The most recently registered p2p key, used as the peer address.
    pub fn current_p2p_key(&self) -> Result<String, IdentityError> {
        self.p2p_keys
            .last()
            .cloned()
            .ok_or(IdentityError::NoP2pKey(self.id))
    }
}

/// Identity registry
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolve a collaborator's public identity.
    async fn lookup_identity_for_id(&self, id: &CollaboratorId) -> Result<PeerInfo, IdentityError>;

    /// Check that `signature` is a valid signature over `message` by a key
    /// registered for its signer.
    async fn validate_signature(
        &self,
        signature: &DocumentSignature,
        message: &[u8],
    ) -> Result<(), IdentityError>;
}

// =============================================================================
// NETWORK
// =============================================================================

/// Network errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("cannot connect to {address}: {reason}")]
    Connection { address: String, reason: String },

    #[error("send failed: {0}")]
    Send(String),

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error("signature collection failed: {0}")]
    SignatureCollection(String),
}

/// Header attached to every document sent to a peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentrifugeHeader {
    pub sender_id: CollaboratorId,
    pub node_version: String,
    pub network_id: u32,
}

/// Anchored document delivered to a collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorDocumentRequest {
    pub header: CentrifugeHeader,
    pub document: CoreDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorDocumentResponse {
    pub accepted: bool,
}

/// An open connection to one peer
#[async_trait]
pub trait RemoteHandle: Send + Sync {
    async fn send_anchored_document(
        &self,
        request: AnchorDocumentRequest,
    ) -> Result<AnchorDocumentResponse, NetworkError>;
}

/// Peer-to-peer client
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Connect to the peer reachable under `address` (its p2p key).
    async fn open_client(&self, address: &str) -> Result<Arc<dyn RemoteHandle>, NetworkError>;

    /// Ask every collaborator to sign `document`, appending the signatures
    /// they return.
    async fn get_signatures_for_document(
        &self,
        ctx: &ProcessorContext,
        identity: &dyn IdentityService,
        document: &mut CoreDocument,
    ) -> Result<(), NetworkError>;
}

// =============================================================================
// ANCHORING
// =============================================================================

/// Anchor repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    #[error("invalid anchor id")]
    InvalidAnchorId,

    #[error("invalid document root")]
    InvalidDocumentRoot,

    #[error("anchor {0} not found")]
    NotFound(AnchorId),

    #[error("anchor {0} already committed")]
    AlreadyAnchored(AnchorId),

    #[error("commit rejected: {0}")]
    CommitRejected(String),

    #[error("anchor confirmation timed out")]
    ConfirmationTimeout,

    /// The producer went away without confirming or failing
    #[error("anchor confirmation dropped")]
    ConfirmationDropped,

    #[error("ledger error: {0}")]
    Ledger(String),
}

/// Ledger key of an anchored version, derived from its `current_version`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub Hash);

impl AnchorId {
    pub fn for_document(cd: &CoreDocument) -> Result<Self, AnchorError> {
        cd.current_version.map(Self).ok_or(AnchorError::InvalidAnchorId)
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnchorId({self})")
    }
}

/// Anchored document root
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentRoot(pub Hash);

impl DocumentRoot {
    pub fn for_document(cd: &CoreDocument) -> Result<Self, AnchorError> {
        cd.document_root.map(Self).ok_or(AnchorError::InvalidDocumentRoot)
    }
}

/// Message authenticated by the commit MAC:
/// `Keccak256(anchor_id || caller || document_root)`.
pub fn commit_hash(anchor_id: &AnchorId, caller: &CollaboratorId, root: &DocumentRoot) -> Hash {
    keccak256_many(&[
        anchor_id.0.as_slice(),
        caller.as_bytes().as_slice(),
        root.0.as_slice(),
    ])
}

/// Producer half of an anchor confirmation
#[derive(Debug)]
pub struct ConfirmationSender {
    sender: oneshot::Sender<Result<(), AnchorError>>,
}

impl ConfirmationSender {
    /// Report success. Returns `false` if nobody is waiting any more.
    pub fn confirm(self) -> bool {
        self.sender.send(Ok(())).is_ok()
    }

    /// Report failure. Returns `false` if nobody is waiting any more.
    pub fn fail(self, error: AnchorError) -> bool {
        self.sender.send(Err(error)).is_ok()
    }
}

/// Completes once the ledger confirmed (or rejected) a commit
#[derive(Debug)]
pub struct AnchorConfirmation {
    receiver: oneshot::Receiver<Result<(), AnchorError>>,
}

impl AnchorConfirmation {
    /// An already completed confirmation.
    pub fn ready(result: Result<(), AnchorError>) -> Self {
        let (sender, confirmation) = confirmation_channel();
        match result {
            Ok(()) => sender.confirm(),
            Err(error) => sender.fail(error),
        };
        confirmation
    }

    /// Wait for the outcome, giving up at `deadline`.
    pub async fn wait_until(self, deadline: Instant) -> Result<(), AnchorError> {
        match tokio::time::timeout_at(deadline, self.receiver).await {
            Err(_) => Err(AnchorError::ConfirmationTimeout),
            Ok(Err(_)) => Err(AnchorError::ConfirmationDropped),
            Ok(Ok(result)) => result,
        }
    }
}

/// Linked producer and consumer halves of a confirmation.
pub fn confirmation_channel() -> (ConfirmationSender, AnchorConfirmation) {
    let (sender, receiver) = oneshot::channel();
    (ConfirmationSender { sender }, AnchorConfirmation { receiver })
}

/// The ledger of anchored document roots
#[async_trait]
pub trait AnchorRepository: Send + Sync {
    /// Submit `document_root` under `anchor_id`.
    ///
    /// `proofs` are the hashes proving the signing root under the document
    /// root; `mac` is the caller's signature over [`commit_hash`].
    async fn commit_anchor(
        &self,
        anchor_id: AnchorId,
        document_root: DocumentRoot,
        caller: CollaboratorId,
        proofs: Vec<Hash>,
        mac: Vec<u8>,
    ) -> Result<AnchorConfirmation, AnchorError>;

    /// Root committed under `anchor_id`.
    async fn get_document_root_of(&self, anchor_id: &AnchorId) -> Result<DocumentRoot, AnchorError>;
}
