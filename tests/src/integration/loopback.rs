//! # Loopback Network
//!
//! Every node that joins a [`Network`] registers its keys with the shared
//! identity registry and ledger, and becomes reachable under
//! `loopback/<id>`. A node answers two kinds of requests:
//!
//! - **Sign**: check the document with the post signature request pipeline,
//!   then sign its signing root
//! - **Deliver**: check the document against the ledger with the post
//!   anchored pipeline, then keep it
//!
//! Nodes can be taken offline to simulate unreachable collaborators.

use async_trait::async_trait;
use cd_02_core_document::validators::MODEL_KEY;
use cd_02_core_document::{
    post_anchored_validator, post_signature_request_validator, AnchorDocumentRequest,
    AnchorDocumentResponse, CoreDocument, DefaultProcessor, DocumentProcessor, DocumentSignature,
    GenericModel, IdentityService, InMemoryAnchorRepository, KeyringIdentityService, Model,
    NetworkClient, NetworkError, ProcessorConfig, ProcessorContext, ProcessorResult,
    RemoteHandle, ValidationErrors, Validator,
};
use parking_lot::{Mutex, RwLock};
use shared_crypto::{Ed25519KeyPair, Secp256k1KeyPair};
use shared_types::CollaboratorId;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Type of every document exchanged on the loopback network
pub const TYPE_URL: &str = "centrifuge/invoice";

pub type NodeProcessor =
    DefaultProcessor<KeyringIdentityService, LoopbackClient, InMemoryAnchorRepository>;

// =============================================================================
// RECEIVING SIDE
// =============================================================================

/// The part of a node other nodes talk to
pub struct Peer {
    id: CollaboratorId,
    keys: Arc<Ed25519KeyPair>,
    identity: Arc<KeyringIdentityService>,
    ledger: Arc<InMemoryAnchorRepository>,
    online: AtomicBool,
    received: Mutex<Vec<GenericModel>>,
    rejected: Mutex<Vec<ValidationErrors>>,
}

impl Peer {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn restore(&self, document: CoreDocument) -> Result<GenericModel, ValidationErrors> {
        let mut model = GenericModel::empty(TYPE_URL);
        model
            .unpack_core_document(document)
            .map_err(|e| ValidationErrors::single(MODEL_KEY, e.to_string()))?;
        Ok(model)
    }

    /// Sign `document` if we may read it and it checks out.
    async fn sign(&self, document: &CoreDocument) -> Result<DocumentSignature, NetworkError> {
        let refused = |reason: String| {
            NetworkError::SignatureCollection(format!("{} refused to sign: {reason}", self.id))
        };

        document
            .peer_can_read(&self.id)
            .map_err(|e| refused(e.to_string()))?;
        let model = self
            .restore(document.clone())
            .map_err(|e| refused(e.to_string()))?;
        post_signature_request_validator(Arc::clone(&self.identity))
            .validate(None, Some(&model))
            .await
            .map_err(|e| refused(e.to_string()))?;

        let signing_root = document
            .signing_root
            .ok_or_else(|| refused("signing root missing".to_string()))?;
        Ok(DocumentSignature::sign(self.id, &self.keys, &signing_root))
    }

    fn reject(&self, errors: ValidationErrors) -> AnchorDocumentResponse {
        warn!(peer = %self.id, errors = %errors, "rejected anchored document");
        self.rejected.lock().push(errors);
        AnchorDocumentResponse { accepted: false }
    }
}

#[async_trait]
impl RemoteHandle for Peer {
    async fn send_anchored_document(
        &self,
        request: AnchorDocumentRequest,
    ) -> Result<AnchorDocumentResponse, NetworkError> {
        if !self.is_online() {
            return Err(NetworkError::Send(format!("{} went offline", self.id)));
        }

        let model = match self.restore(request.document) {
            Ok(model) => model,
            Err(errors) => return Ok(self.reject(errors)),
        };
        let verdict = post_anchored_validator(Arc::clone(&self.ledger))
            .validate(None, Some(&model))
            .await;
        if let Err(errors) = verdict {
            return Ok(self.reject(errors));
        }

        debug!(peer = %self.id, sender = %request.header.sender_id, "accepted anchored document");
        self.received.lock().push(model);
        Ok(AnchorDocumentResponse { accepted: true })
    }
}

// =============================================================================
// SENDING SIDE
// =============================================================================

#[derive(Default)]
struct Directory {
    peers: RwLock<HashMap<String, Arc<Peer>>>,
}

impl Directory {
    fn reachable(&self, address: &str) -> Result<Arc<Peer>, NetworkError> {
        let unreachable = |reason: &str| NetworkError::Connection {
            address: address.to_string(),
            reason: reason.to_string(),
        };
        let peer = self
            .peers
            .read()
            .get(address)
            .cloned()
            .ok_or_else(|| unreachable("unknown address"))?;
        if !peer.is_online() {
            return Err(unreachable("peer offline"));
        }
        Ok(peer)
    }
}

/// Network client of one node
pub struct LoopbackClient {
    directory: Arc<Directory>,
}

#[async_trait]
impl NetworkClient for LoopbackClient {
    async fn open_client(&self, address: &str) -> Result<Arc<dyn RemoteHandle>, NetworkError> {
        let peer = self.directory.reachable(address)?;
        Ok(peer as Arc<dyn RemoteHandle>)
    }

    async fn get_signatures_for_document(
        &self,
        ctx: &ProcessorContext,
        identity: &dyn IdentityService,
        document: &mut CoreDocument,
    ) -> Result<(), NetworkError> {
        let signers: Vec<CollaboratorId> = document
            .collaborators
            .iter()
            .copied()
            .filter(|c| *c != ctx.self_id)
            .collect();

        for signer in signers {
            let address = identity
                .lookup_identity_for_id(&signer)
                .await
                .and_then(|info| info.current_p2p_key())
                .map_err(|e| NetworkError::SignatureCollection(e.to_string()))?;
            let peer = self.directory.reachable(&address)?;
            let signature = peer.sign(document).await?;
            document.signature_data.signatures.push(signature);
        }
        Ok(())
    }
}

// =============================================================================
// NETWORK
// =============================================================================

/// A node: processor, context and its receiving side
pub struct Node {
    pub id: CollaboratorId,
    pub ctx: ProcessorContext,
    pub processor: NodeProcessor,
    peer: Arc<Peer>,
}

impl Node {
    /// Documents this node accepted, oldest first.
    pub fn received(&self) -> Vec<GenericModel> {
        self.peer.received.lock().clone()
    }

    /// Findings of every document this node refused.
    pub fn rejected(&self) -> Vec<ValidationErrors> {
        self.peer.rejected.lock().clone()
    }

    pub fn set_online(&self, online: bool) {
        self.peer.online.store(online, Ordering::SeqCst);
    }

    /// A fresh invoice shared with `collaborators`, data root calculated.
    pub fn invoice(&self, collaborators: &[&Node], amount: &str) -> GenericModel {
        let ids: Vec<String> = collaborators.iter().map(|n| n.id.to_hex()).collect();
        let mut attributes = BTreeMap::new();
        attributes.insert("invoice.number".to_string(), b"INV-2024-001".to_vec());
        attributes.insert("invoice.amount".to_string(), amount.as_bytes().to_vec());
        attributes.insert("invoice.currency".to_string(), b"EUR".to_vec());
        attributes.insert("invoice.sender".to_string(), self.id.to_hex().into_bytes());

        let cd = CoreDocument::new_with_collaborators(&ids).unwrap();
        let mut model = GenericModel::new(TYPE_URL, attributes, cd);
        model.calculate_data_root().unwrap();
        model
    }

    /// Self-sign, collect signatures, compute the document root and anchor.
    pub async fn anchor(&self, model: &mut GenericModel) -> ProcessorResult<()> {
        self.processor
            .prepare_for_signature_requests(&self.ctx, &mut *model)
            .await?;
        self.processor
            .request_signatures(&self.ctx, &mut *model)
            .await?;
        self.processor
            .prepare_for_anchoring(&self.ctx, &mut *model)
            .await?;
        self.processor.anchor_document(&self.ctx, &*model).await
    }
}

/// Nodes sharing one identity registry and one ledger
pub struct Network {
    pub identity: Arc<KeyringIdentityService>,
    pub ledger: Arc<InMemoryAnchorRepository>,
    directory: Arc<Directory>,
}

impl Network {
    pub fn new() -> Self {
        Self::with_ledger(InMemoryAnchorRepository::new())
    }

    pub fn with_ledger(ledger: InMemoryAnchorRepository) -> Self {
        Self {
            identity: Arc::new(KeyringIdentityService::new()),
            ledger: Arc::new(ledger),
            directory: Arc::new(Directory::default()),
        }
    }

    /// Register a new node and make it reachable.
    pub fn join(&self) -> Node {
        let id = CollaboratorId::random();
        let keys = Arc::new(Ed25519KeyPair::generate());
        let eth_keys = Arc::new(Secp256k1KeyPair::generate());
        let address = format!("loopback/{id}");

        self.identity
            .register(id, address.clone(), *keys.public_key().as_bytes());
        self.ledger.register_caller(id, eth_keys.public_key());

        let peer = Arc::new(Peer {
            id,
            keys: Arc::clone(&keys),
            identity: Arc::clone(&self.identity),
            ledger: Arc::clone(&self.ledger),
            online: AtomicBool::new(true),
            received: Mutex::new(Vec::new()),
            rejected: Mutex::new(Vec::new()),
        });
        self.directory
            .peers
            .write()
            .insert(address, Arc::clone(&peer));

        let client = LoopbackClient {
            directory: Arc::clone(&self.directory),
        };
        let processor = DefaultProcessor::new(
            ProcessorConfig::default(),
            Arc::clone(&self.identity),
            Arc::new(client),
            Arc::clone(&self.ledger),
        );

        Node {
            id,
            ctx: ProcessorContext::new(id, keys, eth_keys),
            processor,
            peer,
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
