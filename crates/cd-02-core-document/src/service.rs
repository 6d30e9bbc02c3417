//! Document Processor - lifecycle orchestration
//!
//! Each step follows the same shape:
//!
//! ```text
//! model ──pack──→ core document ──validate──→ mutate copy ──unpack──→ model
//! ```
//!
//! The model is only written back when every part of the step succeeded, so
//! a failing step leaves the model as it was.

use async_trait::async_trait;
use shared_types::CollaboratorId;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::context::ProcessorContext;
use crate::domain::state::{document_id, log_transition};
use crate::domain::{CoreDocument, DocumentSignature, DocumentState, Model};
use crate::error::{ProcessorError, ProcessorResult, SendFailure};
use crate::ports::inbound::DocumentProcessor;
use crate::ports::outbound::{
    commit_hash, AnchorDocumentRequest, AnchorId, AnchorRepository, CentrifugeHeader,
    DocumentRoot, IdentityService, NetworkClient, NetworkError,
};
use crate::validators::{
    post_anchored_validator, post_signature_request_validator, pre_anchor_validator,
    pre_signature_request_validator, Validator,
};

/// Processor configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Version string sent in every header
    pub node_version: String,
    /// Network the node participates in
    pub network_id: u32,
    /// How long to wait for an anchor confirmation when the context has no deadline
    pub anchor_confirmation_timeout: Duration,
    /// Upper bound for a single network call when the context has no deadline
    pub network_timeout: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            node_version: env!("CARGO_PKG_VERSION").to_string(),
            network_id: 0,
            anchor_confirmation_timeout: Duration::from_secs(600),
            network_timeout: Duration::from_secs(30),
        }
    }
}

impl ProcessorConfig {
    /// Defaults overridden by `CD_NODE_VERSION`, `CD_NETWORK_ID`,
    /// `CD_ANCHOR_TIMEOUT_SECS` and `CD_NETWORK_TIMEOUT_SECS`.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(version) = std::env::var("CD_NODE_VERSION") {
            config.node_version = version;
        }
        if let Some(id) = parse_env("CD_NETWORK_ID") {
            config.network_id = id;
        }
        if let Some(secs) = parse_env("CD_ANCHOR_TIMEOUT_SECS") {
            config.anchor_confirmation_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env("CD_NETWORK_TIMEOUT_SECS") {
            config.network_timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value = %value, "ignoring unparseable setting");
            None
        }
    }
}

/// Run a network call, failing with `Timeout` at `deadline`.
async fn within<T, F>(deadline: Instant, operation: &'static str, call: F) -> Result<T, NetworkError>
where
    F: Future<Output = Result<T, NetworkError>>,
{
    timeout_at(deadline, call)
        .await
        .unwrap_or(Err(NetworkError::Timeout { operation }))
}

/// The document processor
pub struct DefaultProcessor<I, N, A>
where
    I: IdentityService,
    N: NetworkClient,
    A: AnchorRepository,
{
    config: ProcessorConfig,
    identity: Arc<I>,
    network: Arc<N>,
    anchors: Arc<A>,
}

impl<I, N, A> DefaultProcessor<I, N, A>
where
    I: IdentityService,
    N: NetworkClient,
    A: AnchorRepository,
{
    pub fn new(config: ProcessorConfig, identity: Arc<I>, network: Arc<N>, anchors: Arc<A>) -> Self {
        Self {
            config,
            identity,
            network,
            anchors,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn header(&self, ctx: &ProcessorContext) -> CentrifugeHeader {
        CentrifugeHeader {
            sender_id: ctx.self_id,
            node_version: self.config.node_version.clone(),
            network_id: self.config.network_id,
        }
    }
}

#[async_trait]
impl<I, N, A> DocumentProcessor for DefaultProcessor<I, N, A>
where
    I: IdentityService + 'static,
    N: NetworkClient + 'static,
    A: AnchorRepository + 'static,
{
    async fn send(
        &self,
        ctx: &ProcessorContext,
        document: &CoreDocument,
        recipient: CollaboratorId,
    ) -> ProcessorResult<()> {
        if document.document_identifier.is_none() {
            return Err(ProcessorError::NilDocument);
        }

        let peer = self
            .identity
            .lookup_identity_for_id(&recipient)
            .await
            .map_err(|source| ProcessorError::IdentityLookup { recipient, source })?;
        let address = peer
            .current_p2p_key()
            .map_err(|source| ProcessorError::IdentityLookup { recipient, source })?;

        let deadline = ctx.deadline_or(self.config.network_timeout);
        let client = within(deadline, "open client", self.network.open_client(&address))
            .await
            .map_err(|source| ProcessorError::OpenClient { recipient, source })?;

        let request = AnchorDocumentRequest {
            header: self.header(ctx),
            document: document.clone(),
        };
        let response = within(
            deadline,
            "send anchored document",
            client.send_anchored_document(request),
        )
        .await
        .map_err(|source| ProcessorError::SendDocument { recipient, source })?;

        if !response.accepted {
            return Err(ProcessorError::NotAccepted { recipient });
        }
        debug!(document_id = %document_id(document), recipient = %recipient, "document delivered");
        Ok(())
    }

    async fn prepare_for_signature_requests(
        &self,
        ctx: &ProcessorContext,
        model: &mut dyn Model,
    ) -> ProcessorResult<()> {
        let mut cd = model.pack_core_document().map_err(ProcessorError::Pack)?;
        let signing_root = cd
            .calculate_signing_root()
            .map_err(ProcessorError::SigningRoot)?;
        cd.signature_data.signatures.push(DocumentSignature::sign(
            ctx.self_id,
            &ctx.signing_keys,
            &signing_root,
        ));

        model.unpack_core_document(cd.clone()).map_err(ProcessorError::Unpack)?;
        log_transition(&cd, DocumentState::SignaturePrepared);
        Ok(())
    }

    async fn request_signatures(
        &self,
        ctx: &ProcessorContext,
        model: &mut dyn Model,
    ) -> ProcessorResult<()> {
        let mut cd = model.pack_core_document().map_err(ProcessorError::Pack)?;
        pre_signature_request_validator(ctx.self_id, Arc::clone(&ctx.signing_keys))
            .validate(None, Some(&*model))
            .await
            .map_err(ProcessorError::PreSignatureValidation)?;

        let deadline = ctx.deadline_or(self.config.network_timeout);
        within(
            deadline,
            "signature collection",
            self.network
                .get_signatures_for_document(ctx, self.identity.as_ref(), &mut cd),
        )
        .await
        .map_err(ProcessorError::SignatureCollection)?;

        let collected = cd.signatures().len();
        model.unpack_core_document(cd.clone()).map_err(ProcessorError::Unpack)?;
        debug!(document_id = %document_id(&cd), signatures = collected, "signatures collected");
        log_transition(&cd, DocumentState::SignaturesCollected);
        Ok(())
    }

    async fn prepare_for_anchoring(
        &self,
        _ctx: &ProcessorContext,
        model: &mut dyn Model,
    ) -> ProcessorResult<()> {
        let mut cd = model.pack_core_document().map_err(ProcessorError::Pack)?;
        post_signature_request_validator(Arc::clone(&self.identity))
            .validate(None, Some(&*model))
            .await
            .map_err(ProcessorError::SignatureValidation)?;

        cd.calculate_document_root()
            .map_err(ProcessorError::DocumentRoot)?;

        model.unpack_core_document(cd.clone()).map_err(ProcessorError::Unpack)?;
        log_transition(&cd, DocumentState::ReadyToAnchor);
        Ok(())
    }

    async fn anchor_document(&self, ctx: &ProcessorContext, model: &dyn Model) -> ProcessorResult<()> {
        let cd = model.pack_core_document().map_err(ProcessorError::Pack)?;
        pre_anchor_validator(Arc::clone(&self.identity))
            .validate(None, Some(model))
            .await
            .map_err(ProcessorError::PreAnchorValidation)?;

        let anchor_id = AnchorId::for_document(&cd).map_err(ProcessorError::AnchorData)?;
        let root = DocumentRoot::for_document(&cd).map_err(ProcessorError::AnchorData)?;

        self.identity
            .lookup_identity_for_id(&ctx.self_id)
            .await
            .map_err(ProcessorError::SelfIdentity)?;

        let mac = ctx
            .eth_auth_keys
            .sign(&commit_hash(&anchor_id, &ctx.self_id, &root))
            .to_vec();
        let proofs = cd
            .signing_root_proof_hashes()
            .map_err(ProcessorError::DocumentRoot)?;

        let confirmation = self
            .anchors
            .commit_anchor(anchor_id, root, ctx.self_id, proofs, mac)
            .await
            .map_err(ProcessorError::CommitAnchor)?;
        info!(document_id = %document_id(&cd), anchor_id = %anchor_id, "anchor committed, awaiting confirmation");

        let deadline = ctx.deadline_or(self.config.anchor_confirmation_timeout);
        confirmation
            .wait_until(deadline)
            .await
            .map_err(ProcessorError::AnchorConfirmation)?;

        log_transition(&cd, DocumentState::Anchored);
        Ok(())
    }

    async fn send_document(&self, ctx: &ProcessorContext, model: &dyn Model) -> ProcessorResult<()> {
        let cd = model.pack_core_document().map_err(ProcessorError::Pack)?;
        post_anchored_validator(Arc::clone(&self.anchors))
            .validate(None, Some(model))
            .await
            .map_err(ProcessorError::PostAnchorValidation)?;

        let mut recipients: Vec<CollaboratorId> = Vec::with_capacity(cd.collaborators.len());
        for c in &cd.collaborators {
            if *c != ctx.self_id && !recipients.contains(c) {
                recipients.push(*c);
            }
        }

        let total = recipients.len();
        let mut failures = Vec::new();
        for recipient in recipients {
            if let Err(error) = self.send(ctx, &cd, recipient).await {
                warn!(
                    document_id = %document_id(&cd),
                    recipient = %recipient,
                    error = %error,
                    "failed to send document"
                );
                failures.push(SendFailure { recipient, error });
            }
        }

        if !failures.is_empty() {
            return Err(ProcessorError::PartialSend { total, failures });
        }
        log_transition(&cd, DocumentState::Sent);
        Ok(())
    }
}
