//! # cd-02-core-document
//!
//! The CoreDocument protocol: a versioned document envelope, its layered
//! Merkle roots, the validator chain guarding every lifecycle step and the
//! processor that drives a document from signing to anchoring.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **CoreDocument**: identifiers, version chain, collaborators and read rules
//! - **Layered roots**: data root and core-document root fold into the signing
//!   root, which together with the signatures root forms the document root
//! - **Validators**: composable checks with keyed, aggregated errors
//! - **Processor**: self-sign, collect signatures, anchor, distribute
//!
//! ## Roots
//!
//! ```text
//!                    document_root
//!                   /             \
//!           signing_root     signatures_data_root
//!           /          \
//!     data_root       cd_root
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! [Created] ──prepare_for_signature_requests──→ [SignaturePrepared]
//!     ──request_signatures──→ [SignaturesCollected]
//!     ──prepare_for_anchoring──→ [ReadyToAnchor]
//!     ──anchor_document──→ [Anchored]
//!     ──send_document──→ [Sent]
//! ```
//!
//! Every step packs the model into a core document, validates it, mutates a
//! copy and unpacks the copy into the model only when the step succeeded.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cd_02_core_document::{CoreDocument, DefaultProcessor, GenericModel, ProcessorConfig};
//!
//! let processor = DefaultProcessor::new(ProcessorConfig::default(), identity, network, anchors);
//! let mut model = GenericModel::new("invoice", attributes, CoreDocument::new_with_collaborators(&[peer])?);
//! model.calculate_data_root()?;
//!
//! processor.prepare_for_signature_requests(&ctx, &mut model).await?;
//! processor.request_signatures(&ctx, &mut model).await?;
//! processor.prepare_for_anchoring(&ctx, &mut model).await?;
//! processor.anchor_document(&ctx, &model).await?;
//! processor.send_document(&ctx, &model).await?;
//! ```

pub mod adapters;
pub mod context;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validators;

pub use adapters::{InMemoryAnchorRepository, KeyringIdentityService};
pub use context::ProcessorContext;
pub use domain::{
    AccessToken, Action, CoreDocument, DocumentSignature, DocumentState, EmbeddedData,
    GenericModel, Model, ReadRule, Role, SignatureData,
};
pub use error::{
    DocumentError, DocumentResult, FieldError, ProcessorError, ProcessorResult, SendFailure,
    ValidationErrors,
};
pub use ports::inbound::DocumentProcessor;
pub use ports::outbound::{
    commit_hash, confirmation_channel, AnchorConfirmation, AnchorDocumentRequest,
    AnchorDocumentResponse, AnchorError, AnchorId, AnchorRepository, CentrifugeHeader,
    ConfirmationSender, DocumentRoot, IdentityError, IdentityService, NetworkClient, NetworkError,
    PeerInfo, RemoteHandle,
};
pub use service::{DefaultProcessor, ProcessorConfig};
pub use validators::{
    post_anchored_validator, post_signature_request_validator, pre_anchor_validator,
    pre_signature_request_validator, Validator, ValidatorGroup,
};
