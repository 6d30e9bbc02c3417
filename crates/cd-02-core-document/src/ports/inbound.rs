//! Driving Ports (API - Inbound)
//!
//! The lifecycle operations a document service calls, in order:
//! prepare_for_signature_requests, request_signatures,
//! prepare_for_anchoring, anchor_document, send_document.

use async_trait::async_trait;
use shared_types::CollaboratorId;

use crate::context::ProcessorContext;
use crate::domain::{CoreDocument, Model};
use crate::error::ProcessorResult;

/// Drives a document version from signing to distribution
///
/// Steps that mutate the document leave the model untouched when they fail.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    /// Deliver an anchored document to one collaborator.
    async fn send(
        &self,
        ctx: &ProcessorContext,
        document: &CoreDocument,
        recipient: CollaboratorId,
    ) -> ProcessorResult<()>;

    /// Compute the signing root and add our own signature.
    async fn prepare_for_signature_requests(
        &self,
        ctx: &ProcessorContext,
        model: &mut dyn Model,
    ) -> ProcessorResult<()>;

    /// Collect the collaborators' signatures.
    async fn request_signatures(
        &self,
        ctx: &ProcessorContext,
        model: &mut dyn Model,
    ) -> ProcessorResult<()>;

    /// Verify the signatures and compute the document root.
    async fn prepare_for_anchoring(
        &self,
        ctx: &ProcessorContext,
        model: &mut dyn Model,
    ) -> ProcessorResult<()>;

    /// Commit the document root to the ledger and wait for confirmation.
    async fn anchor_document(&self, ctx: &ProcessorContext, model: &dyn Model)
        -> ProcessorResult<()>;

    /// Send the anchored document to every other collaborator.
    async fn send_document(&self, ctx: &ProcessorContext, model: &dyn Model) -> ProcessorResult<()>;
}
