//! The document root we hold is the one committed on the ledger.

use async_trait::async_trait;
use std::sync::Arc;

use super::roots::DOCUMENT_ROOT_KEY;
use super::{get_core_document, Validator};
use crate::domain::Model;
use crate::error::ValidationErrors;
use crate::ports::outbound::{AnchorId, AnchorRepository, DocumentRoot};

pub const ANCHOR_ID_KEY: &str = "cd_anchor_id";
pub const ANCHOR_KEY: &str = "anchor";

pub struct AnchoredValidator<A: AnchorRepository> {
    repository: Arc<A>,
}

impl<A: AnchorRepository> AnchoredValidator<A> {
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<A: AnchorRepository + 'static> Validator for AnchoredValidator<A> {
    async fn validate(
        &self,
        _old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let cd = get_core_document(new)?;
        let anchor_id = AnchorId::for_document(&cd).map_err(|e| {
            ValidationErrors::single(ANCHOR_ID_KEY, format!("failed to get anchorID: {e}"))
        })?;
        let root = DocumentRoot::for_document(&cd).map_err(|e| {
            ValidationErrors::single(DOCUMENT_ROOT_KEY, format!("failed to get document root: {e}"))
        })?;
        let anchored = self
            .repository
            .get_document_root_of(&anchor_id)
            .await
            .map_err(|e| {
                ValidationErrors::single(
                    ANCHOR_KEY,
                    format!("failed to get document root from chain: {e}"),
                )
            })?;
        if anchored != root {
            return Err(ValidationErrors::single(ANCHOR_KEY, "mismatched document roots"));
        }
        Ok(())
    }
}
