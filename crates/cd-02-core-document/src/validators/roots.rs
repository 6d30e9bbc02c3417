//! Recompute stored roots and compare.

use async_trait::async_trait;

use super::{get_core_document, Validator};
use crate::domain::Model;
use crate::error::ValidationErrors;

pub const SIGNING_ROOT_KEY: &str = "cd_signing_root";
pub const DOCUMENT_ROOT_KEY: &str = "cd_document_root";

/// The stored signing root matches the document's content
#[derive(Debug, Default, Clone, Copy)]
pub struct SigningRootValidator;

#[async_trait]
impl Validator for SigningRootValidator {
    async fn validate(
        &self,
        _old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let cd = get_core_document(new)?;
        let stored = cd
            .signing_root
            .ok_or_else(|| ValidationErrors::single(SIGNING_ROOT_KEY, "signing root missing"))?;
        let computed = cd.compute_signing_root().map_err(|e| {
            ValidationErrors::single(SIGNING_ROOT_KEY, format!("failed to calculate signing root: {e}"))
        })?;
        if computed != stored {
            return Err(ValidationErrors::single(SIGNING_ROOT_KEY, "signing root mismatch"));
        }
        Ok(())
    }
}

/// The stored document root matches signing root and signatures
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentRootValidator;

#[async_trait]
impl Validator for DocumentRootValidator {
    async fn validate(
        &self,
        _old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let cd = get_core_document(new)?;
        let stored = cd
            .document_root
            .ok_or_else(|| ValidationErrors::single(DOCUMENT_ROOT_KEY, "document root missing"))?;
        let computed = cd.compute_document_root().map_err(|e| {
            ValidationErrors::single(DOCUMENT_ROOT_KEY, format!("failed to calculate document root: {e}"))
        })?;
        if computed != stored {
            return Err(ValidationErrors::single(DOCUMENT_ROOT_KEY, "document root mismatch"));
        }
        Ok(())
    }
}
