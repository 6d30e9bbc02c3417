//! # Validators
//!
//! Every lifecycle step is guarded by a validator pipeline. A validator
//! inspects the old and/or new version of a model and reports keyed
//! findings; a [`ValidatorGroup`] runs all of its members and reports the
//! union of their findings, so one pass surfaces every problem.

pub mod anchored;
pub mod base;
pub mod pipelines;
pub mod roots;
pub mod signatures;
pub mod version;

use async_trait::async_trait;

use crate::domain::{CoreDocument, Model};
use crate::error::ValidationErrors;

pub use anchored::AnchoredValidator;
pub use base::BaseValidator;
pub use pipelines::{
    post_anchored_validator, post_signature_request_validator, pre_anchor_validator,
    pre_signature_request_validator,
};
pub use roots::{DocumentRootValidator, SigningRootValidator};
pub use signatures::{ReadyForSignaturesValidator, SignaturesValidator};
pub use version::UpdateVersionValidator;

/// Key used when a model cannot be packed at all
pub const MODEL_KEY: &str = "cd_model";

/// A check over an old and a new version of a model
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(
        &self,
        old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors>;
}

/// Runs every member and aggregates all findings
#[derive(Default)]
pub struct ValidatorGroup {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorGroup {
    pub fn new(validators: Vec<Box<dyn Validator>>) -> Self {
        Self { validators }
    }

    pub fn push(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[async_trait]
impl Validator for ValidatorGroup {
    async fn validate(
        &self,
        old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for validator in &self.validators {
            if let Err(found) = validator.validate(old, new).await {
                errors.extend(found);
            }
        }
        errors.into_result()
    }
}

/// Pack `model`, reporting a missing model or pack failure under `key`.
pub(crate) fn pack_keyed(model: Option<&dyn Model>, key: &str) -> Result<CoreDocument, ValidationErrors> {
    let model = model.ok_or_else(|| ValidationErrors::single(key, "nil model"))?;
    model
        .pack_core_document()
        .map_err(|e| ValidationErrors::single(key, format!("failed to get core document: {e}")))
}

/// Pack the model under validation.
pub fn get_core_document(model: Option<&dyn Model>) -> Result<CoreDocument, ValidationErrors> {
    pack_keyed(model, MODEL_KEY)
}
