//! Signature checks before and after collecting collaborator signatures.

use async_trait::async_trait;
use shared_crypto::Ed25519KeyPair;
use shared_types::CollaboratorId;
use std::sync::Arc;

use super::roots::SIGNING_ROOT_KEY;
use super::{get_core_document, Validator};
use crate::domain::{DocumentSignature, Model};
use crate::error::ValidationErrors;
use crate::ports::outbound::IdentityService;

pub const SIGNATURES_KEY: &str = "cd_signatures";
pub const SIGNATURE_KEY: &str = "cd_signature";

/// Exactly one signature, and it is ours over the current signing root
pub struct ReadyForSignaturesValidator {
    self_id: CollaboratorId,
    keys: Arc<Ed25519KeyPair>,
}

impl ReadyForSignaturesValidator {
    pub fn new(self_id: CollaboratorId, keys: Arc<Ed25519KeyPair>) -> Self {
        Self { self_id, keys }
    }
}

#[async_trait]
impl Validator for ReadyForSignaturesValidator {
    async fn validate(
        &self,
        _old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let cd = get_core_document(new)?;
        let [actual] = cd.signatures() else {
            return Err(ValidationErrors::single(
                SIGNATURES_KEY,
                "expecting only one signature",
            ));
        };
        let signing_root = cd
            .signing_root
            .ok_or_else(|| ValidationErrors::single(SIGNING_ROOT_KEY, "signing root missing"))?;

        let expected = DocumentSignature::sign(self.self_id, &self.keys, &signing_root);
        let mut errors = ValidationErrors::new();
        if actual.signer_id != expected.signer_id {
            errors.push(SIGNATURE_KEY, "entity ID mismatch");
        }
        if actual.public_key != expected.public_key {
            errors.push(SIGNATURE_KEY, "public key mismatch");
        }
        if actual.signature != expected.signature {
            errors.push(SIGNATURE_KEY, "signature mismatch");
        }
        errors.into_result()
    }
}

/// At least one signature, every one valid for a registered key
pub struct SignaturesValidator<I: IdentityService> {
    identity: Arc<I>,
}

impl<I: IdentityService> SignaturesValidator<I> {
    pub fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl<I: IdentityService + 'static> Validator for SignaturesValidator<I> {
    async fn validate(
        &self,
        _old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let cd = get_core_document(new)?;
        if cd.signatures().is_empty() {
            return Err(ValidationErrors::single(
                SIGNATURES_KEY,
                "atleast one signature expected",
            ));
        }
        let signing_root = cd
            .signing_root
            .ok_or_else(|| ValidationErrors::single(SIGNING_ROOT_KEY, "signing root missing"))?;

        let mut errors = ValidationErrors::new();
        for (index, signature) in cd.signatures().iter().enumerate() {
            if let Err(e) = self.identity.validate_signature(signature, &signing_root).await {
                errors.push(
                    format!("signature_{index}"),
                    format!("signature verification failed: {e}"),
                );
            }
        }
        errors.into_result()
    }
}
