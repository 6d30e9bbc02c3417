//! Validator pipelines for each lifecycle step.
//!
//! | Pipeline | Members |
//! |----------|---------|
//! | pre signature request | base, signing root, ready for signatures |
//! | post signature request | base, signing root, signatures |
//! | pre anchor | post signature request, document root |
//! | post anchored | document root, anchored |

use shared_crypto::Ed25519KeyPair;
use shared_types::CollaboratorId;
use std::sync::Arc;

use super::{
    AnchoredValidator, BaseValidator, DocumentRootValidator, ReadyForSignaturesValidator,
    SignaturesValidator, SigningRootValidator, ValidatorGroup,
};
use crate::ports::outbound::{AnchorRepository, IdentityService};

/// Before asking collaborators to sign: the document is sound and carries
/// only our own signature over the current signing root.
pub fn pre_signature_request_validator(
    self_id: CollaboratorId,
    keys: Arc<Ed25519KeyPair>,
) -> ValidatorGroup {
    ValidatorGroup::new(vec![
        Box::new(BaseValidator),
        Box::new(SigningRootValidator),
        Box::new(ReadyForSignaturesValidator::new(self_id, keys)),
    ])
}

/// After collecting signatures: every signature checks out.
pub fn post_signature_request_validator<I>(identity: Arc<I>) -> ValidatorGroup
where
    I: IdentityService + 'static,
{
    ValidatorGroup::new(vec![
        Box::new(BaseValidator),
        Box::new(SigningRootValidator),
        Box::new(SignaturesValidator::new(identity)),
    ])
}

/// Before committing: signatures check out and the document root is current.
pub fn pre_anchor_validator<I>(identity: Arc<I>) -> ValidatorGroup
where
    I: IdentityService + 'static,
{
    ValidatorGroup::new(vec![
        Box::new(post_signature_request_validator(identity)),
        Box::new(DocumentRootValidator),
    ])
}

/// Before distributing: our document root is the anchored one.
pub fn post_anchored_validator<A>(repository: Arc<A>) -> ValidatorGroup
where
    A: AnchorRepository + 'static,
{
    ValidatorGroup::new(vec![
        Box::new(DocumentRootValidator),
        Box::new(AnchoredValidator::new(repository)),
    ])
}
