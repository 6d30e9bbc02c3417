//! Identity Adapter
//!
//! Implements `IdentityService` over an in-memory keyring.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_crypto::verify_ed25519;
use shared_types::{CollaboratorId, PublicKey};
use std::collections::HashMap;
use tracing::debug;

use crate::domain::DocumentSignature;
use crate::ports::outbound::{IdentityError, IdentityService, PeerInfo};

#[derive(Clone, Debug, Default)]
struct RegisteredIdentity {
    p2p_keys: Vec<String>,
    signing_keys: Vec<PublicKey>,
}

/// Identities with their p2p addresses and Ed25519 signing keys.
#[derive(Default)]
pub struct KeyringIdentityService {
    identities: RwLock<HashMap<CollaboratorId, RegisteredIdentity>>,
}

impl KeyringIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id`, or add keys to an existing registration.
    pub fn register(&self, id: CollaboratorId, p2p_key: impl Into<String>, signing_key: PublicKey) {
        let mut identities = self.identities.write();
        let identity = identities.entry(id).or_default();
        identity.p2p_keys.push(p2p_key.into());
        if !identity.signing_keys.contains(&signing_key) {
            identity.signing_keys.push(signing_key);
        }
    }

    /// Make `p2p_key` the current address of `id`.
    pub fn rotate_p2p_key(&self, id: &CollaboratorId, p2p_key: impl Into<String>) -> Result<(), IdentityError> {
        let mut identities = self.identities.write();
        let identity = identities.get_mut(id).ok_or(IdentityError::NotFound(*id))?;
        identity.p2p_keys.push(p2p_key.into());
        Ok(())
    }

    /// Stop accepting signatures made with `signing_key`.
    pub fn revoke_signing_key(&self, id: &CollaboratorId, signing_key: &PublicKey) {
        if let Some(identity) = self.identities.write().get_mut(id) {
            identity.signing_keys.retain(|k| k != signing_key);
        }
    }
}

#[async_trait]
impl IdentityService for KeyringIdentityService {
    async fn lookup_identity_for_id(&self, id: &CollaboratorId) -> Result<PeerInfo, IdentityError> {
        let identities = self.identities.read();
        let identity = identities.get(id).ok_or(IdentityError::NotFound(*id))?;
        Ok(PeerInfo {
            id: *id,
            p2p_keys: identity.p2p_keys.clone(),
        })
    }

    async fn validate_signature(
        &self,
        signature: &DocumentSignature,
        message: &[u8],
    ) -> Result<(), IdentityError> {
        let signer = signature.signer_id;
        let registered = {
            let identities = self.identities.read();
            let identity = identities.get(&signer).ok_or(IdentityError::NotFound(signer))?;
            identity.signing_keys.contains(&signature.public_key)
        };
        if !registered {
            return Err(IdentityError::KeyNotRegistered { signer });
        }

        verify_ed25519(&signature.public_key, message, &signature.signature).map_err(|e| {
            IdentityError::InvalidSignature {
                signer,
                reason: e.to_string(),
            }
        })?;
        debug!(signer = %signer, "signature valid");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::Ed25519KeyPair;

    fn registered() -> (KeyringIdentityService, CollaboratorId, Ed25519KeyPair) {
        let service = KeyringIdentityService::new();
        let id = CollaboratorId::random();
        let keys = Ed25519KeyPair::generate();
        service.register(id, "p2p-1", *keys.public_key().as_bytes());
        (service, id, keys)
    }

    #[tokio::test]
    async fn test_lookup() {
        let (service, id, _) = registered();
        service.rotate_p2p_key(&id, "p2p-2").unwrap();

        let peer = service.lookup_identity_for_id(&id).await.unwrap();
        assert_eq!(peer.current_p2p_key().unwrap(), "p2p-2");

        let unknown = CollaboratorId::random();
        assert_eq!(
            service.lookup_identity_for_id(&unknown).await,
            Err(IdentityError::NotFound(unknown))
        );
    }

    #[tokio::test]
    async fn test_validate_signature() {
        let (service, id, keys) = registered();
        let signature = DocumentSignature::sign(id, &keys, b"signing root");

        assert!(service.validate_signature(&signature, b"signing root").await.is_ok());
        assert!(matches!(
            service.validate_signature(&signature, b"other root").await,
            Err(IdentityError::InvalidSignature { .. })
        ));
    }

    #[tokio::test]
    async fn test_unregistered_key_rejected() {
        let (service, id, keys) = registered();
        let other = Ed25519KeyPair::generate();
        let signature = DocumentSignature::sign(id, &other, b"root");

        assert_eq!(
            service.validate_signature(&signature, b"root").await,
            Err(IdentityError::KeyNotRegistered { signer: id })
        );

        service.revoke_signing_key(&id, keys.public_key().as_bytes());
        let revoked = DocumentSignature::sign(id, &keys, b"root");
        assert_eq!(
            service.validate_signature(&revoked, b"root").await,
            Err(IdentityError::KeyNotRegistered { signer: id })
        );
    }
}
