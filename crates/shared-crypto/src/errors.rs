//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Signature does not verify against the key and message.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Public key bytes are not a valid curve point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Secret key bytes are out of range for the curve.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature bytes cannot be decoded.
    #[error("Invalid signature")]
    InvalidSignature,
}
