//! Per-call context of the processor: who we are, which keys we sign with
//! and how long the caller is willing to wait.

use shared_crypto::{Ed25519KeyPair, Secp256k1KeyPair};
use shared_types::CollaboratorId;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Stand-in for "no deadline" when a timeout does not fit into an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `timeout` from now, or [`FAR_FUTURE`] from now when that overflows.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Identity, keys and deadline for one processor call
#[derive(Clone)]
pub struct ProcessorContext {
    /// Identity of the local node
    pub self_id: CollaboratorId,
    /// Document signing keys
    pub signing_keys: Arc<Ed25519KeyPair>,
    /// Ledger authentication keys, used for anchor commits
    pub eth_auth_keys: Arc<Secp256k1KeyPair>,
    /// Hard deadline for network calls and anchor confirmation
    pub deadline: Option<Instant>,
}

impl ProcessorContext {
    pub fn new(
        self_id: CollaboratorId,
        signing_keys: Arc<Ed25519KeyPair>,
        eth_auth_keys: Arc<Secp256k1KeyPair>,
    ) -> Self {
        Self {
            self_id,
            signing_keys,
            eth_auth_keys,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(deadline_after(timeout))
    }

    /// The context deadline, or `fallback` from now when none is set.
    pub fn deadline_or(&self, fallback: Duration) -> Instant {
        self.deadline.unwrap_or_else(|| deadline_after(fallback))
    }
}

impl fmt::Debug for ProcessorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorContext")
            .field("self_id", &self.self_id)
            .field("signing_key", &self.signing_keys.public_key())
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
