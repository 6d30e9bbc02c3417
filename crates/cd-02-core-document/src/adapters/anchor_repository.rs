//! Anchor Repository Adapter
//!
//! Implements `AnchorRepository` as an in-memory ledger.
//!
//! A commit is accepted immediately and confirmed by a background task after
//! the configured delay; only then does the root become readable through
//! `get_document_root_of`.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_crypto::{Secp256k1PublicKey, Secp256k1Signature};
use shared_types::{CollaboratorId, Hash};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ports::outbound::{
    commit_hash, confirmation_channel, AnchorConfirmation, AnchorError, AnchorId,
    AnchorRepository, ConfirmationSender, DocumentRoot,
};

/// A confirmed anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorRecord {
    pub document_root: DocumentRoot,
    pub caller: CollaboratorId,
    pub proofs: Vec<Hash>,
}

#[derive(Default)]
struct Ledger {
    anchored: HashMap<AnchorId, AnchorRecord>,
    /// Committed, not yet confirmed
    pending: HashSet<AnchorId>,
}

/// In-memory ledger for tests and single-node setups.
pub struct InMemoryAnchorRepository {
    ledger: Arc<RwLock<Ledger>>,
    /// Caller -> key the commit MAC must verify against
    callers: RwLock<HashMap<CollaboratorId, Secp256k1PublicKey>>,
    confirmation_delay: Duration,
    auto_confirm: bool,
    /// Senders of commits that are never confirmed, kept so waiters time out
    /// instead of seeing a dropped channel. Grows by one per commit for the
    /// lifetime of the repository; only meant for timeout tests.
    held: Mutex<Vec<ConfirmationSender>>,
}

impl InMemoryAnchorRepository {
    /// Ledger confirming every commit right away.
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(RwLock::new(Ledger::default())),
            callers: RwLock::new(HashMap::new()),
            confirmation_delay: Duration::ZERO,
            auto_confirm: true,
            held: Mutex::new(Vec::new()),
        }
    }

    /// Confirm commits after `delay`.
    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = delay;
        self
    }

    /// Accept commits but never confirm them.
    ///
    /// Test double for confirmation timeouts: every commit's sender is
    /// retained until the repository is dropped.
    pub fn never_confirming(mut self) -> Self {
        self.auto_confirm = false;
        self
    }

    /// Allow `caller` to commit with MACs made by `key`.
    pub fn register_caller(&self, caller: CollaboratorId, key: Secp256k1PublicKey) {
        self.callers.write().insert(caller, key);
    }

    /// Store a confirmed anchor directly.
    pub fn insert_anchor(&self, anchor_id: AnchorId, document_root: DocumentRoot) {
        self.ledger.write().anchored.insert(
            anchor_id,
            AnchorRecord {
                document_root,
                caller: CollaboratorId::default(),
                proofs: Vec::new(),
            },
        );
    }

    pub fn anchor_record(&self, anchor_id: &AnchorId) -> Option<AnchorRecord> {
        self.ledger.read().anchored.get(anchor_id).cloned()
    }

    pub fn anchored_count(&self) -> usize {
        self.ledger.read().anchored.len()
    }

    fn verify_mac(
        &self,
        anchor_id: &AnchorId,
        document_root: &DocumentRoot,
        caller: &CollaboratorId,
        mac: &[u8],
    ) -> Result<(), AnchorError> {
        let key = self
            .callers
            .read()
            .get(caller)
            .copied()
            .ok_or_else(|| AnchorError::CommitRejected(format!("caller {caller} not registered")))?;
        let bytes: [u8; 64] = mac
            .try_into()
            .map_err(|_| AnchorError::CommitRejected(format!("malformed mac of {} bytes", mac.len())))?;
        key.verify(
            &commit_hash(anchor_id, caller, document_root),
            &Secp256k1Signature::from_bytes(bytes),
        )
        .map_err(|e| AnchorError::CommitRejected(format!("invalid mac: {e}")))
    }
}

impl Default for InMemoryAnchorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnchorRepository for InMemoryAnchorRepository {
    async fn commit_anchor(
        &self,
        anchor_id: AnchorId,
        document_root: DocumentRoot,
        caller: CollaboratorId,
        proofs: Vec<Hash>,
        mac: Vec<u8>,
    ) -> Result<AnchorConfirmation, AnchorError> {
        self.verify_mac(&anchor_id, &document_root, &caller, &mac)?;

        {
            let mut ledger = self.ledger.write();
            if ledger.anchored.contains_key(&anchor_id) || ledger.pending.contains(&anchor_id) {
                warn!(anchor_id = %anchor_id, "commit for existing anchor refused");
                return Err(AnchorError::AlreadyAnchored(anchor_id));
            }
            ledger.pending.insert(anchor_id);
        }
        info!(anchor_id = %anchor_id, caller = %caller, "anchor committed");

        let (sender, confirmation) = confirmation_channel();
        if !self.auto_confirm {
            self.held.lock().push(sender);
            return Ok(confirmation);
        }

        let ledger = Arc::clone(&self.ledger);
        let delay = self.confirmation_delay;
        let record = AnchorRecord {
            document_root,
            caller,
            proofs,
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut ledger = ledger.write();
                ledger.pending.remove(&anchor_id);
                ledger.anchored.insert(anchor_id, record);
            }
            if !sender.confirm() {
                debug!(anchor_id = %anchor_id, "anchor confirmed after the caller stopped waiting");
            }
        });
        Ok(confirmation)
    }

    async fn get_document_root_of(&self, anchor_id: &AnchorId) -> Result<DocumentRoot, AnchorError> {
        self.ledger
            .read()
            .anchored
            .get(anchor_id)
            .map(|record| record.document_root)
            .ok_or(AnchorError::NotFound(*anchor_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::Secp256k1KeyPair;
    use tokio::time::Instant;

    struct Fixture {
        repository: InMemoryAnchorRepository,
        caller: CollaboratorId,
        keys: Secp256k1KeyPair,
    }

    fn fixture(repository: InMemoryAnchorRepository) -> Fixture {
        let caller = CollaboratorId::random();
        let keys = Secp256k1KeyPair::generate();
        repository.register_caller(caller, keys.public_key());
        Fixture {
            repository,
            caller,
            keys,
        }
    }

    impl Fixture {
        async fn commit(&self, id: AnchorId, root: DocumentRoot) -> Result<AnchorConfirmation, AnchorError> {
            let mac = self.keys.sign(&commit_hash(&id, &self.caller, &root)).to_vec();
            self.repository
                .commit_anchor(id, root, self.caller, vec![[5u8; 32]], mac)
                .await
        }
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[tokio::test]
    async fn test_commit_then_read() {
        let f = fixture(InMemoryAnchorRepository::new());
        let id = AnchorId([1u8; 32]);
        let root = DocumentRoot([2u8; 32]);

        f.commit(id, root).await.unwrap().wait_until(deadline()).await.unwrap();

        assert_eq!(f.repository.get_document_root_of(&id).await, Ok(root));
        let record = f.repository.anchor_record(&id).unwrap();
        assert_eq!(record.caller, f.caller);
        assert_eq!(record.proofs, vec![[5u8; 32]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_root_hidden_until_confirmed() {
        let f = fixture(InMemoryAnchorRepository::new().with_confirmation_delay(Duration::from_secs(3)));
        let id = AnchorId([1u8; 32]);
        let confirmation = f.commit(id, DocumentRoot([2u8; 32])).await.unwrap();

        assert_eq!(
            f.repository.get_document_root_of(&id).await,
            Err(AnchorError::NotFound(id))
        );
        confirmation.wait_until(deadline()).await.unwrap();
        assert!(f.repository.get_document_root_of(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_commit_refused() {
        let f = fixture(InMemoryAnchorRepository::new());
        let id = AnchorId([1u8; 32]);
        f.commit(id, DocumentRoot([2u8; 32])).await.unwrap();

        assert_eq!(
            f.commit(id, DocumentRoot([3u8; 32])).await.unwrap_err(),
            AnchorError::AlreadyAnchored(id)
        );
    }

    #[tokio::test]
    async fn test_bad_mac_rejected() {
        let f = fixture(InMemoryAnchorRepository::new());
        let id = AnchorId([1u8; 32]);
        let root = DocumentRoot([2u8; 32]);
        let mac = f.keys.sign(b"something else").to_vec();

        let err = f
            .repository
            .commit_anchor(id, root, f.caller, Vec::new(), mac)
            .await
            .unwrap_err();
        assert!(matches!(err, AnchorError::CommitRejected(_)));
        assert_eq!(f.repository.anchored_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_caller_rejected() {
        let repository = InMemoryAnchorRepository::new();
        let err = repository
            .commit_anchor(
                AnchorId([1u8; 32]),
                DocumentRoot([2u8; 32]),
                CollaboratorId::random(),
                Vec::new(),
                vec![0u8; 64],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AnchorError::CommitRejected(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_confirming_times_out() {
        let f = fixture(InMemoryAnchorRepository::new().never_confirming());
        let confirmation = f.commit(AnchorId([1u8; 32]), DocumentRoot([2u8; 32])).await.unwrap();

        let deadline = Instant::now() + Duration::from_millis(100);
        assert_eq!(
            confirmation.wait_until(deadline).await,
            Err(AnchorError::ConfirmationTimeout)
        );
    }
}
