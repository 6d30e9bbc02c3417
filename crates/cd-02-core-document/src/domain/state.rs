//! Lifecycle states of a document version, as seen by the local node.

use std::fmt;
use tracing::info;

use super::document::CoreDocument;

/// Where a document version stands in the anchoring lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentState {
    /// Identifiers and salts assigned, nothing signed
    Created,
    /// Signing root computed and self-signed
    SignaturePrepared,
    /// Collaborator signatures collected
    SignaturesCollected,
    /// Document root computed
    ReadyToAnchor,
    /// Document root committed on the ledger
    Anchored,
    /// Sent to every collaborator
    Sent,
}

impl DocumentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentState::Created => "created",
            DocumentState::SignaturePrepared => "signature_prepared",
            DocumentState::SignaturesCollected => "signatures_collected",
            DocumentState::ReadyToAnchor => "ready_to_anchor",
            DocumentState::Anchored => "anchored",
            DocumentState::Sent => "sent",
        }
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex id of a document for log fields.
pub(crate) fn document_id(cd: &CoreDocument) -> String {
    cd.document_identifier
        .map(|id| format!("0x{}", hex::encode(id)))
        .unwrap_or_else(|| "<none>".to_string())
}

pub(crate) fn log_transition(cd: &CoreDocument, state: DocumentState) {
    info!(document_id = %document_id(cd), state = %state, "document state changed");
}
