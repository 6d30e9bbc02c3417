//! # Version Chain
//!
//! ```text
//! v1: id=A  previous=-   current=A  next=B  root=R1
//! v2: id=A  previous=A   current=B  next=C  previous_root=R1
//! v3: id=A  previous=B   current=C  next=D  previous_root=R2
//! ```
//!
//! The identifier of the next version is fixed when the current one is
//! created, so every anchored version commits to its successor's id.

use shared_types::{random_hash, CollaboratorId};

use super::document::CoreDocument;
use super::state::{log_transition, DocumentState};
use crate::error::{DocumentError, DocumentResult};

/// Decode collaborator ids, dropping repeats and keeping first-seen order.
pub fn parse_collaborators<S: AsRef<str>>(ids: &[S]) -> DocumentResult<Vec<CollaboratorId>> {
    let mut parsed: Vec<CollaboratorId> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = CollaboratorId::from_hex(id.as_ref())?;
        if !parsed.contains(&id) {
            parsed.push(id);
        }
    }
    Ok(parsed)
}

impl CoreDocument {
    /// A first version with fresh identifiers.
    ///
    /// `current_version` equals `document_identifier`; `next_version` is a
    /// new random id.
    pub fn new() -> Self {
        let identifier = random_hash();
        Self {
            document_identifier: Some(identifier),
            current_version: Some(identifier),
            next_version: Some(random_hash()),
            ..Self::default()
        }
    }

    /// A first version shared with `collaborators` (hex ids).
    ///
    /// Creates the read-and-sign rule for them and salts every field.
    pub fn new_with_collaborators<S: AsRef<str>>(collaborators: &[S]) -> DocumentResult<Self> {
        let collaborators = parse_collaborators(collaborators)?;
        let mut cd = Self::new();
        cd.init_read_rules(&collaborators)?;
        cd.collaborators = collaborators;
        cd.fill_salts();
        log_transition(&cd, DocumentState::Created);
        Ok(cd)
    }

    /// The successor of this version, shared with `collaborators` in
    /// addition to the existing ones.
    ///
    /// Only collaborators not already on the document are added, under a new
    /// role. Payload, roots and signatures are not carried over.
    pub fn prepare_new_version<S: AsRef<str>>(&self, collaborators: &[S]) -> DocumentResult<Self> {
        let document_identifier = self
            .document_identifier
            .ok_or(DocumentError::IncompleteDocument {
                field: "document_identifier",
            })?;
        let current_version = self.current_version.ok_or(DocumentError::IncompleteDocument {
            field: "current_version",
        })?;
        let next_version = self.next_version.ok_or(DocumentError::IncompleteDocument {
            field: "next_version",
        })?;
        let document_root = self.document_root.ok_or(DocumentError::IncompleteDocument {
            field: "document_root",
        })?;

        let added: Vec<CollaboratorId> = parse_collaborators(collaborators)?
            .into_iter()
            .filter(|c| !self.collaborators.contains(c))
            .collect();

        let mut collaborators = self.collaborators.clone();
        collaborators.extend_from_slice(&added);

        let mut cd = Self {
            document_identifier: Some(document_identifier),
            previous_version: Some(current_version),
            current_version: Some(next_version),
            next_version: Some(random_hash()),
            previous_root: Some(document_root),
            collaborators,
            roles: self.roles.clone(),
            read_rules: self.read_rules.clone(),
            access_tokens: self.access_tokens.clone(),
            ..Self::default()
        };
        cd.add_collaborators_to_read_sign_rules(&added);
        cd.fill_salts();
        log_transition(&cd, DocumentState::Created);
        Ok(cd)
    }
}
