//! # Read Rules
//!
//! Access is granted through roles: a role groups collaborators and a read
//! rule grants an action to a list of role keys. Role keys are positional
//! (`roles[n].role_key == n`).

use shared_types::CollaboratorId;
use std::collections::BTreeSet;

use super::document::{Action, CoreDocument, ReadRule, Role};
use crate::error::{DocumentError, DocumentResult};

impl CoreDocument {
    /// Create the initial read-and-sign rule.
    ///
    /// No-op when roles and read rules already exist.
    pub fn init_read_rules(&mut self, collaborators: &[CollaboratorId]) -> DocumentResult<()> {
        if !self.roles.is_empty() && !self.read_rules.is_empty() {
            return Ok(());
        }
        if collaborators.is_empty() {
            return Err(DocumentError::ZeroCollaborators);
        }
        self.add_collaborators_to_read_sign_rules(collaborators);
        Ok(())
    }

    /// Grant read-and-sign to `collaborators` under a new role.
    ///
    /// Returns `false` and changes nothing when the list is empty or a role
    /// with exactly this set of collaborators already exists.
    pub fn add_collaborators_to_read_sign_rules(&mut self, collaborators: &[CollaboratorId]) -> bool {
        let wanted: BTreeSet<&CollaboratorId> = collaborators.iter().collect();
        if wanted.is_empty() {
            return false;
        }
        let exists = self
            .roles
            .iter()
            .any(|role| role.collaborators.iter().collect::<BTreeSet<_>>() == wanted);
        if exists {
            return false;
        }

        let mut members: Vec<CollaboratorId> = Vec::with_capacity(collaborators.len());
        for c in collaborators {
            if !members.contains(c) {
                members.push(*c);
            }
        }

        let role_key = self.roles.len() as u32;
        self.roles.push(Role {
            role_key,
            collaborators: members,
        });
        self.read_rules.push(ReadRule {
            roles: vec![role_key],
            action: Action::ReadAndSign,
        });
        true
    }

    /// Ok when some read rule grants `peer` read access.
    pub fn peer_can_read(&self, peer: &CollaboratorId) -> DocumentResult<()> {
        let granted = self
            .roles
            .iter()
            .filter(|role| role.collaborators.contains(peer))
            .any(|role| {
                self.read_rules.iter().any(|rule| {
                    rule.action == Action::ReadAndSign && rule.roles.contains(&role.role_key)
                })
            });
        if granted {
            Ok(())
        } else {
            Err(DocumentError::PeerNotFound { peer: *peer })
        }
    }
}
