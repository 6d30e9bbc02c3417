//! In-process adapters for the outbound ports.
//!
//! Used by tests and single-node setups; production deployments plug in
//! their own identity registry and ledger client.

pub mod anchor_repository;
pub mod identity;

pub use anchor_repository::{AnchorRecord, InMemoryAnchorRepository};
pub use identity::KeyringIdentityService;
