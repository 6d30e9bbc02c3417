//! Ports of the CoreDocument subsystem
//!
//! - `inbound`: the processor API offered to document services
//! - `outbound`: identity, network and ledger dependencies

pub mod inbound;
pub mod outbound;

pub use inbound::DocumentProcessor;
pub use outbound::{AnchorRepository, IdentityService, NetworkClient, RemoteHandle};
