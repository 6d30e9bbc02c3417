//! Domain layer: the core document, its trees and lifecycle rules.
//!
//! Pure logic. No I/O, no async.

pub mod access;
pub mod document;
pub mod fields;
pub mod model;
pub mod state;
pub mod trees;
pub mod versioning;

pub use document::{
    AccessToken, Action, CoreDocument, DocumentSignature, EmbeddedData, ReadRule, Role,
    SignatureData,
};
pub use model::{GenericModel, Model};
pub use state::DocumentState;
