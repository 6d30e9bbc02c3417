//! # Domain Layer
//!
//! Pure tree logic: property naming, salts, leaves, the tree itself and proofs.
//! No I/O dependencies.

pub mod entities;
pub mod errors;
pub mod property;
pub mod salts;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use property::*;
pub use salts::*;
pub use value_objects::*;
