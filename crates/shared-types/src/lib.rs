//! # Shared Types Crate
//!
//! Primitive identifiers used across the document crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: hash, key and identity types are defined once here.
//! - **Fixed Sizes**: identifiers are fixed-size arrays so a wrongly sized value
//!   cannot be constructed, only rejected at decode time.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
