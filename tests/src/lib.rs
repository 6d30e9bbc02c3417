//! # CoreDocument Test Suite
//!
//! Cross-node scenarios: several nodes, each with its own processor,
//! sharing one identity registry and one ledger and talking over an
//! in-process loopback network.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── loopback.rs    # In-process network of nodes
//!     ├── flows.rs       # Sign, anchor and distribute across nodes
//!     └── versions.rs    # Version chains handed between nodes
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cd-tests
//! cargo test -p cd-tests integration::flows::
//! ```

pub mod integration;
