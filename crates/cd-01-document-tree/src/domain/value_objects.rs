//! # Value Objects
//!
//! Constants shared by the tree, salts and property encoding.

/// Size in bytes of a field salt.
pub const SALT_SIZE: usize = 32;

/// A per-field salt.
pub type Salt = [u8; SALT_SIZE];

/// All-zero salt, used for synthetic leaves whose value is public by design.
pub const ZERO_SALT: Salt = [0u8; SALT_SIZE];

/// Field code appended to a repeated property to name its length leaf.
pub const LENGTH_CODE: u32 = 0xFFFF_FFFF;

/// Suffix appended to a repeated property's readable name for its length leaf.
pub const LENGTH_SUFFIX: &str = "length";
