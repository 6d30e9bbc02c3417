//! # Field Codes
//!
//! Compact codes of every leaf the protocol hashes. These codes are part of
//! the wire format: two nodes only agree on a root if they agree on every
//! code below, so none of them may ever be renumbered.

use cd_01_document_tree::Property;

pub const PREVIOUS_VERSION: u32 = 0x01;
pub const CURRENT_VERSION: u32 = 0x02;
pub const NEXT_VERSION: u32 = 0x03;
pub const DATA_ROOT: u32 = 0x05;
pub const SIGNATURES_DATA_ROOT: u32 = 0x06;
pub const CD_ROOT: u32 = 0x07;
pub const DOCUMENT_IDENTIFIER: u32 = 0x09;
pub const SIGNING_ROOT: u32 = 0x0A;
pub const PREVIOUS_ROOT: u32 = 0x0B;
pub const COLLABORATORS: u32 = 0x0C;
pub const ROLES: u32 = 0x0D;
pub const READ_RULES: u32 = 0x0E;
pub const ACCESS_TOKENS: u32 = 0x0F;
pub const DOCUMENT_TYPE: u32 = 0x64;

/// Signature data tree
pub const SIGNATURES: u32 = 0x01;

// Nested fields, scoped to their parent.
pub const ROLE_KEY: u32 = 0x01;
pub const ROLE_COLLABORATORS: u32 = 0x02;
pub const RULE_ROLES: u32 = 0x01;
pub const RULE_ACTION: u32 = 0x02;
pub const SIGNATURE_SIGNER_ID: u32 = 0x01;
pub const SIGNATURE_PUBLIC_KEY: u32 = 0x02;
pub const SIGNATURE_VALUE: u32 = 0x03;
pub const SIGNATURE_TIMESTAMP: u32 = 0x04;
pub const TOKEN_IDENTIFIER: u32 = 0x01;
pub const TOKEN_GRANTER: u32 = 0x02;
pub const TOKEN_GRANTEE: u32 = 0x03;
pub const TOKEN_ROLE_KEY: u32 = 0x04;
pub const TOKEN_DOCUMENT_IDENTIFIER: u32 = 0x05;
pub const TOKEN_SIGNATURE: u32 = 0x06;
pub const TOKEN_KEY: u32 = 0x07;

pub const DOCUMENT_TYPE_FIELD: &str = "document_type";
pub const DATA_ROOT_FIELD: &str = "data_root";
pub const CD_ROOT_FIELD: &str = "cd_root";
pub const SIGNING_ROOT_FIELD: &str = "signing_root";
pub const SIGNATURES_DATA_ROOT_FIELD: &str = "signatures_data_root";

pub fn previous_version() -> Property {
    Property::with_code("previous_version", PREVIOUS_VERSION)
}

pub fn current_version() -> Property {
    Property::with_code("current_version", CURRENT_VERSION)
}

pub fn next_version() -> Property {
    Property::with_code("next_version", NEXT_VERSION)
}

pub fn document_identifier() -> Property {
    Property::with_code("document_identifier", DOCUMENT_IDENTIFIER)
}

pub fn previous_root() -> Property {
    Property::with_code("previous_root", PREVIOUS_ROOT)
}

pub fn collaborators() -> Property {
    Property::with_code("collaborators", COLLABORATORS)
}

pub fn roles() -> Property {
    Property::with_code("roles", ROLES)
}

pub fn read_rules() -> Property {
    Property::with_code("read_rules", READ_RULES)
}

pub fn access_tokens() -> Property {
    Property::with_code("access_tokens", ACCESS_TOKENS)
}

pub fn signatures() -> Property {
    Property::with_code("signatures", SIGNATURES)
}

pub fn document_type() -> Property {
    Property::with_code(DOCUMENT_TYPE_FIELD, DOCUMENT_TYPE)
}

pub fn data_root() -> Property {
    Property::with_code(DATA_ROOT_FIELD, DATA_ROOT)
}

pub fn cd_root() -> Property {
    Property::with_code(CD_ROOT_FIELD, CD_ROOT)
}

pub fn signing_root() -> Property {
    Property::with_code(SIGNING_ROOT_FIELD, SIGNING_ROOT)
}

pub fn signatures_data_root() -> Property {
    Property::with_code(SIGNATURES_DATA_ROOT_FIELD, SIGNATURES_DATA_ROOT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_root_codes() {
        assert_eq!(cd_root().compact(), &[0, 0, 0, 0x07]);
        assert_eq!(data_root().compact(), &[0, 0, 0, 0x05]);
        assert_eq!(document_type().compact(), &[0, 0, 0, 0x64]);
        assert_eq!(signing_root().compact(), &[0, 0, 0, 0x0A]);
        assert_eq!(signatures_data_root().compact(), &[0, 0, 0, 0x06]);
    }
}
