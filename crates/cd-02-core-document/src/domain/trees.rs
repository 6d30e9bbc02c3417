//! # Document Trees
//!
//! Four trees are built per document version:
//!
//! | Tree | Leaves | Root |
//! |------|--------|------|
//! | data | payload attributes (owned by the model) | `data_root` |
//! | core document | envelope fields + document type | `cd_root` |
//! | signing | `data_root`, `cd_root` (hashed) | `signing_root` |
//! | document root | `signing_root`, `signatures_data_root` (hashed) | `document_root` |
//!
//! The signatures tree is kept out of the signing root so that collecting
//! signatures never changes the message being signed.

use cd_01_document_tree::{DocumentTree, LeafNode, Property, Proof, Salts, TreeError, ZERO_SALT};
use shared_types::Hash;

use super::document::CoreDocument;
use super::fields;
use crate::error::{DocumentError, DocumentResult};

const CORE_DOCUMENT_TREE: &str = "core document";
const SIGNATURE_DATA_TREE: &str = "signature data";

type Leaf = (Property, Vec<u8>);

fn optional_hash(value: &Option<Hash>) -> Vec<u8> {
    value.map(|h| h.to_vec()).unwrap_or_default()
}

fn length_value(len: usize) -> Vec<u8> {
    (len as u64).to_be_bytes().to_vec()
}

/// Length leaf followed by one leaf per element.
fn push_list<T>(
    leaves: &mut Vec<Leaf>,
    list: &Property,
    items: &[T],
    mut element: impl FnMut(&mut Vec<Leaf>, Property, &T),
) {
    leaves.push((list.length(), length_value(items.len())));
    for (index, item) in items.iter().enumerate() {
        element(leaves, list.element(index), item);
    }
}

fn tree_from(leaves: Vec<Leaf>, salts: &Salts, extra: Vec<LeafNode>) -> DocumentResult<DocumentTree> {
    let mut tree = DocumentTree::new();
    for (property, value) in leaves {
        tree.add_salted(property, value, salts)?;
    }
    tree.add_leaves(extra)?;
    tree.generate()?;
    Ok(tree)
}

impl CoreDocument {
    /// Salted leaves of the core-document tree, document type excluded.
    pub(crate) fn core_document_leaves(&self) -> Vec<Leaf> {
        let mut leaves = vec![
            (fields::document_identifier(), optional_hash(&self.document_identifier)),
            (fields::previous_version(), optional_hash(&self.previous_version)),
            (fields::current_version(), optional_hash(&self.current_version)),
            (fields::next_version(), optional_hash(&self.next_version)),
            (fields::previous_root(), optional_hash(&self.previous_root)),
        ];

        push_list(&mut leaves, &fields::collaborators(), &self.collaborators, |out, p, c| {
            out.push((p, c.as_bytes().to_vec()))
        });

        push_list(&mut leaves, &fields::roles(), &self.roles, |out, p, role| {
            out.push((
                p.field("role_key", fields::ROLE_KEY),
                role.role_key.to_be_bytes().to_vec(),
            ));
            let members = p.field("collaborators", fields::ROLE_COLLABORATORS);
            push_list(out, &members, &role.collaborators, |out, p, c| {
                out.push((p, c.as_bytes().to_vec()))
            });
        });

        push_list(&mut leaves, &fields::read_rules(), &self.read_rules, |out, p, rule| {
            let roles = p.field("roles", fields::RULE_ROLES);
            push_list(out, &roles, &rule.roles, |out, p, key| {
                out.push((p, key.to_be_bytes().to_vec()))
            });
            out.push((p.field("action", fields::RULE_ACTION), vec![rule.action.code()]));
        });

        push_list(&mut leaves, &fields::access_tokens(), &self.access_tokens, |out, p, token| {
            out.push((p.field("identifier", fields::TOKEN_IDENTIFIER), token.identifier.to_vec()));
            out.push((p.field("granter", fields::TOKEN_GRANTER), token.granter.as_bytes().to_vec()));
            out.push((p.field("grantee", fields::TOKEN_GRANTEE), token.grantee.as_bytes().to_vec()));
            out.push((
                p.field("role_key", fields::TOKEN_ROLE_KEY),
                token.role_key.to_be_bytes().to_vec(),
            ));
            out.push((
                p.field("document_identifier", fields::TOKEN_DOCUMENT_IDENTIFIER),
                token.document_identifier.to_vec(),
            ));
            out.push((p.field("signature", fields::TOKEN_SIGNATURE), token.signature.clone()));
            out.push((p.field("key", fields::TOKEN_KEY), token.key.clone()));
        });

        leaves
    }

    fn signature_data_leaves(&self) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        push_list(&mut leaves, &fields::signatures(), self.signatures(), |out, p, sig| {
            out.push((
                p.field("signer_id", fields::SIGNATURE_SIGNER_ID),
                sig.signer_id.as_bytes().to_vec(),
            ));
            out.push((
                p.field("public_key", fields::SIGNATURE_PUBLIC_KEY),
                sig.public_key.to_vec(),
            ));
            out.push((
                p.field("signature", fields::SIGNATURE_VALUE),
                sig.signature.to_vec(),
            ));
            out.push((
                p.field("timestamp", fields::SIGNATURE_TIMESTAMP),
                sig.timestamp.to_be_bytes().to_vec(),
            ));
        });
        leaves
    }

    /// Properties that must be salted before the core-document tree can be built.
    pub fn core_document_properties(&self) -> Vec<Property> {
        self.core_document_leaves().into_iter().map(|(p, _)| p).collect()
    }

    /// Generate salts for core-document properties that have none.
    ///
    /// Existing salts are kept; returns how many were generated.
    pub fn fill_salts(&mut self) -> usize {
        let properties = self.core_document_properties();
        self.salts.get_or_insert_with(Salts::new).fill(&properties)
    }

    /// Generate salts for signature-data properties that have none.
    pub fn fill_signature_data_salts(&mut self) -> usize {
        let properties: Vec<Property> = self
            .signature_data_leaves()
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        self.signature_data_salts
            .get_or_insert_with(Salts::new)
            .fill(&properties)
    }

    /// Tree over the envelope fields and the document type.
    pub fn core_document_tree(&self) -> DocumentResult<DocumentTree> {
        let embedded = self
            .embedded_data
            .as_ref()
            .ok_or(DocumentError::EmbeddedDataMissing)?;
        let salts = self.salts.as_ref().ok_or(DocumentError::SaltsMissing {
            tree: CORE_DOCUMENT_TREE,
        })?;
        let document_type = LeafNode::salted(
            fields::document_type(),
            embedded.type_url.as_bytes().to_vec(),
            ZERO_SALT,
        );
        tree_from(self.core_document_leaves(), salts, vec![document_type])
    }

    /// Tree over the collected signatures.
    pub fn signature_data_tree(&self) -> DocumentResult<DocumentTree> {
        let salts = self
            .signature_data_salts
            .as_ref()
            .ok_or(DocumentError::SaltsMissing {
                tree: SIGNATURE_DATA_TREE,
            })?;
        tree_from(self.signature_data_leaves(), salts, Vec::new())
    }

    /// Tree with the data root and core-document root as hashed leaves.
    pub fn signing_tree(&self) -> DocumentResult<DocumentTree> {
        let data_root = self.data_root.ok_or(DocumentError::DataRootMissing)?;
        let cd_root = self.core_document_tree()?.root()?;
        let leaves = vec![
            LeafNode::hashed(fields::data_root(), data_root),
            LeafNode::hashed(fields::cd_root(), cd_root),
        ];
        tree_from(Vec::new(), &Salts::new(), leaves)
    }

    /// Tree with the signing root and signatures root as hashed leaves.
    pub fn document_root_tree(&self) -> DocumentResult<DocumentTree> {
        let signing_root = self.signing_root.ok_or(DocumentError::SigningRootMissing)?;
        let signatures_root = self.signature_data_tree()?.root()?;
        let leaves = vec![
            LeafNode::hashed(fields::signing_root(), signing_root),
            LeafNode::hashed(fields::signatures_data_root(), signatures_root),
        ];
        tree_from(Vec::new(), &Salts::new(), leaves)
    }

    /// Signing root of the document as it is now, without storing it.
    pub fn compute_signing_root(&self) -> DocumentResult<Hash> {
        Ok(self.signing_tree()?.root()?)
    }

    /// Compute and store the signing root.
    pub fn calculate_signing_root(&mut self) -> DocumentResult<Hash> {
        let root = self.compute_signing_root()?;
        self.signing_root = Some(root);
        Ok(root)
    }

    /// Document root of the document as it is now, without storing it.
    pub fn compute_document_root(&self) -> DocumentResult<Hash> {
        Ok(self.document_root_tree()?.root()?)
    }

    /// Salt the signatures, then compute and store the document root.
    pub fn calculate_document_root(&mut self) -> DocumentResult<Hash> {
        if self.signing_root.is_none() {
            return Err(DocumentError::SigningRootMissing);
        }
        self.fill_signature_data_salts();
        let root = self.compute_document_root()?;
        self.document_root = Some(root);
        Ok(root)
    }

    /// Hashes proving the signing root under the document root.
    pub fn signing_root_proof_hashes(&self) -> DocumentResult<Vec<Hash>> {
        Ok(self
            .document_root_tree()?
            .sorted_hashes(fields::SIGNING_ROOT_FIELD)?)
    }

    /// Hashes proving the data root under the document root.
    pub fn data_proof_hashes(&self) -> DocumentResult<Vec<Hash>> {
        let mut hashes = self.signing_tree()?.sorted_hashes(fields::DATA_ROOT_FIELD)?;
        hashes.extend(self.signing_root_proof_hashes()?);
        Ok(hashes)
    }

    /// Proofs for `fields` against the document root.
    ///
    /// Each field is looked up in the data tree first and in the
    /// core-document tree second. The resulting proofs are extended with the
    /// sibling root and the signing-root hashes so they verify against
    /// `document_root` directly.
    pub fn create_proofs(&self, data_tree: &DocumentTree, fields: &[&str]) -> DocumentResult<Vec<Proof>> {
        let data_root = data_tree.root()?;
        if self.data_root != Some(data_root) {
            return Err(DocumentError::DataRootMismatch);
        }
        let cd_tree = self.core_document_tree()?;
        let cd_root = cd_tree.root()?;
        let signing_hashes = self.signing_root_proof_hashes()?;

        fields
            .iter()
            .map(|field| {
                let (mut proof, sibling_root) = match data_tree.create_proof(field) {
                    Ok(proof) => (proof, cd_root),
                    Err(TreeError::FieldNotFound { .. }) => (cd_tree.create_proof(field)?, data_root),
                    Err(err) => return Err(err.into()),
                };
                proof.sorted_hashes.push(sibling_root);
                proof.sorted_hashes.extend_from_slice(&signing_hashes);
                Ok(proof)
            })
            .collect()
    }
}
