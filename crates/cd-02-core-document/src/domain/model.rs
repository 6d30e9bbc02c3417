//! # Models
//!
//! A model is a business document (invoice, purchase order, ...) that can be
//! packed into a [`CoreDocument`] and restored from one. The processor only
//! ever sees models through this trait.

use cd_01_document_tree::{DocumentTree, Property, Salts};
use shared_types::Hash;
use std::collections::BTreeMap;

use super::document::{CoreDocument, EmbeddedData};
use crate::error::{DocumentError, DocumentResult};

/// A business document carried in a core document
pub trait Model: Send + Sync {
    /// The core document with this model's payload embedded.
    fn pack_core_document(&self) -> DocumentResult<CoreDocument>;

    /// Replace this model's state with the content of `cd`.
    fn unpack_core_document(&mut self, cd: CoreDocument) -> DocumentResult<()>;
}

/// A model made of named binary attributes.
///
/// Each attribute is one salted leaf of the data tree, named by its
/// attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericModel {
    type_url: String,
    attributes: BTreeMap<String, Vec<u8>>,
    salts: Salts,
    core_document: Option<CoreDocument>,
}

impl GenericModel {
    pub fn new(
        type_url: impl Into<String>,
        attributes: BTreeMap<String, Vec<u8>>,
        core_document: CoreDocument,
    ) -> Self {
        Self {
            type_url: type_url.into(),
            attributes,
            salts: Salts::new(),
            core_document: Some(core_document),
        }
    }

    /// A model waiting to be filled by [`Model::unpack_core_document`].
    pub fn empty(type_url: impl Into<String>) -> Self {
        Self {
            type_url: type_url.into(),
            attributes: BTreeMap::new(),
            salts: Salts::new(),
            core_document: None,
        }
    }

    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    pub fn attributes(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.attributes
    }

    pub fn core_document(&self) -> Option<&CoreDocument> {
        self.core_document.as_ref()
    }

    /// Set an attribute. The data root must be recalculated afterwards.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Vec<u8>) {
        self.attributes.insert(name.into(), value);
    }

    fn properties(&self) -> Vec<Property> {
        self.attributes
            .keys()
            .map(|name| Property::with_compact(name.as_str(), name.as_bytes().to_vec()))
            .collect()
    }

    /// Tree over the attributes, using the salts generated so far.
    pub fn data_tree(&self) -> DocumentResult<DocumentTree> {
        let mut tree = DocumentTree::new();
        for (property, value) in self.properties().into_iter().zip(self.attributes.values()) {
            tree.add_salted(property, value.clone(), &self.salts)?;
        }
        tree.generate()?;
        Ok(tree)
    }

    /// Salt new attributes, then compute and store the data root on the
    /// core document.
    pub fn calculate_data_root(&mut self) -> DocumentResult<Hash> {
        if self.core_document.is_none() {
            return Err(DocumentError::NilDocument);
        }
        let properties = self.properties();
        self.salts.fill(&properties);
        let root = self.data_tree()?.root()?;
        if let Some(cd) = self.core_document.as_mut() {
            cd.data_root = Some(root);
        }
        Ok(root)
    }
}

impl Model for GenericModel {
    fn pack_core_document(&self) -> DocumentResult<CoreDocument> {
        let mut cd = self.core_document.clone().ok_or(DocumentError::NilDocument)?;
        let value =
            bincode::serialize(&self.attributes).map_err(|e| DocumentError::Codec(e.to_string()))?;
        cd.embedded_data = Some(EmbeddedData {
            type_url: self.type_url.clone(),
            value,
        });
        cd.embedded_data_salts = Some(self.salts.clone());
        Ok(cd)
    }

    fn unpack_core_document(&mut self, cd: CoreDocument) -> DocumentResult<()> {
        if let Some(embedded) = &cd.embedded_data {
            if embedded.type_url != self.type_url {
                return Err(DocumentError::TypeMismatch {
                    expected: self.type_url.clone(),
                    actual: embedded.type_url.clone(),
                });
            }
            self.attributes = bincode::deserialize(&embedded.value)
                .map_err(|e| DocumentError::Codec(e.to_string()))?;
            self.salts = cd.embedded_data_salts.clone().unwrap_or_default();
        }
        self.core_document = Some(cd);
        Ok(())
    }
}
