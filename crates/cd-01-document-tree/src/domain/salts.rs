//! # Field Salting
//!
//! A salt per leaf stops an observer who sees a leaf hash from brute-forcing
//! low-entropy values (amounts, dates, flags). Salts are generated once per
//! property and then kept: regenerating a salt changes the leaf hash and
//! therefore every root above it.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::property::Property;
use super::value_objects::{Salt, SALT_SIZE};

/// Salts keyed by readable property name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salts {
    values: BTreeMap<String, Salt>,
}

impl Salts {
    /// An empty salt set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate salts for every property that does not have one yet.
    ///
    /// Returns how many salts were generated.
    pub fn fill<'a, I>(&mut self, properties: I) -> usize
    where
        I: IntoIterator<Item = &'a Property>,
    {
        let mut rng = rand::thread_rng();
        let mut generated = 0;
        for property in properties {
            self.values
                .entry(property.readable().to_string())
                .or_insert_with(|| {
                    generated += 1;
                    let mut salt = [0u8; SALT_SIZE];
                    rng.fill_bytes(&mut salt);
                    salt
                });
        }
        generated
    }

    /// Set an explicit salt.
    pub fn insert(&mut self, readable: impl Into<String>, salt: Salt) {
        self.values.insert(readable.into(), salt);
    }

    /// Remove the salt of a property.
    pub fn remove(&mut self, readable: &str) -> Option<Salt> {
        self.values.remove(readable)
    }

    /// Salt of a property.
    pub fn get(&self, readable: &str) -> Option<&Salt> {
        self.values.get(readable)
    }

    /// Whether a property has a salt.
    pub fn contains(&self, readable: &str) -> bool {
        self.values.contains_key(readable)
    }

    /// Readable names among `properties` that have no salt.
    pub fn missing<'a, I>(&self, properties: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Property>,
    {
        properties
            .into_iter()
            .filter(|p| !self.contains(p.readable()))
            .map(|p| p.readable().to_string())
            .collect()
    }

    /// Number of salts held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no salt is held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
