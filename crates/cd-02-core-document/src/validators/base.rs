//! Structural checks every core document must pass before any other step.

use async_trait::async_trait;

use super::{get_core_document, Validator};
use crate::domain::{CoreDocument, Model};
use crate::error::ValidationErrors;

pub const IDENTIFIER_KEY: &str = "cd_identifier";
pub const CURRENT_VERSION_KEY: &str = "cd_current_version";
pub const NEXT_VERSION_KEY: &str = "cd_next_version";
pub const DATA_ROOT_KEY: &str = "cd_data_root";
pub const OVERALL_KEY: &str = "cd_overall";
pub const SALTS_KEY: &str = "cd_salts";

/// Identifiers present, next version fresh, every field salted.
///
/// Hash and identity sizes are fixed by their types, so only presence is
/// checked here.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseValidator;

impl BaseValidator {
    pub fn check(cd: &CoreDocument) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if cd.document_identifier.is_none() {
            errors.push(IDENTIFIER_KEY, "document identifier missing");
        }
        if cd.current_version.is_none() {
            errors.push(CURRENT_VERSION_KEY, "current version missing");
        }
        if cd.next_version.is_none() {
            errors.push(NEXT_VERSION_KEY, "next version missing");
        }
        if cd.data_root.is_none() {
            errors.push(DATA_ROOT_KEY, "data root missing");
        }

        // current == identifier is how every first version starts
        if let Some(next) = cd.next_version {
            if cd.current_version == Some(next) {
                errors.push(OVERALL_KEY, "next version equals current version");
            }
            if cd.document_identifier == Some(next) {
                errors.push(OVERALL_KEY, "next version equals document identifier");
            }
        }

        match &cd.salts {
            None => errors.push(SALTS_KEY, "core document salts missing"),
            Some(salts) => {
                let missing = salts.missing(&cd.core_document_properties());
                if !missing.is_empty() {
                    errors.push(SALTS_KEY, format!("salts missing for {}", missing.join(", ")));
                }
            }
        }

        errors
    }
}

#[async_trait]
impl Validator for BaseValidator {
    async fn validate(
        &self,
        _old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let cd = get_core_document(new)?;
        Self::check(&cd).into_result()
    }
}
