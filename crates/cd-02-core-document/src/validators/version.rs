//! A new version correctly continues its predecessor's chain.

use async_trait::async_trait;
use shared_types::Hash;

use super::{pack_keyed, Validator};
use crate::domain::Model;
use crate::error::ValidationErrors;

pub const OLD_MODEL_KEY: &str = "cd_old_model";
pub const NEW_MODEL_KEY: &str = "cd_new_model";
pub const PREVIOUS_VERSION_KEY: &str = "cd_previous_version";
pub const CURRENT_VERSION_KEY: &str = "cd_current_version";
pub const NEXT_VERSION_KEY: &str = "cd_next_version";
pub const PREVIOUS_ROOT_KEY: &str = "cd_previous_root";
pub const DOCUMENT_IDENTIFIER_KEY: &str = "cd_document_identifier";

#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateVersionValidator;

fn check_link(errors: &mut ValidationErrors, key: &str, old: Option<Hash>, new: Option<Hash>) {
    match old {
        None => errors.push(key, "missing on previous version"),
        Some(expected) if new != Some(expected) => {
            errors.push(key, "mismatch with previous version")
        }
        Some(_) => {}
    }
}

#[async_trait]
impl Validator for UpdateVersionValidator {
    async fn validate(
        &self,
        old: Option<&dyn Model>,
        new: Option<&dyn Model>,
    ) -> Result<(), ValidationErrors> {
        let old_cd = pack_keyed(old, OLD_MODEL_KEY);
        let new_cd = pack_keyed(new, NEW_MODEL_KEY);
        let (old_cd, new_cd) = match (old_cd, new_cd) {
            (Ok(old_cd), Ok(new_cd)) => (old_cd, new_cd),
            (old_cd, new_cd) => {
                let mut errors = ValidationErrors::new();
                for result in [old_cd, new_cd] {
                    if let Err(e) = result {
                        errors.extend(e);
                    }
                }
                return Err(errors);
            }
        };

        let mut errors = ValidationErrors::new();
        check_link(
            &mut errors,
            DOCUMENT_IDENTIFIER_KEY,
            old_cd.document_identifier,
            new_cd.document_identifier,
        );
        check_link(
            &mut errors,
            PREVIOUS_VERSION_KEY,
            old_cd.current_version,
            new_cd.previous_version,
        );
        check_link(
            &mut errors,
            CURRENT_VERSION_KEY,
            old_cd.next_version,
            new_cd.current_version,
        );
        check_link(
            &mut errors,
            PREVIOUS_ROOT_KEY,
            old_cd.document_root,
            new_cd.previous_root,
        );
        if new_cd.next_version.is_none() {
            errors.push(NEXT_VERSION_KEY, "next version missing");
        }
        errors.into_result()
    }
}
