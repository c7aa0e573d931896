//! Validation applied to catalog files before they are indexed.
//!
//! The loader is strict about alias names and script references so the
//! resolver never has to second-guess what a catalog hands it.

use crate::catalog::model::CatalogFile;
use crate::error::CatalogError;
use std::path::Path;

pub(crate) fn validate_catalog(path: &Path, file: &CatalogFile) -> Result<(), CatalogError> {
    let invalid = |message: String| CatalogError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    if let Some(base_ref) = &file.base_ref {
        if base_ref.trim().is_empty() {
            return Err(invalid("base-ref must not be empty".to_string()));
        }
    }

    for (name, alias) in &file.aliases {
        validate_alias_name(name).map_err(invalid)?;
        match alias.script_ref.as_deref() {
            Some(script_ref) if !script_ref.trim().is_empty() => {}
            _ => return Err(invalid(format!("alias '{name}' has no script-ref"))),
        }
        if let Some(key) = alias.properties.keys().find(|key| key.is_empty()) {
            return Err(invalid(format!(
                "alias '{name}' has an empty property name (value '{}')",
                alias.properties[key]
            )));
        }
    }
    Ok(())
}

/// Names stored in a catalog are always unqualified.
pub fn validate_alias_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("alias names must not be empty".to_string());
    }
    if name.contains('@') {
        return Err(format!("alias name '{name}' must not contain '@'"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(format!("alias name '{name}' must not contain whitespace"));
    }
    Ok(())
}
