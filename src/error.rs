//! Error types for catalog loading and alias resolution.
//!
//! "No alias with this name" is not an error: resolution reports it as
//! `Ok(None)` so callers can fall back to treating the name as a literal
//! script reference. Everything here aborts the resolution that raised it.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or validating catalog and registry files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("reading {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Failures raised while walking an alias chain.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Malformed `alias` / `alias@catalog` name; raised before any lookup.
    #[error("invalid alias name '{name}'")]
    InvalidName { name: String },

    /// The chain came back to a name it already visited.
    #[error("encountered alias loop on '{name}'")]
    AliasLoop { name: String },

    /// A qualified name referenced a catalog the registry does not know.
    #[error("no catalog registered with name '{catalog}'")]
    CatalogNotFound { catalog: String },

    /// A qualified name referenced an alias its catalog does not define.
    #[error("no alias found with name '{alias}' in catalog '{catalog}'")]
    AliasNotFound { alias: String, catalog: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
