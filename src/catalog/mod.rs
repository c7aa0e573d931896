//! Alias catalog wiring.
//!
//! A catalog is a JSON file (for example `alias-catalog.json`) mapping alias
//! names to script definitions. Types here mirror the file fields; callers use
//! `CatalogDiscovery` to find the nearest catalog on disk and
//! `CatalogRepository` when catalogs are registered under logical names.

pub mod discovery;
pub mod index;
pub mod model;
pub mod repository;

pub use discovery::{CatalogDiscovery, NearestCatalog};
pub use model::{Alias, Catalog, CatalogSource, load_catalog_from_path};
pub use repository::{CatalogRef, CatalogRegistry, CatalogRepository};

/// Catalog file name looked up in every directory during discovery.
pub const CATALOG_FILE: &str = "alias-catalog.json";

/// Hidden directory checked for a catalog file when the plain one is absent.
pub const HIDDEN_CATALOG_DIR: &str = ".aliaskit";
