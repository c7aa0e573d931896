pub mod catalog;
pub mod error;
pub mod resolve;

pub use catalog::{
    Alias, Catalog, CatalogDiscovery, CatalogRef, CatalogRegistry, CatalogRepository,
    CatalogSource, NearestCatalog, load_catalog_from_path,
};
pub use error::{CatalogError, ResolveError};
pub use resolve::{AliasName, AliasResolver};

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the catalog registry file.
pub const ENV_REGISTRY: &str = "ALIASKIT_REGISTRY";
const HOME_REGISTRY: &str = ".aliaskit/catalogs.json";

fn registry_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    Some(PathBuf::from(hint))
}

/// Registry file to use when none was given explicitly.
///
/// `ALIASKIT_REGISTRY` wins when set (even if the file is missing, so the
/// caller gets a clear read error); otherwise `~/.aliaskit/catalogs.json` is
/// used when it exists.
pub fn default_registry_path() -> Option<PathBuf> {
    if let Ok(hint) = env::var(ENV_REGISTRY) {
        if let Some(path) = registry_from_hint(&hint) {
            return Some(path);
        }
    }

    let home = env::var_os("HOME")?;
    let candidate = Path::new(&home).join(HOME_REGISTRY);
    candidate.is_file().then_some(candidate)
}

/// Load the registry at `path`, or the default one, or an empty registry.
pub fn load_registry(path: Option<&Path>) -> Result<CatalogRepository, CatalogError> {
    match path.map(Path::to_path_buf).or_else(default_registry_path) {
        Some(path) => CatalogRepository::load(&path),
        None => Ok(CatalogRepository::default()),
    }
}
