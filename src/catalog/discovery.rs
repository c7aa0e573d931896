//! Nearest-catalog discovery by walking up the directory tree.

use crate::catalog::{CATALOG_FILE, Catalog, HIDDEN_CATALOG_DIR, load_catalog_from_path};
use crate::error::CatalogError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Finds the catalog closest to a directory that defines a given alias.
pub trait NearestCatalog {
    fn nearest_with_alias(
        &self,
        dir: &Path,
        alias: &str,
    ) -> Result<Option<Arc<Catalog>>, CatalogError>;
}

/// Filesystem-backed discovery. Catalog files are loaded on first use and
/// kept for the lifetime of the value.
#[derive(Debug, Default)]
pub struct CatalogDiscovery {
    loaded: Mutex<BTreeMap<PathBuf, Arc<Catalog>>>,
}

impl CatalogDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk from `start` to the filesystem root and return the first catalog
    /// that `accept` agrees to.
    ///
    /// A directory may hold both a plain and a hidden catalog file; the plain
    /// one is considered first.
    pub fn find_nearest_with<F>(
        &self,
        start: &Path,
        accept: F,
    ) -> Result<Option<Arc<Catalog>>, CatalogError>
    where
        F: Fn(&Catalog) -> bool,
    {
        let mut dir = fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
        loop {
            for candidate in catalog_files_in(&dir) {
                let catalog = self.load(&candidate)?;
                if accept(&catalog) {
                    return Ok(Some(catalog));
                }
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    fn load(&self, path: &Path) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self.cache().get(path) {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(load_catalog_from_path(path)?);
        self.cache().insert(path.to_path_buf(), Arc::clone(&catalog));
        Ok(catalog)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, Arc<Catalog>>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NearestCatalog for CatalogDiscovery {
    fn nearest_with_alias(
        &self,
        dir: &Path,
        alias: &str,
    ) -> Result<Option<Arc<Catalog>>, CatalogError> {
        let found = self.find_nearest_with(dir, |catalog| catalog.contains(alias))?;
        if let Some(catalog) = &found {
            tracing::debug!(alias, catalog = %catalog.source().label(), "nearest catalog");
        }
        Ok(found)
    }
}

/// Catalog files present directly in `dir`, plain before hidden.
pub fn catalog_files_in(dir: &Path) -> Vec<PathBuf> {
    [
        dir.join(CATALOG_FILE),
        dir.join(HIDDEN_CATALOG_DIR).join(CATALOG_FILE),
    ]
    .into_iter()
    .filter(|candidate| candidate.is_file())
    .collect()
}
