//! Registry of catalogs addressed by logical name.
//!
//! Catalogs can be registered directly (already loaded) or by reference to a
//! file; referenced files are read the first time a lookup asks for them.
//! A registry file lists references as
//! `{"catalogs": {"<name>": {"catalog-ref": "<path>"}}}`.

use crate::catalog::{Catalog, load_catalog_from_path};
use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Looks up a registered catalog by name; `Ok(None)` when nothing is
/// registered under it.
pub trait CatalogRegistry {
    fn catalog(&self, name: &str) -> Result<Option<Arc<Catalog>>, CatalogError>;
}

/// A registry entry pointing at a catalog file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogRef {
    pub catalog_ref: PathBuf,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    catalogs: BTreeMap<String, CatalogRef>,
}

#[derive(Debug, Default)]
pub struct CatalogRepository {
    refs: BTreeMap<String, CatalogRef>,
    loaded: Mutex<BTreeMap<String, Arc<Catalog>>>,
}

impl CatalogRepository {
    /// Read catalog references from a registry file.
    ///
    /// Relative `catalog-ref` paths resolve against the registry file's
    /// directory. Referenced catalogs are not read yet.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RegistryFile =
            serde_json::from_str(&data).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let mut repo = Self::default();
        for (name, mut entry) in file.catalogs {
            if name.trim().is_empty() || name.contains('@') {
                return Err(CatalogError::Invalid {
                    path: path.to_path_buf(),
                    message: format!("invalid catalog name '{name}'"),
                });
            }
            if entry.catalog_ref.is_relative() {
                entry.catalog_ref = base.join(&entry.catalog_ref);
            }
            repo.register_ref(name, entry);
        }
        tracing::debug!(registry = %path.display(), catalogs = repo.refs.len(), "loaded registry");
        Ok(repo)
    }

    /// Register an already loaded catalog. Replaces any earlier entry with
    /// the same name.
    pub fn register(&mut self, name: impl Into<String>, catalog: Catalog) {
        let name = name.into();
        self.refs.remove(&name);
        let catalog = Arc::new(catalog.with_name(name.clone()));
        self.cache().insert(name, catalog);
    }

    /// Register a catalog file to be loaded on first lookup.
    pub fn register_ref(&mut self, name: impl Into<String>, entry: CatalogRef) {
        let name = name.into();
        self.cache().remove(&name);
        self.refs.insert(name, entry);
    }

    /// Registered names in stable order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.refs.keys().cloned().collect();
        names.extend(self.cache().keys().cloned());
        names.sort();
        names.dedup();
        names
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Arc<Catalog>>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CatalogRegistry for CatalogRepository {
    fn catalog(&self, name: &str) -> Result<Option<Arc<Catalog>>, CatalogError> {
        if let Some(catalog) = self.cache().get(name) {
            return Ok(Some(Arc::clone(catalog)));
        }
        let Some(entry) = self.refs.get(name) else {
            return Ok(None);
        };

        tracing::debug!(catalog = name, path = %entry.catalog_ref.display(), "loading registered catalog");
        let catalog = load_catalog_from_path(&entry.catalog_ref)?.map_source(|source| {
            source.name = Some(name.to_string());
            if source.description.is_none() {
                source.description = entry.description.clone();
            }
        });
        let catalog = Arc::new(catalog);
        self.cache().insert(name.to_string(), Arc::clone(&catalog));
        Ok(Some(catalog))
    }
}
