//! Alias chain resolution.
//!
//! An alias may point at another alias, either by plain name (looked up in
//! the scope the resolution started with) or as `alias@catalog` (looked up
//! once in a registered catalog). `AliasResolver` follows that chain to a
//! target that is not an alias and merges every link on the way, letting the
//! link closest to the starting name win for everything except the script
//! reference.

use crate::catalog::{Alias, Catalog, CatalogRegistry, NearestCatalog};
use crate::error::ResolveError;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// A parsed `alias` or `alias@catalog` name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AliasName<'a> {
    pub alias: &'a str,
    pub catalog: Option<&'a str>,
}

impl<'a> AliasName<'a> {
    /// Split on `@`; neither side may be empty and only one `@` is allowed.
    pub fn parse(name: &'a str) -> Result<Self, ResolveError> {
        let parsed = match name.split_once('@') {
            None => Self {
                alias: name,
                catalog: None,
            },
            Some((alias, catalog)) => Self {
                alias,
                catalog: Some(catalog),
            },
        };
        let malformed = parsed.alias.is_empty()
            || parsed
                .catalog
                .is_some_and(|catalog| catalog.is_empty() || catalog.contains('@'));
        if malformed {
            return Err(ResolveError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(parsed)
    }

    pub fn is_qualified(&self) -> bool {
        self.catalog.is_some()
    }
}

impl fmt::Display for AliasName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.catalog {
            Some(catalog) => write!(f, "{}@{}", self.alias, catalog),
            None => f.write_str(self.alias),
        }
    }
}

type Lookup<'l> = dyn Fn(&str) -> Result<Option<Alias>, ResolveError> + 'l;

/// Resolves alias names against nearby catalogs and a catalog registry.
pub struct AliasResolver<'a> {
    registry: &'a dyn CatalogRegistry,
    nearest: &'a dyn NearestCatalog,
    cwd: PathBuf,
}

impl<'a> AliasResolver<'a> {
    /// `cwd` is where nearest-catalog searches start.
    pub fn new(
        registry: &'a dyn CatalogRegistry,
        nearest: &'a dyn NearestCatalog,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            nearest,
            cwd: cwd.into(),
        }
    }

    /// Resolve `name`, looking up every unqualified link in the nearest
    /// catalog (walking up from the working directory) that defines it.
    ///
    /// `Ok(None)` means no alias by that name exists anywhere in reach.
    pub fn resolve_unqualified(&self, name: &str) -> Result<Option<Alias>, ResolveError> {
        self.resolve_with(name, &|alias| self.find_nearby(alias))
    }

    /// Resolve `name`, looking up every unqualified link in `catalog`.
    pub fn resolve_in_catalog(
        &self,
        catalog: &Catalog,
        name: &str,
    ) -> Result<Option<Alias>, ResolveError> {
        self.resolve_with(name, &|alias| Ok(catalog.alias(alias).cloned()))
    }

    fn resolve_with(&self, name: &str, lookup: &Lookup<'_>) -> Result<Option<Alias>, ResolveError> {
        let mut seen = BTreeSet::new();
        let resolved = self.merge(Alias::default(), name, lookup, &mut seen)?;
        if resolved.script_ref.is_none() {
            tracing::debug!(name, "no alias found");
            return Ok(None);
        }
        tracing::debug!(
            name,
            script_ref = resolved.script_ref.as_deref().unwrap_or_default(),
            hops = seen.len(),
            "resolved alias"
        );
        Ok(Some(resolved))
    }

    fn merge(
        &self,
        acc: Alias,
        name: &str,
        lookup: &Lookup<'_>,
        seen: &mut BTreeSet<String>,
    ) -> Result<Alias, ResolveError> {
        if seen.contains(name) {
            return Err(ResolveError::AliasLoop {
                name: name.to_string(),
            });
        }
        let parsed = AliasName::parse(name)?;
        let found = match parsed.catalog {
            None => lookup(parsed.alias)?,
            Some(catalog) => Some(self.from_registry(catalog, parsed.alias)?),
        };
        let Some(found) = found else {
            return Ok(acc);
        };

        tracing::trace!(name, script_ref = ?found.script_ref, "following alias");
        seen.insert(name.to_string());
        // An alias without a script reference ends the chain where it stands.
        let found = match found.script_ref.clone() {
            Some(next) => self.merge(found, &next, lookup, seen)?,
            None => found,
        };
        Ok(acc.overlay(found))
    }

    fn find_nearby(&self, alias: &str) -> Result<Option<Alias>, ResolveError> {
        let catalog = self.nearest.nearest_with_alias(&self.cwd, alias)?;
        Ok(catalog.and_then(|catalog| catalog.alias(alias).cloned()))
    }

    // Qualified lookups are strict: a missing catalog or alias is an error.
    fn from_registry(&self, catalog_name: &str, alias: &str) -> Result<Alias, ResolveError> {
        let catalog =
            self.registry
                .catalog(catalog_name)?
                .ok_or_else(|| ResolveError::CatalogNotFound {
                    catalog: catalog_name.to_string(),
                })?;
        catalog
            .alias(alias)
            .cloned()
            .ok_or_else(|| ResolveError::AliasNotFound {
                alias: alias.to_string(),
                catalog: catalog_name.to_string(),
            })
    }
}
