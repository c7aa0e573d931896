//! Catalog and alias types as they appear in catalog files.

use crate::catalog::index::validate_catalog;
use crate::error::CatalogError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A named script reference plus the execution settings that go with it.
///
/// Empty sequences and maps count as unset when aliases are merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Alias {
    #[serde(default, alias = "scriptRef", skip_serializing_if = "Option::is_none")]
    pub script_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub arguments: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        alias = "java-options",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub runtime_options: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sources: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        rename = "files",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub resources: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub dependencies: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub repositories: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub classpaths: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub properties: BTreeMap<String, String>,
    #[serde(default, rename = "java", skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,
    #[serde(default, rename = "main", skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub compile_options: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub native_options: Vec<String>,
    /// Where this alias was defined. Filled in by the loader.
    #[serde(skip)]
    pub catalog: Option<Arc<CatalogSource>>,
}

impl Alias {
    /// Alias pointing at `script_ref` with every other field unset.
    pub fn to(script_ref: impl Into<String>) -> Self {
        Self {
            script_ref: Some(script_ref.into()),
            ..Self::default()
        }
    }

    /// Combine `self` (the more specific alias) with `base`.
    ///
    /// Fields set on `self` win; unset or empty ones are taken from `base`.
    /// The script reference always comes from `base`, which is the deeper link
    /// of the chain, and so does the catalog when `base` has one.
    pub fn overlay(self, base: Alias) -> Alias {
        Alias {
            script_ref: base.script_ref,
            description: self.description.or(base.description),
            arguments: non_empty_or(self.arguments, base.arguments),
            runtime_options: non_empty_or(self.runtime_options, base.runtime_options),
            sources: non_empty_or(self.sources, base.sources),
            resources: non_empty_or(self.resources, base.resources),
            dependencies: non_empty_or(self.dependencies, base.dependencies),
            repositories: non_empty_or(self.repositories, base.repositories),
            classpaths: non_empty_or(self.classpaths, base.classpaths),
            properties: if self.properties.is_empty() {
                base.properties
            } else {
                self.properties
            },
            java_version: self.java_version.or(base.java_version),
            main_class: self.main_class.or(base.main_class),
            compile_options: non_empty_or(self.compile_options, base.compile_options),
            native_options: non_empty_or(self.native_options, base.native_options),
            catalog: base.catalog.or(self.catalog),
        }
    }

    /// The script reference with the owning catalog's base applied.
    ///
    /// URLs, absolute paths and dependency coordinates pass through untouched.
    /// Nothing here checks that the target exists.
    pub fn resolved_script_ref(&self) -> Option<String> {
        let script_ref = self.script_ref.as_deref()?;
        Some(match &self.catalog {
            Some(source) => source.resolve_ref(script_ref),
            None => script_ref.to_string(),
        })
    }
}

/// Catalog files may spell an unset list or map as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn non_empty_or(preferred: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

/// Provenance of a catalog: where it was read from and how it is registered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogSource {
    /// Catalog file, absent for catalogs built in memory.
    pub path: Option<PathBuf>,
    /// Registered name, absent for catalogs found by directory search.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Base path or URL that relative script references resolve against.
    pub base_ref: Option<String>,
}

impl CatalogSource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Directory holding the catalog file.
    pub fn dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    /// Human-readable label for logs and messages.
    pub fn label(&self) -> String {
        match (&self.name, &self.path) {
            (Some(name), _) => name.clone(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => "<memory>".to_string(),
        }
    }

    pub fn resolve_ref(&self, script_ref: &str) -> String {
        if is_url(script_ref) || Path::new(script_ref).is_absolute() || is_coordinate(script_ref)
        {
            return script_ref.to_string();
        }
        match self.base_ref.as_deref() {
            Some(base) if is_url(base) => {
                format!("{}/{}", base.trim_end_matches('/'), script_ref)
            }
            Some(base) => {
                let base = Path::new(base);
                let base = match self.dir() {
                    Some(dir) if base.is_relative() => dir.join(base),
                    _ => base.to_path_buf(),
                };
                base.join(script_ref).to_string_lossy().into_owned()
            }
            None => match self.dir() {
                Some(dir) => dir.join(script_ref).to_string_lossy().into_owned(),
                None => script_ref.to_string(),
            },
        }
    }
}

fn is_url(value: &str) -> bool {
    value.contains("://")
}

// group:artifact:version[:classifier][@type]
fn is_coordinate(value: &str) -> bool {
    if value.contains('/') || value.contains('\\') {
        return false;
    }
    let parts: Vec<&str> = value.split(':').collect();
    parts.len() >= 3 && parts.iter().all(|part| !part.is_empty())
}

/// A loaded catalog: alias names mapped to their definitions.
///
/// Read-only once built; every alias carries a pointer to `source`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    source: Arc<CatalogSource>,
    aliases: BTreeMap<String, Alias>,
}

impl Catalog {
    pub fn new(source: CatalogSource, aliases: BTreeMap<String, Alias>) -> Self {
        let source = Arc::new(source);
        let aliases = aliases
            .into_iter()
            .map(|(name, mut alias)| {
                alias.catalog = Some(Arc::clone(&source));
                (name, alias)
            })
            .collect();
        Self { source, aliases }
    }

    /// The same catalog registered under `name`.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.map_source(|source| source.name = Some(name))
    }

    /// Rebuild the catalog with edited provenance.
    pub fn map_source(self, edit: impl FnOnce(&mut CatalogSource)) -> Self {
        let mut source = (*self.source).clone();
        edit(&mut source);
        Self::new(source, self.aliases)
    }

    pub fn source(&self) -> &Arc<CatalogSource> {
        &self.source
    }

    pub fn alias(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CatalogFile {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_ref: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aliases: BTreeMap<String, Alias>,
}

/// Read, validate and index the catalog stored at `path`.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog, CatalogError> {
    let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = serde_json::from_str(&data).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_catalog(path, &file)?;
    tracing::debug!(
        catalog = %path.display(),
        aliases = file.aliases.len(),
        "loaded catalog"
    );

    let source = CatalogSource {
        path: Some(path.to_path_buf()),
        name: None,
        description: file.description,
        base_ref: file.base_ref,
    };
    Ok(Catalog::new(source, file.aliases))
}
