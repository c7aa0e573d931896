#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Temporary directory tree holding catalog and registry files; removed on
// drop along with everything written into it.
pub struct CatalogTree {
    dir: TempDir,
}

impl CatalogTree {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("creating temp catalog tree")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create `rel` (and parents) under the root.
    pub fn dir(&self, rel: &str) -> Result<PathBuf> {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).with_context(|| format!("creating {}", path.display()))?;
        Ok(path)
    }

    /// Write `body` as `rel`, creating parent directories.
    pub fn write_json(&self, rel: &str, body: &Value) -> Result<PathBuf> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(body)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Write a registry file mapping each name to a catalog path relative to
    /// the root.
    pub fn write_registry(&self, entries: &[(&str, &str)]) -> Result<PathBuf> {
        let catalogs: serde_json::Map<String, Value> = entries
            .iter()
            .map(|(name, rel)| {
                (
                    name.to_string(),
                    serde_json::json!({ "catalog-ref": rel }),
                )
            })
            .collect();
        self.write_json("registry.json", &serde_json::json!({ "catalogs": catalogs }))
    }
}
