// alias-resolve binary behavior: output, exit codes and error messages.
mod support;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::process::{Command, Output};
use support::CatalogTree;

fn alias_resolve(tree: &CatalogTree, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_alias-resolve"))
        .args(args)
        .arg("--cwd")
        .arg(tree.root())
        .env_remove("ALIASKIT_REGISTRY")
        .env("HOME", tree.root())
        .output()
        .context("running alias-resolve")
}

fn sample_tree() -> Result<CatalogTree> {
    let tree = CatalogTree::new()?;
    tree.write_json(
        "alias-catalog.json",
        &json!({
            "aliases": {
                "greet": {
                    "script-ref": "hello@base",
                    "arguments": ["world"],
                    "properties": {"mode": "fast"}
                },
                "spin": {"script-ref": "spin"}
            }
        }),
    )?;
    tree.write_json(
        "shared/base.json",
        &json!({
            "base-ref": "https://example.org/scripts",
            "aliases": {"hello": {"script-ref": "hello.java", "java": "17"}}
        }),
    )?;
    tree.write_registry(&[("base", "shared/base.json")])?;
    Ok(tree)
}

#[test]
fn prints_merged_alias_as_json() -> Result<()> {
    let tree = sample_tree()?;
    let registry = tree.root().join("registry.json");
    let output = alias_resolve(
        &tree,
        &["greet", "--registry", registry.to_str().context("utf-8 path")?],
    )?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["script-ref"], "hello.java");
    assert_eq!(value["arguments"], json!(["world"]));
    assert_eq!(value["java"], "17");
    assert_eq!(value["properties"]["mode"], "fast");
    Ok(())
}

#[test]
fn script_only_applies_catalog_base() -> Result<()> {
    let tree = sample_tree()?;
    let registry = tree.root().join("registry.json");
    let output = alias_resolve(
        &tree,
        &[
            "greet",
            "--script-only",
            "--registry",
            registry.to_str().context("utf-8 path")?,
        ],
    )?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://example.org/scripts/hello.java"
    );
    Ok(())
}

#[test]
fn missing_alias_exits_with_not_found_code() -> Result<()> {
    let tree = sample_tree()?;
    let output = alias_resolve(&tree, &["nothing-here"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no alias found"));
    Ok(())
}

#[test]
fn loop_is_reported_as_failure() -> Result<()> {
    let tree = sample_tree()?;
    let output = alias_resolve(&tree, &["spin"])?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("alias loop on 'spin'"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn unregistered_catalog_is_named_in_error() -> Result<()> {
    let tree = sample_tree()?;
    // Without --registry and with HOME pointing at the tree, the registry is empty.
    let output = alias_resolve(&tree, &["greet"])?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'base'"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn catalog_flag_scopes_unqualified_lookups() -> Result<()> {
    let tree = sample_tree()?;
    let pinned = tree.write_json(
        "pinned/tools.json",
        &json!({
            "aliases": {
                "greet": {"script-ref": "impl", "arguments": ["pinned"]},
                "impl": {"script-ref": "pinned.java"}
            }
        }),
    )?;
    let output = alias_resolve(
        &tree,
        &["greet", "--catalog", pinned.to_str().context("utf-8 path")?],
    )?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // The nearby catalog's `greet` would have led to the unregistered `base`.
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["script-ref"], "pinned.java");
    assert_eq!(value["arguments"], json!(["pinned"]));
    Ok(())
}

#[test]
fn registry_is_read_from_environment() -> Result<()> {
    let tree = sample_tree()?;
    let output = Command::new(env!("CARGO_BIN_EXE_alias-resolve"))
        .args(["greet", "--script-only", "--cwd"])
        .arg(tree.root())
        .env("ALIASKIT_REGISTRY", tree.root().join("registry.json"))
        .env("HOME", tree.root())
        .output()
        .context("running alias-resolve")?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://example.org/scripts/hello.java"
    );
    Ok(())
}
