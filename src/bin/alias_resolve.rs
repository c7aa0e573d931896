//! Resolve an alias name and print the merged definition as JSON.
//!
//! Usage:
//!   alias-resolve hello
//!   alias-resolve hello@base --registry ~/.aliaskit/catalogs.json
//!   alias-resolve tool --catalog ./alias-catalog.json --script-only
//!
//! Exits 2 when no alias with the given name exists, so callers can fall back
//! to treating the name as a literal script reference.

use aliaskit::{AliasResolver, CatalogDiscovery, load_catalog_from_path, load_registry};
use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXIT_NOT_FOUND: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "alias-resolve")]
#[command(about = "Resolve a script alias across local and registered catalogs")]
struct Cli {
    /// Alias to resolve: `name` or `name@catalog`.
    name: String,
    /// Resolve unqualified names in this catalog file instead of searching
    /// upwards from the working directory.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Catalog registry file (defaults to $ALIASKIT_REGISTRY or
    /// ~/.aliaskit/catalogs.json).
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Directory to start nearest-catalog searches from.
    #[arg(long)]
    cwd: Option<PathBuf>,
    /// Print only the resolved script reference.
    #[arg(long)]
    script_only: bool,
}

fn main() {
    init_tracing();
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_NOT_FOUND),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let registry = load_registry(cli.registry.as_deref()).context("loading catalog registry")?;
    let cwd = match cli.cwd {
        Some(dir) => dir,
        None => env::current_dir().context("reading working directory")?,
    };
    let discovery = CatalogDiscovery::new();
    let resolver = AliasResolver::new(&registry, &discovery, cwd);

    let resolved = match &cli.catalog {
        Some(path) => {
            let catalog = load_catalog_from_path(path)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            resolver.resolve_in_catalog(&catalog, &cli.name)
        }
        None => resolver.resolve_unqualified(&cli.name),
    }
    .with_context(|| format!("resolving alias '{}'", cli.name))?;

    let Some(alias) = resolved else {
        eprintln!("alias-resolve: no alias found with name '{}'", cli.name);
        return Ok(false);
    };

    if cli.script_only {
        println!("{}", alias.resolved_script_ref().unwrap_or_default());
    } else {
        println!("{}", serde_json::to_string_pretty(&alias)?);
    }
    Ok(true)
}
