//! hotglob: command-line host for the glob-accept transform.
//!
//! Walks a project tree (or takes explicit files), runs the transform on
//! each source unit, and either prints the rewritten text or writes it
//! back in place. Diagnostics go to stderr with source context; any error
//! diagnostic fails the run.
//!
//! # Usage
//!
//! ```bash
//! # Preview the rewrite of one file
//! hotglob --root . src/app.ts
//!
//! # Rewrite a whole tree in place, with offset maps
//! hotglob --root . --write --sourcemap
//!
//! # Teach the resolver a bare-specifier prefix
//! hotglob --root . --alias 'widgets-pkg=/abs/path/widgets' src/app.ts
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hotglob_core::paths::slash;
use hotglob_core::{transform_unit, ResolveOptions, SpecifierResolver, TransformContext};
use hotglob_glob::{FileWalker, LocalFs};

#[derive(Parser, Debug)]
#[command(name = "hotglob", version, about = "Expand glob-accept hot-update call sites")]
struct Cli {
    /// Project root directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Files to transform; the whole root is scanned when omitted.
    paths: Vec<PathBuf>,

    /// Rewrite files in place instead of printing to stdout.
    #[arg(long)]
    write: bool,

    /// Write `<file>.map.json` offset maps next to rewritten files.
    /// Implies --write.
    #[arg(long)]
    sourcemap: bool,

    /// File extensions to scan when no paths are given.
    #[arg(long = "ext", value_delimiter = ',', default_value = "js,jsx,ts,tsx,mjs,cjs")]
    extensions: Vec<String>,

    /// Bare-specifier alias, `prefix=path`. Repeatable; the longest
    /// matching prefix wins.
    #[arg(long, value_parser = parse_alias)]
    alias: Vec<(String, String)>,
}

fn parse_alias(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(prefix, target)| (prefix.to_string(), target.to_string()))
        .ok_or_else(|| format!("expected prefix=path, got '{s}'"))
}

/// Resolver over a fixed alias table: longest matching prefix wins,
/// unknown specifiers stay unresolved.
struct AliasResolver {
    aliases: Vec<(String, String)>,
}

#[async_trait]
impl SpecifierResolver for AliasResolver {
    async fn resolve(
        &self,
        specifier: &str,
        _importer: Option<&str>,
        _opts: &ResolveOptions,
    ) -> Option<String> {
        self.aliases
            .iter()
            .filter(|(prefix, _)| specifier.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, target)| format!("{}{}", target, &specifier[prefix.len()..]))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("hotglob=info".parse()?))
        .init();

    let cli = Cli::parse();

    let root = tokio::fs::canonicalize(&cli.root)
        .await
        .with_context(|| format!("root '{}' not found", cli.root.display()))?;
    let root_str = slash(&root.to_string_lossy());

    let files = if cli.paths.is_empty() {
        collect_sources(&root, &cli.extensions).await
    } else {
        let mut files = Vec::new();
        for path in &cli.paths {
            let path = tokio::fs::canonicalize(path)
                .await
                .with_context(|| format!("file '{}' not found", path.display()))?;
            files.push(path);
        }
        files
    };
    debug!(root = %root_str, files = files.len(), "scanning source units");

    let resolver = AliasResolver { aliases: cli.alias };
    let fs = LocalFs;
    let write = cli.write || cli.sourcemap;
    let mut error_count = 0usize;

    for file in files {
        let id = slash(&file.to_string_lossy());
        if id.contains("/node_modules/") {
            continue;
        }
        let code = match tokio::fs::read_to_string(&file).await {
            Ok(code) => code,
            Err(err) => {
                warn!(file = %id, %err, "skipping unreadable file");
                continue;
            }
        };
        // cheap gate before the real scan
        if !code.contains("import.meta.hot") {
            continue;
        }

        let ctx = TransformContext {
            root: root_str.clone(),
            resolver: &resolver,
            fs: &fs,
            want_map: cli.sourcemap,
        };
        let result = transform_unit(&code, &id, &ctx).await;

        for diagnostic in &result.diagnostics {
            eprintln!("{}: {}", id, diagnostic.format(&code));
            error_count += 1;
        }

        let Some(output) = result.output else {
            continue;
        };
        if write {
            tokio::fs::write(&file, &output.code)
                .await
                .with_context(|| format!("writing '{id}'"))?;
            info!(file = %id, "rewrote glob-accept call sites");
            if let Some(map) = output.map {
                let map_path = PathBuf::from(format!("{}.map.json", file.display()));
                let json = serde_json::to_vec_pretty(&map).context("serializing offset map")?;
                tokio::fs::write(&map_path, json)
                    .await
                    .with_context(|| format!("writing '{}'", map_path.display()))?;
            }
        } else {
            print!("{}", output.code);
        }
    }

    if error_count > 0 {
        bail!("{error_count} error(s) while transforming");
    }
    Ok(())
}

/// All files under the root with one of the wanted extensions. Hidden
/// entries and dependency directories are already excluded by the walker.
async fn collect_sources(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    FileWalker::new(&LocalFs, root)
        .collect()
        .await
        .into_iter()
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| extensions.iter().any(|e| e.as_str() == ext))
        })
        .collect()
}
