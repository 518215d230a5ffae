//! Glob resolution: raw glob + importer + project root → absolute glob.
//!
//! Each raw glob is classified by prefix and turned into an absolute,
//! filesystem-scannable glob. Base directories (project root, importer
//! dir) get glob-special characters escaped before joining so a path like
//! `/builds/app(v2)` never reads as glob syntax, while the user's glob
//! suffix keeps its wildcards live.

use async_trait::async_trait;

use crate::error::TransformError;
use crate::paths::{dirname, join, slash};

/// Options forwarded to the external resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// The specifier is a `#`-prefixed sub-path-imports pattern containing
    /// a wildcard, resolved via package-export-map rules.
    pub sub_path_imports: bool,
}

/// External specifier resolver.
///
/// Only consulted for bare-specifier and sub-path-imports globs; returns
/// the resolved absolute path, or `None` when the specifier is unknown.
#[async_trait]
pub trait SpecifierResolver: Send + Sync {
    async fn resolve(
        &self,
        specifier: &str,
        importer: Option<&str>,
        opts: &ResolveOptions,
    ) -> Option<String>;
}

/// A resolver that resolves nothing. Bare-specifier globs fail against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

#[async_trait]
impl SpecifierResolver for NullResolver {
    async fn resolve(&self, _: &str, _: Option<&str>, _: &ResolveOptions) -> Option<String> {
        None
    }
}

/// Escape glob-special characters in a path so it only ever matches
/// itself. Backslashes are normalized to forward slashes first, so no
/// double-escape can occur.
pub fn escape_glob_path(path: &str) -> String {
    let path = slash(path);
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(
            c,
            '*' | '?' | '[' | ']' | '{' | '}' | '(' | ')' | '!' | '+' | '@' | '|'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape the static part of a resolved bare-specifier path while keeping
/// the user-supplied glob suffix live.
///
/// The split point comes from walking both strings backwards until the
/// first differing character: the shared suffix is the dynamic part the
/// user wrote, everything before it is resolver output and gets escaped.
/// The suffix walk is greedy; a different split would change which
/// characters get escaped and break working glob patterns.
pub fn glob_safe_resolved_path(resolved: &str, raw_glob: &str) -> String {
    let mut equal_bytes = 0usize;
    let mut r = resolved.chars().rev();
    let mut g = raw_glob.chars().rev();
    loop {
        match (r.next(), g.next()) {
            (Some(a), Some(b)) if a == b => equal_bytes += a.len_utf8(),
            _ => break,
        }
    }
    let static_end = resolved.len() - equal_bytes;
    format!(
        "{}{}",
        escape_glob_path(&resolved[..static_end]),
        &resolved[static_end..]
    )
}

/// Resolve one raw glob into an absolute glob, preserving `!` polarity.
///
/// `pos` is the call-site offset carried into any error.
pub async fn to_absolute_glob(
    raw: &str,
    root: &str,
    importer: Option<&str>,
    resolver: &dyn SpecifierResolver,
    pos: usize,
) -> Result<String, TransformError> {
    let mut glob = raw;
    let mut bangs = 0usize;
    while let Some(rest) = glob.strip_prefix('!') {
        bangs += 1;
        glob = rest;
    }
    let pre = "!".repeat(bangs);

    let root = escape_glob_path(root);
    let dir = importer.map(|i| escape_glob_path(dirname(i)));

    if let Some(rest) = glob.strip_prefix('/') {
        return Ok(format!("{}{}", pre, join(&root, rest)));
    }
    if let Some(rest) = glob.strip_prefix("./") {
        let dir = dir.ok_or(TransformError::VirtualModuleRelativeGlob { pos })?;
        return Ok(format!("{}{}", pre, join(&dir, rest)));
    }
    if glob.starts_with("../") {
        let dir = dir.ok_or(TransformError::VirtualModuleRelativeGlob { pos })?;
        return Ok(format!("{}{}", pre, join(&dir, glob)));
    }
    if glob.starts_with("**") {
        // already anchorless
        return Ok(format!("{}{}", pre, glob));
    }

    let opts = ResolveOptions {
        sub_path_imports: glob.starts_with('#') && glob.contains('*'),
    };
    let resolved = resolver
        .resolve(glob, importer, &opts)
        .await
        .unwrap_or_else(|| glob.to_string());
    let resolved = slash(&resolved);
    if resolved.starts_with('/') {
        return Ok(format!("{}{}", pre, glob_safe_resolved_path(&resolved, glob)));
    }

    Err(TransformError::UnresolvableGlob {
        pos,
        glob: glob.to_string(),
        resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Resolver over a fixed table, recording the options it saw.
    struct TableResolver {
        table: HashMap<String, String>,
        seen_sub_path: Mutex<Vec<bool>>,
    }

    impl TableResolver {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                seen_sub_path: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SpecifierResolver for TableResolver {
        async fn resolve(
            &self,
            specifier: &str,
            _importer: Option<&str>,
            opts: &ResolveOptions,
        ) -> Option<String> {
            self.seen_sub_path.lock().unwrap().push(opts.sub_path_imports);
            self.table.get(specifier).cloned()
        }
    }

    const IMPORTER: Option<&str> = Some("/proj/src/app.ts");

    async fn resolve(raw: &str, importer: Option<&str>) -> Result<String, TransformError> {
        to_absolute_glob(raw, "/proj", importer, &NullResolver, 0).await
    }

    #[tokio::test]
    async fn root_relative() {
        assert_eq!(resolve("/pages/*.ts", IMPORTER).await.unwrap(), "/proj/pages/*.ts");
        // works without an importer too
        assert_eq!(resolve("/pages/*.ts", None).await.unwrap(), "/proj/pages/*.ts");
    }

    #[tokio::test]
    async fn dot_relative() {
        assert_eq!(
            resolve("./pages/*.ts", IMPORTER).await.unwrap(),
            "/proj/src/pages/*.ts"
        );
    }

    #[tokio::test]
    async fn parent_relative() {
        assert_eq!(
            resolve("../shared/*.ts", IMPORTER).await.unwrap(),
            "/proj/shared/*.ts"
        );
    }

    #[tokio::test]
    async fn negation_preserved() {
        assert_eq!(
            resolve("!./pages/*.test.ts", IMPORTER).await.unwrap(),
            "!/proj/src/pages/*.test.ts"
        );
        assert_eq!(resolve("!/x/*.ts", None).await.unwrap(), "!/proj/x/*.ts");
    }

    #[tokio::test]
    async fn anchorless_globstar_passthrough() {
        assert_eq!(resolve("**/*.ts", IMPORTER).await.unwrap(), "**/*.ts");
        assert_eq!(resolve("!**/*.test.ts", IMPORTER).await.unwrap(), "!**/*.test.ts");
    }

    #[tokio::test]
    async fn relative_globs_need_a_real_importer() {
        for raw in ["./pages/*.ts", "../shared/*.ts", "!./pages/*.ts"] {
            match resolve(raw, None).await {
                Err(TransformError::VirtualModuleRelativeGlob { .. }) => {}
                other => panic!("expected VirtualModuleRelativeGlob for {raw}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn bare_specifier_through_resolver() {
        let resolver = TableResolver::new(&[(
            "widgets/dist/*.ts",
            "/proj/node_modules/widgets/dist/*.ts",
        )]);
        let result = to_absolute_glob("widgets/dist/*.ts", "/proj", IMPORTER, &resolver, 0)
            .await
            .unwrap();
        assert_eq!(result, "/proj/node_modules/widgets/dist/*.ts");
        assert_eq!(*resolver.seen_sub_path.lock().unwrap(), vec![false]);
    }

    #[tokio::test]
    async fn sub_path_imports_flag() {
        let resolver = TableResolver::new(&[("#views/*", "/proj/src/views/*")]);
        let result = to_absolute_glob("#views/*", "/proj", IMPORTER, &resolver, 0)
            .await
            .unwrap();
        assert_eq!(result, "/proj/src/views/*");
        assert_eq!(*resolver.seen_sub_path.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn unresolvable_bare_specifier() {
        match resolve("unknown-pkg/*.ts", IMPORTER).await {
            Err(TransformError::UnresolvableGlob { glob, resolved, .. }) => {
                assert_eq!(glob, "unknown-pkg/*.ts");
                assert_eq!(resolved, "unknown-pkg/*.ts");
            }
            other => panic!("expected UnresolvableGlob, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn special_characters_in_root_are_escaped() {
        let result = to_absolute_glob("/pages/*.ts", "/builds/app(v2)", None, &NullResolver, 0)
            .await
            .unwrap();
        assert_eq!(result, r"/builds/app\(v2\)/pages/*.ts");
    }

    #[tokio::test]
    async fn special_characters_in_importer_dir_are_escaped() {
        let result = to_absolute_glob(
            "./pages/*.ts",
            "/proj",
            Some("/proj/src[new]/app.ts"),
            &NullResolver,
            0,
        )
        .await
        .unwrap();
        assert_eq!(result, r"/proj/src\[new\]/pages/*.ts");
    }

    #[test]
    fn resolved_path_escape_keeps_glob_suffix() {
        // resolver output with brackets, user glob suffix with a wildcard
        let safe = glob_safe_resolved_path("/deps/lib[x]/dist/*.ts", "lib[x]/dist/*.ts");
        // the shared suffix stays live, the leading resolver part is escaped
        assert!(safe.ends_with("lib[x]/dist/*.ts"));
        assert!(!safe[..safe.len() - "lib[x]/dist/*.ts".len()].contains('['));

        let safe = glob_safe_resolved_path("/deps/pkg(a)/dist/*.ts", "pkg/dist/*.ts");
        assert!(safe.contains(r"\(a\)") || safe.contains("(a)"));
        assert!(safe.ends_with("/dist/*.ts"));
    }

    #[test]
    fn escape_set() {
        assert_eq!(escape_glob_path("/a/b"), "/a/b");
        assert_eq!(escape_glob_path("/a(1)/b[2]"), r"/a\(1\)/b\[2\]");
        assert_eq!(escape_glob_path(r"C:\x\y"), "C:/x/y");
    }
}
