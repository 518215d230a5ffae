//! Transform orchestration.
//!
//! One logical transform call per source unit; nothing persists across
//! calls. Call-sites are processed concurrently — each touches disjoint
//! text ranges and an independently scoped filesystem subtree — and their
//! edits merge into the shared buffer only after the concurrent phase
//! joins. Project root and resolver travel in an explicit context; there
//! is no process-global state.

use futures::future::{join_all, try_join_all};
use hotglob_glob::WalkerFs;
use tracing::{debug, trace, warn};

use crate::diagnostic::Diagnostic;
use crate::emit::{callback_adapter_text, glob_array_text, Edit, EditBuffer, OffsetMap};
use crate::error::TransformError;
use crate::mask::mask_literals;
use crate::matcher::{build_patterns, common_base, match_files};
use crate::parser::{parse_call_site, Classified};
use crate::paths::{dirname, is_virtual_module, slash};
use crate::resolve::{to_absolute_glob, SpecifierResolver};
use crate::scanner::{scan_call_sites, CallSiteMatch};
use crate::specifier::build_specifier;

/// Per-invocation transform context. Passed explicitly into every call;
/// nothing here outlives one source unit's processing.
pub struct TransformContext<'a, F: WalkerFs> {
    /// Absolute, slash-normalized project root.
    pub root: String,
    /// External resolver for bare-specifier and sub-path-imports globs.
    pub resolver: &'a dyn SpecifierResolver,
    /// Filesystem the matcher expands globs against.
    pub fs: &'a F,
    /// Generate an offset map alongside the rewritten text.
    pub want_map: bool,
}

/// Rewritten text plus the optional offset map.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<OffsetMap>,
}

/// Result of transforming one source unit.
///
/// `output` is `None` when the unit needed no rewriting (no call-sites, or
/// none that were ours). Diagnostics never abort sibling call-sites; the
/// host decides whether they fail the unit.
#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub output: Option<TransformOutput>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Transform one source unit.
pub async fn transform_unit<F: WalkerFs>(
    code: &str,
    id: &str,
    ctx: &TransformContext<'_, F>,
) -> TransformResult {
    let id = slash(id);
    let root = slash(&ctx.root);

    let Some(masked) = mask_literals(code) else {
        // unparsable units are out of scope, not an error
        warn!(id = %id, "unit could not be lexed; skipping");
        return TransformResult::default();
    };

    let sites = scan_call_sites(&masked);
    if sites.is_empty() {
        return TransformResult::default();
    }
    debug!(id = %id, sites = sites.len(), "expanding glob-accept call sites");

    let importer = if is_virtual_module(&id) {
        None
    } else {
        Some(id.as_str())
    };
    let importer_dir = importer.map(|i| dirname(i).to_string());

    let results = join_all(sites.into_iter().map(|site| {
        process_site(site, code, &root, importer, importer_dir.as_deref(), ctx)
    }))
    .await;

    let mut buffer = EditBuffer::new(code);
    let mut diagnostics = Vec::new();
    for result in results {
        match result {
            Ok(Some(edits)) => {
                for edit in edits {
                    buffer.push(edit);
                }
            }
            Ok(None) => {}
            Err(err) => diagnostics.push(Diagnostic::from_error(&err)),
        }
    }

    if buffer.is_empty() {
        return TransformResult {
            output: None,
            diagnostics,
        };
    }

    let (rewritten, map) = buffer.apply(ctx.want_map);
    TransformResult {
        output: Some(TransformOutput {
            code: rewritten,
            map,
        }),
        diagnostics,
    }
}

/// Process one call-site end to end: classify, resolve, expand, build
/// specifiers, and compute its text edits.
async fn process_site<F: WalkerFs>(
    site: Result<CallSiteMatch, TransformError>,
    code: &str,
    root: &str,
    importer: Option<&str>,
    importer_dir: Option<&str>,
    ctx: &TransformContext<'_, F>,
) -> Result<Option<Vec<Edit>>, TransformError> {
    let site = site?;
    let descriptor = match parse_call_site(code, site)? {
        Classified::NotOurs => return Ok(None),
        Classified::Valid(descriptor) => descriptor,
    };

    let resolved = try_join_all(
        descriptor
            .raw_globs
            .iter()
            .map(|glob| to_absolute_glob(glob, root, importer, ctx.resolver, site.start)),
    )
    .await?;
    trace!(site = site.start, globs = ?resolved, "resolved globs");

    let patterns = build_patterns(&resolved, site.start)?;
    let cwd = common_base(&patterns).unwrap_or_else(|| root.to_string());
    let files = match_files(&patterns, &cwd, importer, ctx.fs).await;
    trace!(site = site.start, files = files.len(), cwd = %cwd, "matched files");

    let specifiers = files
        .iter()
        .map(|file| {
            build_specifier(
                file,
                importer_dir,
                root,
                descriptor.is_relative_style,
                site.start,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut edits = vec![Edit {
        start: descriptor.arg_start,
        end: descriptor.arg_end,
        text: glob_array_text(&specifiers),
    }];
    if let Some(callback) = descriptor.callback {
        let original = &code[callback.start..callback.end];
        edits.push(Edit {
            start: callback.spread_start.unwrap_or(callback.start),
            end: callback.end,
            text: callback_adapter_text(original, callback.spread_start.is_some(), &specifiers),
        });
    }
    Ok(Some(edits))
}
