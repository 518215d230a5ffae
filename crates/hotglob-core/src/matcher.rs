//! Filesystem expansion of resolved globs.
//!
//! Computes the common scan base for a call-site's patterns, walks the
//! filesystem once under it, and keeps files matched by at least one
//! positive pattern and no negative pattern. Dependency directories are
//! excluded by the walker, and the importing file never matches itself.

use hotglob_glob::{FileWalker, GlobPattern, WalkerFs};

use crate::error::TransformError;
use crate::paths::slash;

/// Parse resolved glob strings into patterns, carrying the call-site
/// offset into any failure.
pub fn build_patterns(resolved: &[String], pos: usize) -> Result<Vec<GlobPattern>, TransformError> {
    resolved
        .iter()
        .map(|g| {
            GlobPattern::parse(g).map_err(|e| TransformError::InvalidGlobValue {
                pos,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Longest shared ancestor across the positive patterns' scan roots.
///
/// Built candidate-by-candidate from the first root's segments, each
/// checked as a plain string prefix against every root. Returns `/` when
/// nothing is shared and `None` when there are no positive patterns at
/// all.
pub fn common_base(patterns: &[GlobPattern]) -> Option<String> {
    let bases: Vec<String> = patterns
        .iter()
        .filter(|p| !p.is_negated())
        .map(|p| p.scan_root())
        .collect();
    if bases.is_empty() {
        return None;
    }

    let mut common = String::new();
    let first: Vec<&str> = bases[0].split('/').collect();
    for i in 0..first.len() {
        let candidate = first[..=i].join("/");
        if bases.iter().all(|b| b.starts_with(&candidate)) {
            common = candidate;
        } else {
            break;
        }
    }
    if common.is_empty() {
        common = "/".to_string();
    }
    Some(common)
}

/// Expand patterns against the filesystem under `cwd`.
///
/// Returns absolute slash paths, lexicographically sorted, minus the
/// importer's own path. Deterministic for a fixed filesystem snapshot.
pub async fn match_files<F: WalkerFs>(
    patterns: &[GlobPattern],
    cwd: &str,
    importer: Option<&str>,
    fs: &F,
) -> Vec<String> {
    let files = FileWalker::new(fs, cwd).collect().await;

    let mut matched: Vec<String> = files
        .into_iter()
        .map(|p| slash(&p.to_string_lossy()))
        .filter(|f| {
            patterns.iter().any(|p| !p.is_negated() && p.matches(f))
                && !patterns.iter().any(|p| p.is_negated() && p.matches(f))
        })
        .filter(|f| importer != Some(f.as_str()))
        .collect();
    matched.sort();
    matched
}
