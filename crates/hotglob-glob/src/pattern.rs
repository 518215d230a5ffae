//! Path-aware glob patterns with globstar (`**`) and polarity.
//!
//! A [`GlobPattern`] is parsed from a resolved glob string — usually an
//! absolute, slash-normalized path whose static prefix has glob-special
//! characters escaped. Patterns that start with `!` are negative: they
//! never produce matches themselves, they only narrow what other patterns
//! matched.
//!
//! - `/src/pages/*.ts` matches `/src/pages/a.ts`, not `/src/pages/x/a.ts`
//! - `/src/**/*.ts` matches at any depth under `/src`
//! - `!/src/**/*.test.ts` excludes test files from sibling matches

use crate::glob::{glob_match, has_unescaped_special, unescape};
use thiserror::Error;

/// Errors when parsing glob patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("empty glob pattern")]
    Empty,
}

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    /// Fixed directory or file name, stored unescaped: `src`, `data[0]`.
    Literal(String),
    /// Component with live wildcards: `*.ts`, `v?`, `[ab]`.
    Wild(String),
    /// `**`: matches zero or more path components.
    Globstar,
}

/// A parsed glob pattern over slash-separated paths.
///
/// # Examples
/// ```
/// use hotglob_glob::GlobPattern;
///
/// let pat = GlobPattern::parse("/src/**/*.ts").unwrap();
/// assert!(pat.matches("/src/a.ts"));
/// assert!(pat.matches("/src/pages/deep/b.ts"));
/// assert!(!pat.matches("/lib/a.ts"));
/// assert_eq!(pat.scan_root(), "/src");
/// ```
#[derive(Debug, Clone)]
pub struct GlobPattern {
    negated: bool,
    anchored: bool,
    segments: Vec<Segment>,
}

impl GlobPattern {
    /// Parse a resolved glob string.
    ///
    /// Leading `!` marks the pattern negative. A leading `/` anchors it to
    /// the filesystem root; unanchored patterns are only meaningful when
    /// they begin with `**`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let negated = raw.starts_with('!');
        let body = raw.trim_start_matches('!');
        let (body, anchored) = match body.strip_prefix('/') {
            Some(rest) => (rest, true),
            None => (body, false),
        };

        let mut segments = Vec::new();
        for part in body.split('/') {
            if part.is_empty() {
                continue;
            }
            if part == "**" {
                // Runs of globstars collapse to one.
                if !matches!(segments.last(), Some(Segment::Globstar)) {
                    segments.push(Segment::Globstar);
                }
            } else if has_unescaped_special(part) {
                segments.push(Segment::Wild(part.to_string()));
            } else {
                segments.push(Segment::Literal(unescape(part)));
            }
        }

        if segments.is_empty() && !anchored {
            return Err(PatternError::Empty);
        }
        Ok(Self {
            negated,
            anchored,
            segments,
        })
    }

    /// True if this is a `!`-prefixed exclusion pattern.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// True if any segment is `**`.
    pub fn has_globstar(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Globstar))
    }

    /// Number of path components a match must have, when the pattern has
    /// no globstar. Lets a walker stop descending past useful depth.
    pub fn fixed_depth(&self) -> Option<usize> {
        if self.has_globstar() {
            None
        } else {
            Some(self.segments.len())
        }
    }

    /// Check a slash-separated path against this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        self.match_segments(0, &components, 0)
    }

    /// The deepest directory guaranteed to contain every match: the run of
    /// leading literal segments. A final component that looks like a file
    /// name (contains a `.`) falls back to its parent directory.
    ///
    /// Returns an unescaped real path; `/` when an anchored pattern has no
    /// static prefix, and `""` for unanchored patterns.
    pub fn scan_root(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => parts.push(s),
                _ => break,
            }
        }
        if let Some(last) = parts.last() {
            if last.contains('.') {
                parts.pop();
            }
        }
        let joined = parts.join("/");
        if self.anchored {
            format!("/{}", joined)
        } else {
            joined
        }
    }

    fn match_segments(&self, si: usize, components: &[&str], ci: usize) -> bool {
        if si >= self.segments.len() {
            return ci >= components.len();
        }

        match &self.segments[si] {
            Segment::Globstar => {
                // Zero or more components, with backtracking.
                (ci..=components.len()).any(|skip| self.match_segments(si + 1, components, skip))
            }
            Segment::Literal(lit) => {
                ci < components.len()
                    && components[ci] == lit
                    && self.match_segments(si + 1, components, ci + 1)
            }
            Segment::Wild(pat) => {
                ci < components.len()
                    && glob_match(pat, components[ci])
                    && self.match_segments(si + 1, components, ci + 1)
            }
        }
    }
}
