//! Diagnostics with source locations.
//!
//! Transform errors are surfaced as compile-time diagnostics pointing at
//! the offending call-site. They are always errors: a silently-wrong
//! specifier list would produce confusing missing-module failures
//! downstream, so nothing here is ever downgraded to a warning.

use std::fmt;

use crate::error::TransformError;

/// Categorizes diagnostics for filtering and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unbalanced delimiters or exhausted parse budget.
    MalformedCall,
    /// Statement was not the expected call expression.
    InvalidCallShape,
    /// `glob` property present but malformed.
    InvalidGlobValue,
    /// Relative glob in a virtual module.
    VirtualModuleRelativeGlob,
    /// Bare specifier resolved to a non-absolute path.
    UnresolvableGlob,
}

impl ErrorCode {
    /// Returns a short code string for the diagnostic.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedCall => "E001",
            ErrorCode::InvalidCallShape => "E002",
            ErrorCode::InvalidGlobValue => "E003",
            ErrorCode::VirtualModuleRelativeGlob => "E004",
            ErrorCode::UnresolvableGlob => "E005",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Source location span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset in source.
    pub start: usize,
    /// End byte offset in source.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Convert byte offset to line:column, both 1-indexed.
    pub fn to_line_col(&self, source: &str) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for (i, ch) in source.char_indices() {
            if i >= self.start {
                break;
            }
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// Format span as a "line:col" string.
    pub fn format_location(&self, source: &str) -> String {
        let (line, col) = self.to_line_col(source);
        format!("{}:{}", line, col)
    }
}

/// A diagnostic produced while transforming one source unit.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Category code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the offending call-site.
    pub span: Span,
}

impl Diagnostic {
    /// Build a diagnostic from a transform error.
    pub fn from_error(err: &TransformError) -> Self {
        let code = match err {
            TransformError::MalformedCall { .. } => ErrorCode::MalformedCall,
            TransformError::InvalidCallShape { .. } => ErrorCode::InvalidCallShape,
            TransformError::InvalidGlobValue { .. } => ErrorCode::InvalidGlobValue,
            TransformError::VirtualModuleRelativeGlob { .. } => ErrorCode::VirtualModuleRelativeGlob,
            TransformError::UnresolvableGlob { .. } => ErrorCode::UnresolvableGlob,
        };
        Self {
            code,
            message: err.to_string(),
            span: Span::new(err.pos(), err.pos()),
        }
    }

    /// Format the diagnostic for display, with line:column information and
    /// the offending source line.
    pub fn format(&self, source: &str) -> String {
        let mut result = format!(
            "{}: error [{}]: {}",
            self.span.format_location(source),
            self.code,
            self.message
        );
        if let Some(line) = line_at_offset(source, self.span.start) {
            result.push_str(&format!("\n  | {}", line));
        }
        result
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)
    }
}

/// Get the line containing a byte offset.
fn line_at_offset(source: &str, offset: usize) -> Option<&str> {
    if offset >= source.len() {
        return None;
    }
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    Some(&source[start..end])
}
