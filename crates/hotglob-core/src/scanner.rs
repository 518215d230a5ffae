//! Call-site scanner.
//!
//! Finds every occurrence of the glob-accept pattern in the masked text
//! and locates each call's balanced closing parenthesis. Offsets refer to
//! the original text (masking preserves byte positions).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TransformError;

/// One detected call expression: `[start, end)` byte offsets, where `end`
/// is one past the closing parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSiteMatch {
    pub start: usize,
    pub end: usize,
}

/// The glob-accept surface pattern, each `.` optionally null-guarded.
static ACCEPT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bimport\??\.meta\??\.hot\??\.accept\s*\(").expect("static pattern is valid")
});

/// Scan masked text for glob-accept call sites.
///
/// Each occurrence yields either its full span or a
/// [`TransformError::MalformedCall`] carrying the start offset, so one
/// unterminated call never hides its siblings.
pub fn scan_call_sites(masked: &str) -> Vec<Result<CallSiteMatch, TransformError>> {
    ACCEPT_CALL
        .find_iter(masked)
        .map(|m| match find_closing_paren(masked, m.end()) {
            Some(close) => Ok(CallSiteMatch {
                start: m.start(),
                end: close + 1,
            }),
            None => Err(TransformError::MalformedCall {
                pos: m.start(),
                reason: "close parenthesis not found".into(),
            }),
        })
        .collect()
}

/// Find the closing parenthesis balancing the one just before `open_end`.
///
/// Fast path: when no `(` appears before the next `)`, that `)` closes the
/// call. Otherwise a single depth counter runs from the opening position:
/// `(` and `{` increment, `)` and `}` decrement, and the scan ends where
/// depth reaches zero. Braces count as pseudo-parens so object and array
/// literals inside the argument list cannot terminate the scan early;
/// masking has already removed any literal contents that could unbalance
/// the count.
fn find_closing_paren(masked: &str, open_end: usize) -> Option<usize> {
    let rest = &masked[open_end..];
    let first_close = rest.find(')')?;
    if !rest[..first_close].contains('(') {
        return Some(open_end + first_close);
    }

    let mut depth = 1i32;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'(' | b'{' => depth += 1,
            b')' | b'}' => {
                depth -= 1;
                if depth <= 0 {
                    return Some(open_end + i);
                }
            }
            _ => {}
        }
    }
    None
}
