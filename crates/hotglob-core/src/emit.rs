//! Rewrite emission: offset-based text splicing.
//!
//! All rewrites are `(start, end, replacement)` triples against the
//! original buffer; the surrounding formatting, comments, and code are
//! never regenerated. Edit ranges across call-sites are disjoint by
//! construction (each comes from a distinct call-site slice and its own
//! argument/callback sub-ranges), so edits compose without conflict.

use serde::Serialize;

/// One text replacement keyed by original byte offsets. `start == end`
/// is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Mapping from original offsets to rewritten offsets, with one entry at
/// every edit boundary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OffsetMap {
    pub mappings: Vec<Mapping>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub original: usize,
    pub generated: usize,
}

impl OffsetMap {
    /// Map an original offset into the rewritten text. Offsets inside a
    /// replaced range map to the start of the replacement.
    pub fn map_offset(&self, original: usize) -> usize {
        match self
            .mappings
            .iter()
            .rev()
            .find(|m| m.original <= original)
        {
            Some(m) => m.generated + (original - m.original),
            None => original,
        }
    }
}

/// Accumulates disjoint edits against one source buffer and applies them
/// in a single pass.
#[derive(Debug)]
pub struct EditBuffer<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> EditBuffer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Splice all edits into a fresh string. With `want_map`, also derive
    /// the offset map from original to rewritten positions.
    pub fn apply(mut self, want_map: bool) -> (String, Option<OffsetMap>) {
        self.edits.sort_by_key(|e| (e.start, e.end));
        debug_assert!(
            self.edits.windows(2).all(|w| w[0].end <= w[1].start),
            "edit ranges must be disjoint"
        );

        let mut out = String::with_capacity(self.source.len());
        let mut mappings = Vec::new();
        let mut cursor = 0usize;
        for edit in &self.edits {
            out.push_str(&self.source[cursor..edit.start]);
            if want_map {
                mappings.push(Mapping {
                    original: edit.start,
                    generated: out.len(),
                });
            }
            out.push_str(&edit.text);
            if want_map {
                mappings.push(Mapping {
                    original: edit.end,
                    generated: out.len(),
                });
            }
            cursor = edit.end;
        }
        out.push_str(&self.source[cursor..]);

        (out, if want_map { Some(OffsetMap { mappings }) } else { None })
    }
}

/// Literal array-of-strings expression for the rewritten glob argument.
pub fn glob_array_text(specifiers: &[String]) -> String {
    let quoted: Vec<String> = specifiers.iter().map(|s| quote(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Adapter function replacing the original callback.
///
/// The generated function receives the positional module array, binds the
/// effective callback (first element of the spread array, or the original
/// expression), builds a record keyed by specifier in emission order, and
/// forwards it — tolerating an absent callback and preserving the original
/// call-time `this`.
pub fn callback_adapter_text(original: &str, spread: bool, specifiers: &[String]) -> String {
    let mut text = String::with_capacity(original.len() + 64);
    if spread {
        // only the first element of the spread array is the callback
        text.push_str("function (m) {\nconst [cb] = ");
        text.push_str(original);
        text.push_str(";\n");
    } else {
        text.push_str("function (m) {\nconst cb = (");
        text.push_str(original);
        text.push_str(");\n");
    }
    text.push_str("const mn = {");
    for (i, spec) in specifiers.iter().enumerate() {
        text.push_str(&quote(spec));
        text.push_str(&format!(": m[{}], ", i));
    }
    text.push_str("};\n");
    text.push_str("cb?.call(this, mn);\n}");
    text
}

/// JSON-style string quoting for generated source.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
