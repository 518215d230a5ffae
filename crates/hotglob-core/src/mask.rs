//! Literal-masking pre-pass.
//!
//! Structural scanning (finding call sites and their balanced closing
//! parentheses) must not be confused by glob-like text or stray brackets
//! inside strings, templates, or comments. This pass blanks literal
//! contents with spaces while keeping byte length, newlines, and every
//! structural delimiter outside literals intact — including the `${ … }`
//! interpolation structure of template literals, which is real code.

/// Mask string/template/comment contents in `code`.
///
/// Returns a same-length string, or `None` when the text cannot be lexed
/// (unterminated string, template, or block comment, or a raw newline in
/// a quoted string). Callers treat `None` as "no call sites found".
pub fn mask_literals(code: &str) -> Option<String> {
    let bytes = code.as_bytes();
    let mut out = bytes.to_vec();

    #[derive(PartialEq, Eq, Clone, Copy)]
    enum Mode {
        Code,
        LineComment,
        BlockComment,
        Single,
        Double,
        Template,
    }
    use Mode::*;

    let mut mode = Code;
    // Open template interpolations; each entry counts braces nested inside.
    let mut interp: Vec<u32> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match mode {
            Code => match b {
                b'"' => mode = Double,
                b'\'' => mode = Single,
                b'`' => mode = Template,
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    mode = LineComment;
                    i += 1;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    mode = BlockComment;
                    i += 1;
                }
                b'{' => {
                    if let Some(depth) = interp.last_mut() {
                        *depth += 1;
                    }
                }
                b'}' => {
                    if let Some(depth) = interp.last_mut() {
                        if *depth == 0 {
                            interp.pop();
                            mode = Template;
                        } else {
                            *depth -= 1;
                        }
                    }
                }
                _ => {}
            },
            LineComment => {
                if b == b'\n' {
                    mode = Code;
                } else {
                    out[i] = b' ';
                }
            }
            BlockComment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    mode = Code;
                    i += 1;
                } else if b != b'\n' {
                    out[i] = b' ';
                }
            }
            Single | Double => {
                let quote = if mode == Single { b'\'' } else { b'"' };
                if b == b'\\' {
                    out[i] = b' ';
                    if let Some(&next) = bytes.get(i + 1) {
                        if next != b'\n' && next != b'\r' {
                            out[i + 1] = b' ';
                        }
                        i += 1;
                    }
                } else if b == quote {
                    mode = Code;
                } else if b == b'\n' {
                    // raw newline in a quoted string: not lexable
                    return None;
                } else {
                    out[i] = b' ';
                }
            }
            Template => {
                if b == b'\\' {
                    out[i] = b' ';
                    if let Some(&next) = bytes.get(i + 1) {
                        if next != b'\n' && next != b'\r' {
                            out[i + 1] = b' ';
                        }
                        i += 1;
                    }
                } else if b == b'`' {
                    mode = Code;
                } else if b == b'$' && bytes.get(i + 1) == Some(&b'{') {
                    // interpolation: structural, stays visible
                    interp.push(0);
                    mode = Code;
                    i += 1;
                } else if b != b'\n' {
                    out[i] = b' ';
                }
            }
        }
        i += 1;
    }

    let terminated = matches!(mode, Code | LineComment) && interp.is_empty();
    if !terminated {
        return None;
    }
    String::from_utf8(out).ok()
}
