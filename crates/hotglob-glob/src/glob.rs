//! Single-component glob matching.
//!
//! Matches one path component against one pattern component:
//! - `*` matches zero or more characters
//! - `?` matches exactly one character
//! - `[abc]` matches any character in the set
//! - `[a-z]` matches any character in the range
//! - `[!abc]` or `[^abc]` matches any character NOT in the set
//! - `{a,b}` brace alternation (matches any of the alternatives)
//! - `\x` matches `x` literally, whatever `x` is
//!
//! Escapes matter here: resolved glob patterns escape glob-special
//! characters in their static prefix, so `\[` must match a literal `[`
//! and an escaped `\{` must not open a brace group.

/// Match a string against a glob pattern.
///
/// Returns true if the pattern matches the entire input.
///
/// # Examples
/// ```
/// use hotglob_glob::glob_match;
///
/// assert!(glob_match("*.ts", "page.ts"));
/// assert!(glob_match("file-?", "file-a"));
/// assert!(glob_match("*.{ts,tsx}", "app.tsx"));
/// assert!(glob_match(r"data\[0\].ts", "data[0].ts"));
/// assert!(!glob_match("*.ts", "page.js"));
/// ```
pub fn glob_match(pattern: &str, input: &str) -> bool {
    let inp: Vec<char> = input.chars().collect();
    expand_braces(pattern).iter().any(|alt| {
        let pat: Vec<char> = alt.chars().collect();
        match_from(&pat, 0, &inp, 0)
    })
}

/// True if the string contains an unescaped glob-special character.
///
/// Used to decide whether a pattern segment is a plain literal (compare
/// after [`unescape`]) or needs full matching.
pub fn has_unescaped_special(s: &str) -> bool {
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' | '[' | '{' => return true,
            _ => {}
        }
    }
    false
}

/// Remove escape backslashes: each `\x` becomes `x`.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Expand brace alternation into the list of concrete patterns.
///
/// `x{a,b}y` becomes `xay`, `xby`. Nested groups expand recursively.
/// Escaped braces (`\{`) stay literal. A pattern without braces expands
/// to itself.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let chars: Vec<char> = pattern.chars().collect();

    // Locate the first unescaped top-level brace group.
    let mut depth = 0usize;
    let mut open = None;
    let mut close = None;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => {
                if depth == 0 {
                    open = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    let (open, close) = match (open, close) {
        (Some(o), Some(c)) => (o, c),
        // No group (or an unclosed one, which stays literal).
        _ => return vec![pattern.to_string()],
    };

    let prefix: String = chars[..open].iter().collect();
    let body: String = chars[open + 1..close].iter().collect();
    let suffix: String = chars[close + 1..].iter().collect();

    let mut expanded = Vec::new();
    for alt in split_alternatives(&body) {
        // Recurse for nested groups and for further groups in the suffix.
        expanded.extend(expand_braces(&format!("{}{}{}", prefix, alt, suffix)));
    }
    expanded
}

/// Split a brace body on top-level commas, respecting nesting and escapes.
fn split_alternatives(body: &str) -> Vec<String> {
    let mut alts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                alts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    alts.push(current);
    alts
}

/// Recursive matcher with backtracking for `*`.
fn match_from(pat: &[char], pi: usize, inp: &[char], ii: usize) -> bool {
    if pi >= pat.len() {
        return ii >= inp.len();
    }

    match pat[pi] {
        '*' => {
            // Collapse runs of stars, then try every split point.
            let mut next = pi;
            while next < pat.len() && pat[next] == '*' {
                next += 1;
            }
            if next >= pat.len() {
                return true;
            }
            (ii..=inp.len()).any(|skip| match_from(pat, next, inp, skip))
        }
        '?' => ii < inp.len() && match_from(pat, pi + 1, inp, ii + 1),
        '[' => {
            if ii >= inp.len() {
                return false;
            }
            match char_class(&pat[pi..], inp[ii]) {
                Some((true, consumed)) => match_from(pat, pi + consumed, inp, ii + 1),
                Some((false, _)) => false,
                // Unclosed class: the bracket is a literal.
                None => inp[ii] == '[' && match_from(pat, pi + 1, inp, ii + 1),
            }
        }
        '\\' if pi + 1 < pat.len() => {
            ii < inp.len() && inp[ii] == pat[pi + 1] && match_from(pat, pi + 2, inp, ii + 1)
        }
        c => ii < inp.len() && inp[ii] == c && match_from(pat, pi + 1, inp, ii + 1),
    }
}

/// Evaluate a `[...]` class against one character.
///
/// Returns `Some((matched, chars_consumed))`, or `None` when the class is
/// never closed.
fn char_class(pat: &[char], ch: char) -> Option<(bool, usize)> {
    debug_assert_eq!(pat.first(), Some(&'['));
    let mut i = 1;
    let negate = matches!(pat.get(i), Some('!') | Some('^'));
    if negate {
        i += 1;
    }

    let first = i;
    let mut matched = false;
    loop {
        let c = *pat.get(i)?;
        // `]` right after the opening (or the negation) is a literal.
        if c == ']' && i > first {
            i += 1;
            break;
        }
        if i + 2 < pat.len() && pat[i + 1] == '-' && pat[i + 2] != ']' {
            if ch >= c && ch <= pat[i + 2] {
                matched = true;
            }
            i += 3;
        } else {
            if c == ch {
                matched = true;
            }
            i += 1;
        }
    }

    Some((matched != negate, i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("page.ts", "page.ts", true)]
    #[case("page.ts", "page.js", false)]
    #[case("", "", true)]
    #[case("", "x", false)]
    fn literals(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
        assert_eq!(glob_match(pattern, input), expected);
    }

    #[rstest]
    #[case("*", "", true)]
    #[case("*", "anything", true)]
    #[case("*.ts", "page.ts", true)]
    #[case("*.ts", ".ts", true)]
    #[case("*.ts", "page.tsx", false)]
    #[case("a*b*c", "aXbYc", true)]
    #[case("a*b*c", "abc", true)]
    #[case("*test*", "my-test-file", true)]
    fn star(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
        assert_eq!(glob_match(pattern, input), expected);
    }

    #[rstest]
    #[case("?", "a", true)]
    #[case("?", "", false)]
    #[case("v?.ts", "v1.ts", true)]
    #[case("v?.ts", "v12.ts", false)]
    fn question(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
        assert_eq!(glob_match(pattern, input), expected);
    }

    #[test]
    fn char_classes() {
        assert!(glob_match("[abc].ts", "a.ts"));
        assert!(!glob_match("[abc].ts", "d.ts"));
        assert!(glob_match("[a-z0-9]", "7"));
        assert!(!glob_match("[a-z]", "A"));
        assert!(glob_match("[!abc]", "d"));
        assert!(glob_match("[^abc]", "d"));
        assert!(!glob_match("[!abc]", "a"));
        // `]` first is a literal
        assert!(glob_match("[]x]", "]"));
        assert!(glob_match("[]x]", "x"));
    }

    #[test]
    fn unclosed_class_is_literal() {
        assert!(glob_match("a[b", "a[b"));
        assert!(!glob_match("a[b", "ab"));
    }

    #[test]
    fn escapes_match_literally() {
        assert!(glob_match(r"\*", "*"));
        assert!(!glob_match(r"\*", "x"));
        assert!(glob_match(r"data\[0\]", "data[0]"));
        assert!(glob_match(r"\{a,b\}", "{a,b}"));
        assert!(glob_match(r"app\(v2\)*.ts", "app(v2)-main.ts"));
    }

    #[test]
    fn braces() {
        assert!(glob_match("*.{ts,tsx}", "app.ts"));
        assert!(glob_match("*.{ts,tsx}", "app.tsx"));
        assert!(!glob_match("*.{ts,tsx}", "app.js"));
        assert!(glob_match("{a,{b,c}}", "c"));
        assert!(glob_match("test{,s}", "test"));
        assert!(glob_match("test{,s}", "tests"));
        // unclosed group stays literal
        assert!(glob_match("{ab", "{ab"));
    }

    #[test]
    fn expand_braces_direct() {
        assert_eq!(expand_braces("plain"), vec!["plain"]);
        assert_eq!(expand_braces("{a,b}"), vec!["a", "b"]);
        assert_eq!(expand_braces("x{a,b}y"), vec!["xay", "xby"]);
        let mut product = expand_braces("{a,b}{1,2}");
        product.sort();
        assert_eq!(product, vec!["a1", "a2", "b1", "b2"]);
        // escaped braces do not expand
        assert_eq!(expand_braces(r"\{a,b\}"), vec![r"\{a,b\}"]);
    }

    #[test]
    fn special_detection() {
        assert!(has_unescaped_special("*.ts"));
        assert!(has_unescaped_special("a[0]"));
        assert!(has_unescaped_special("x{a,b}"));
        assert!(!has_unescaped_special("plain.ts"));
        assert!(!has_unescaped_special(r"data\[0\]"));
        assert!(!has_unescaped_special(r"\*"));
    }

    #[test]
    fn unescape_strips_backslashes() {
        assert_eq!(unescape(r"data\[0\]"), "data[0]");
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape(r"tail\"), "tail");
    }

    #[test]
    fn unicode_input() {
        assert!(glob_match("*ñ*", "español"));
        assert!(glob_match("?", "日"));
    }
}
