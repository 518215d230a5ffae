//! Slash-path helpers.
//!
//! The transform works on slash-normalized path strings throughout (the
//! project root arrives slash-normalized, and importer ids use forward
//! slashes on every platform), so these helpers operate on `&str` rather
//! than `std::path::Path`.

/// Convert backslashes to forward slashes.
pub fn slash(p: &str) -> String {
    p.replace('\\', "/")
}

/// A module is virtual when it has no on-disk path context: a reserved
/// marker prefix, or an identifier with no path separator at all.
pub fn is_virtual_module(id: &str) -> bool {
    id.starts_with("virtual:") || id.starts_with('\0') || !id.contains('/')
}

/// Directory portion of a slash path.
pub fn dirname(p: &str) -> &str {
    match p.rfind('/') {
        Some(0) => "/",
        Some(i) => &p[..i],
        None => ".",
    }
}

/// Final component of a slash path.
pub fn basename(p: &str) -> &str {
    match p.rfind('/') {
        Some(i) => &p[i + 1..],
        None => p,
    }
}

/// Join two slash paths and normalize the result.
pub fn join(base: &str, rest: &str) -> String {
    normalize(&format!("{}/{}", base, rest))
}

/// Collapse `.`, `..` and repeated separators.
pub fn normalize(p: &str) -> String {
    let absolute = p.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in p.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&"..") => parts.push(".."),
                Some(_) => {
                    parts.pop();
                }
                None => {
                    // `..` above an absolute root stays at the root
                    if !absolute {
                        parts.push("..");
                    }
                }
            },
            _ => parts.push(part),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Relative path from one absolute slash path to another, POSIX-style:
/// empty when equal, `..` segments to climb out of `from`.
pub fn relative(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let f: Vec<&str> = from.split('/').filter(|p| !p.is_empty()).collect();
    let t: Vec<&str> = to.split('/').filter(|p| !p.is_empty()).collect();

    let common = f.iter().zip(t.iter()).take_while(|(a, b)| a == b).count();
    let mut parts: Vec<&str> = vec![".."; f.len() - common];
    parts.extend(&t[common..]);
    parts.join("/")
}
