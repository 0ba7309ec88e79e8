//! Mapping request paths onto relative filesystem paths.
//!
//! # Security
//!
//! The checks are deliberately stricter than a lexical clean: any `..` in the
//! remainder is rejected, even inside a file name, and a remainder starting
//! with `/` is rejected rather than normalized.

use thiserror::Error;

/// Why a request path was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The request path does not start with the webroot.
    #[error("request path does not start with the webroot")]
    Mismatch,

    /// Nothing was requested beyond the webroot.
    #[error("no file requested")]
    Empty,

    /// The remainder starts with a path separator.
    #[error("requested file starts with a root slash")]
    Rooted,

    /// The remainder contains a control, format, or non-ASCII space character.
    #[error("path contains unprintable characters")]
    Unprintable,

    /// The remainder contains two consecutive periods.
    #[error("path contains consecutive periods")]
    Traversal,
}

/// Resolve `request_path` under `webroot` into a clean relative path.
///
/// `webroot` is expected to end in `/`. The returned path never starts with
/// `/`, never contains `..`, `.` segments, or empty segments, and has no
/// trailing `/`.
pub fn resolve(webroot: &str, request_path: &str) -> Result<String, PathError> {
    let remainder = request_path
        .strip_prefix(webroot)
        .ok_or(PathError::Mismatch)?;

    if remainder.is_empty() {
        return Err(PathError::Empty);
    }
    if remainder.starts_with('/') {
        return Err(PathError::Rooted);
    }

    let mut previous = '\0';
    for c in remainder.chars() {
        if is_unprintable(c) {
            return Err(PathError::Unprintable);
        }
        if c == '.' && previous == '.' {
            return Err(PathError::Traversal);
        }
        previous = c;
    }

    let cleaned = remainder
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    if cleaned.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(cleaned)
}

/// Characters that render as nothing or as whitespace other than a plain space.
fn is_unprintable(c: char) -> bool {
    if c.is_control() || (!c.is_ascii() && c.is_whitespace()) {
        return true;
    }
    // Format characters (Cf) and the line and paragraph separators.
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{2028}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/get/";

    #[test]
    fn test_resolves_nested_file() {
        assert_eq!(
            resolve(ROOT, "/get/files/index.html").unwrap(),
            "files/index.html"
        );
    }

    #[test]
    fn test_rejects_traversal() {
        assert_eq!(
            resolve(ROOT, "/get/files/../../passwd"),
            Err(PathError::Traversal)
        );
        assert_eq!(resolve(ROOT, "/get/a..b"), Err(PathError::Traversal));
        assert_eq!(resolve(ROOT, "/get/.."), Err(PathError::Traversal));
    }

    #[test]
    fn test_rejects_rooted_remainder() {
        assert_eq!(resolve(ROOT, "/get//etc/passwd"), Err(PathError::Rooted));
    }

    #[test]
    fn test_rejects_mismatched_root() {
        assert_eq!(resolve(ROOT, "/files/index.html"), Err(PathError::Mismatch));
        assert_eq!(resolve(ROOT, "/ge"), Err(PathError::Mismatch));
        assert_eq!(resolve(ROOT, ""), Err(PathError::Mismatch));
    }

    #[test]
    fn test_rejects_empty_remainder() {
        assert_eq!(resolve(ROOT, "/get/"), Err(PathError::Empty));
        assert_eq!(resolve(ROOT, "/get/./"), Err(PathError::Empty));
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(resolve(ROOT, "/get/a\u{0}b"), Err(PathError::Unprintable));
        assert_eq!(resolve(ROOT, "/get/a\nb"), Err(PathError::Unprintable));
        assert_eq!(resolve(ROOT, "/get/a\u{7f}"), Err(PathError::Unprintable));
    }

    #[test]
    fn test_rejects_invisible_characters() {
        let invisible = [
            '\u{200B}', '\u{2028}', '\u{2029}', '\u{FEFF}', '\u{00A0}', '\u{3000}', '\u{202E}',
        ];
        for c in invisible {
            let path = format!("/get/a{c}b.html");
            assert_eq!(resolve(ROOT, &path), Err(PathError::Unprintable), "{c:?}");
        }
        // A plain space is printable.
        assert_eq!(resolve(ROOT, "/get/my file.html").unwrap(), "my file.html");
    }

    #[test]
    fn test_cleans_lexically() {
        assert_eq!(resolve(ROOT, "/get/a//b").unwrap(), "a/b");
        assert_eq!(resolve(ROOT, "/get/a/./b/").unwrap(), "a/b");
        assert_eq!(resolve(ROOT, "/get/./a").unwrap(), "a");
        assert_eq!(resolve(ROOT, "/get/.hidden").unwrap(), ".hidden");
    }

    #[test]
    fn test_non_ascii_is_allowed() {
        assert_eq!(resolve(ROOT, "/get/café.html").unwrap(), "café.html");
    }

    #[test]
    fn test_resolved_paths_are_always_relative_and_clean() {
        let inputs = [
            "/get/x", "/get/x/", "/get/x//y", "/get/./x", "/get/x/.", "/get/.x/y.",
        ];
        for input in inputs {
            let resolved = resolve(ROOT, input).unwrap();
            assert!(!resolved.starts_with('/'), "{input} -> {resolved}");
            assert!(!resolved.ends_with('/'), "{input} -> {resolved}");
            assert!(!resolved.contains(".."), "{input} -> {resolved}");
            assert!(!resolved.contains("//"), "{input} -> {resolved}");
            assert!(
                resolved.split('/').all(|segment| segment != "."),
                "{input} -> {resolved}"
            );
        }
    }
}
