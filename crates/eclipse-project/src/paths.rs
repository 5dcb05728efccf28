//! String-level helpers for Eclipse's `/`-separated paths.

use std::path::{Path, PathBuf};

/// Splits a variable-style path at the first separator.
///
/// `"MAVEN/commons/1.jar"` becomes `("MAVEN", "/commons/1.jar")`; a bare
/// variable name has an empty remainder.
pub fn split_variable(raw: &str) -> (&str, &str) {
    match raw.find(['/', '\\']) {
        Some(idx) => (&raw[..idx], &raw[idx..]),
        None => (raw, ""),
    }
}

/// Splits a workspace path of the form `/project-name/rest`.
///
/// `"/some-project/lib/file.jar"` becomes `("some-project", "/lib/file.jar")`.
/// Returns `None` when the path is not workspace-absolute or names no project.
pub fn split_project(raw: &str) -> Option<(&str, &str)> {
    let without_slash = raw.strip_prefix('/')?;
    let (name, rest) = split_variable(without_slash);
    if name.is_empty() {
        return None;
    }
    Some((name, rest))
}

/// Appends an Eclipse-style relative remainder (`/a/b`, `a/b` or ``) to `base`.
pub(crate) fn append(base: &Path, rest: &str) -> PathBuf {
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        base.to_path_buf()
    } else {
        base.join(rest)
    }
}

/// Whether `raw` is an absolute filesystem path on any platform Eclipse runs on.
///
/// Drive-letter paths (`C:/x`, `C:\x`) count even on Unix hosts; workspaces
/// are regularly copied between machines.
pub(crate) fn is_absolute_path(raw: &str) -> bool {
    if Path::new(raw).is_absolute() {
        return true;
    }
    let bytes = raw.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

/// Returns the URI scheme of `raw`, if any.
///
/// Single-letter schemes are treated as Windows drive letters, not schemes.
pub(crate) fn uri_scheme(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once(':')?;
    let valid = scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Converts a `file:` URI into a filesystem path.
pub(crate) fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    if let Ok(url) = url::Url::parse(uri) {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return Some(path);
            }
        }
    }

    // Eclipse happily writes non-normalized URIs such as `file:relative/dir`.
    let rest = uri.strip_prefix("file:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}

/// Canonicalizes `path` without the `\\?\` prefix on Windows, falling back to
/// the path itself when it does not exist.
pub(crate) fn canonicalize_or_fallback(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
