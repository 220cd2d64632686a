//! Helpers for share-relative paths.
//!
//! Remote paths are Windows flavoured but callers often build them with
//! `/`, so both separators are accepted everywhere and nothing is
//! rewritten.

const SEPARATORS: [char; 2] = ['/', '\\'];

pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// `true` for the share root: `""` or separators only (`"/"`, `"\"`, `"//"`).
pub fn is_root(path: &str) -> bool {
    path.chars().all(is_separator)
}

/// Folder containing `path`, keeping the caller's separators.
///
/// `"/A/B/file"` gives `"/A/B"`, `"/file"` gives `"/"` and `"file"` gives `""`.
pub fn parent(path: &str) -> &str {
    let trimmed = trim_trailing(path);
    match trimmed.rfind(SEPARATORS) {
        Some(0) => &trimmed[..1],
        Some(index) => trim_trailing(&trimmed[..index]),
        None => "",
    }
}

/// Last component of `path`.
pub fn file_name(path: &str) -> &str {
    let trimmed = trim_trailing(path);
    match trimmed.rfind(SEPARATORS) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// `path` without its trailing separators. The root keeps its first one.
pub fn trim(path: &str) -> &str {
    trim_trailing(path)
}

/// Fully qualified `\\host\share\path` form used in logs and error messages.
pub fn unc(host: &str, share: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with(SEPARATORS) {
        format!(r"\\{host}\{share}{path}")
    } else {
        format!(r"\\{host}\{share}\{path}")
    }
}

fn trim_trailing(path: &str) -> &str {
    if path.len() > 1 {
        let trimmed = path.trim_end_matches(SEPARATORS);
        if trimmed.is_empty() {
            &path[..1]
        } else {
            trimmed
        }
    } else {
        path
    }
}
