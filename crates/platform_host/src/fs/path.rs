//! Virtual-path helpers shared across host abstractions.
//!
//! Paths are `/`-delimited and relative to the `Home` root. A leading `/`, a leading `Home`
//! segment, empty segments and `.` segments carry no meaning, so `"/Home/a/b"`, `"Home/a/b"` and
//! `"a/b"` all normalize to `"a/b"` and the root itself normalizes to `""`.

use super::types::{Node, ROOT_FOLDER_NAME};

/// Splits `path` into its normalized, non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    let mut parts = path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .peekable();
    while parts.peek() == Some(&ROOT_FOLDER_NAME) {
        parts.next();
    }
    parts.collect()
}

/// Normalizes a virtual filesystem path.
///
/// Strips the leading `/` and every leading `Home` segment and collapses empty segments.
/// The result never starts or ends with `/`; the root normalizes to the empty string.
pub fn normalize(path: &str) -> String {
    segments(path).join("/")
}

/// Resolves `path` against `root`.
///
/// Returns `None` when a segment is missing or a file is indexed into. The empty path resolves to
/// `root` itself. Siblings with duplicate names resolve to the first match.
pub fn resolve<'a>(path: &str, root: &'a Node) -> Option<&'a Node> {
    let mut current = root;
    for segment in segments(path) {
        current = current.as_folder()?.child(segment)?;
    }
    Some(current)
}

/// Returns every segment except the last, rejoined.
pub fn parent_path(path: &str) -> String {
    let parts = segments(path);
    match parts.split_last() {
        Some((_, parent)) => parent.join("/"),
        None => String::new(),
    }
}

/// Returns the last segment of `path` (empty for the root).
pub fn base_name(path: &str) -> String {
    segments(path).last().copied().unwrap_or_default().to_string()
}

/// Joins a parent path and a child name into a normalized path.
pub fn join(parent: &str, name: &str) -> String {
    let parent = normalize(parent);
    if parent.is_empty() {
        normalize(name)
    } else {
        normalize(&format!("{parent}/{name}"))
    }
}

/// Resolves `target` relative to `current_dir`.
///
/// A target starting with `/` is absolute. Otherwise `..` pops one segment (a no-op at the root)
/// and any other segment is pushed. The result is normalized.
pub fn resolve_relative(current_dir: &str, target: &str) -> String {
    if target.starts_with('/') {
        return normalize(target);
    }

    let mut out: Vec<&str> = segments(current_dir);
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    normalize(&out.join("/"))
}

/// Returns `true` when `path` equals `ancestor` or lies below it.
pub fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    let path = segments(path);
    let ancestor = segments(ancestor);
    path.len() >= ancestor.len() && path[..ancestor.len()] == ancestor[..]
}

/// Keeps only the part of a proposed entry name before the first `/`, trimmed.
pub fn truncate_name(raw: &str) -> &str {
    raw.split('/').next().unwrap_or_default().trim()
}

/// Rewrites `path` when it equals or lies below `from`, re-rooting it at `to`.
///
/// Returns `None` when `path` is unrelated to `from`.
pub fn rebase(path: &str, from: &str, to: &str) -> Option<String> {
    if !is_same_or_descendant(path, from) {
        return None;
    }
    let rest = segments(path)
        .into_iter()
        .skip(segments(from).len())
        .collect::<Vec<_>>()
        .join("/");
    if rest.is_empty() {
        Some(normalize(to))
    } else {
        Some(join(to, &rest))
    }
}
