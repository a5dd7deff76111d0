//! Request path hygiene
//!
//! Paths reaching the stores are always relative, slash-separated, and free of
//! parent traversal. Hidden segments are never served.

/// Lexically cleans a slash-separated path: collapses separators, drops `.`
/// segments and resolves `..` against preceding segments.
fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // ".." above the root is the root
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Cleans a path so it neither climbs up (`..`) nor starts at the root (`/`).
pub fn sanitize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let cleaned = clean(&path);
    let no_parents = cleaned.replace("../", "");
    let no_root = no_parents.trim_start_matches('/');
    let no_up = no_root.strip_prefix("..").unwrap_or(no_root);
    clean(no_up)
}

/// True if any segment of `path` starts with a dot (`.`, `..`, `.hidden`).
pub fn contains_dot_file(path: &str) -> bool {
    path.split('/').any(|part| part.starts_with('.'))
}

/// Parent directory of a slash-separated relative path, `None` at the top level.
pub(crate) fn parent(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx]).filter(|p| !p.is_empty())
}

/// Last segment of a slash-separated path.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
