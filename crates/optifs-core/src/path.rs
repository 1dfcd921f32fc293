//! Path normalization helpers.
//!
//! Two normal forms are used throughout the crate:
//!
//! - **Navigation paths** (the "current path" of the state store) carry a
//!   leading slash and no trailing slash: `/documents/reports`.
//! - **Directory keys** (the keys of the [`DirectoryCache`]) carry both a
//!   leading and a trailing slash: `/documents/reports/`.
//!
//! Normalizing an already-normalized path is a no-op, so callers can apply
//! these helpers defensively without tracking which form they hold.
//!
//! [`DirectoryCache`]: crate::cache::DirectoryCache

/// Ensure the path starts with a `/`.
///
/// The empty string normalizes to `/`.
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Ensure the path ends with a `/`.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Normalize a path into navigation form: leading slash, no trailing slash.
///
/// The root directory stays `/`.
pub fn normalize_path(path: &str) -> String {
    let path = ensure_leading_slash(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize a path into directory-key form: leading and trailing slash.
pub fn dir_key(path: &str) -> String {
    ensure_trailing_slash(&ensure_leading_slash(path))
}

/// Parent directory of a path, in navigation form.
///
/// The parent of the root is the root itself.
pub fn parent_path(path: &str) -> String {
    let path = normalize_path(path);
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Final component of a path (the display name of the entry).
pub fn entry_name(path: &str) -> String {
    let path = normalize_path(path);
    match path.rfind('/') {
        Some(idx) => path[idx + 1..].to_string(),
        None => path,
    }
}
