//! Path normalization for the dispatch table.
//!
//! Registered patterns and request paths go through the same rule, so
//! `/foo` and `/foo/` address the same entry. Exact matching over the whole
//! path is a property of the radix tree; nothing is appended for it.

/// Append a trailing `/` if absent. The empty path becomes `/`.
pub fn normalize(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push_str(path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}
