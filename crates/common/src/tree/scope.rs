//! Context-folder scoping
//!
//! The listing endpoint cannot filter server-side, so a context folder is
//! applied locally: keep the keys under `<context>/` and strip that prefix
//! before the keys reach the builder. The builder itself never sees the
//! context folder.

/// An object key paired with its path relative to the current scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedKey<'a> {
    /// Path used to place the key in the tree
    pub relative: &'a str,
    /// The complete object key as listed by the bucket
    pub full: &'a str,
}

impl<'a> ScopedKey<'a> {
    /// A key outside of any context folder
    pub fn unscoped(key: &'a str) -> Self {
        Self {
            relative: key,
            full: key,
        }
    }
}

/// Normalize a user supplied context folder.
///
/// Leading and trailing separators are dropped; a blank value means
/// "no context folder".
pub fn normalize_context_folder(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Strip `<context>/` from `key`, or `None` if the key lies outside the context
pub fn strip_context<'a>(key: &'a str, context: &str) -> Option<&'a str> {
    key.strip_prefix(context)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}

/// Filter-then-strip a set of keys to the given context folder.
///
/// With no context every key passes through unchanged.
pub fn scope_keys<'a, I>(keys: I, context: Option<&str>) -> Vec<ScopedKey<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    match context {
        None => keys.into_iter().map(ScopedKey::unscoped).collect(),
        Some(context) => keys
            .into_iter()
            .filter_map(|full| {
                strip_context(full, context).map(|relative| ScopedKey { relative, full })
            })
            .collect(),
    }
}

/// Re-apply the context folder to a scope-relative name
pub fn qualify(context: Option<&str>, name: &str) -> String {
    let name = name.trim_start_matches('/');
    match context {
        Some(context) => format!("{}/{}", context, name),
        None => name.to_string(),
    }
}
