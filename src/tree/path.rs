//! Path canonicalization and relative-id helpers
//!
//! Entity ids are walk-root-relative paths joined with `/`, normalized to
//! Unicode NFC. The walk root itself is addressed as [`ROOT_ID`].

use crate::error::ManifestError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Id of the root dataset entity.
pub const ROOT_ID: &str = "./";

/// Parent directory recorded for entries sitting directly under the walk root.
pub const ROOT_PARENT: &str = ".";

/// Canonicalize a path and normalize it to NFC without a trailing slash
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, ManifestError> {
    let canonical = dunce::canonicalize(path).map_err(|e| ManifestError::io(path, e))?;
    let normalized = normalize_path_string(&canonical.to_string_lossy());
    Ok(PathBuf::from(normalized))
}

/// Normalize a path string (without filesystem access)
///
/// Applies NFC and strips trailing separators, preserving a bare `/`.
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().collect();
    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }
    result
}

/// Express `path` relative to `root` as a `/`-joined id.
///
/// Returns [`ROOT_PARENT`] when `path` is the root itself.
pub fn relative_id(root: &Path, path: &Path) -> Result<String, ManifestError> {
    let rel = path.strip_prefix(root).map_err(|_| {
        ManifestError::Structural(format!(
            "{} is not inside walk root {}",
            path.display(),
            root.display()
        ))
    })?;

    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return Ok(ROOT_PARENT.to_string());
    }
    Ok(normalize_path_string(&parts.join("/")))
}

/// Map a recorded parent directory onto the id of its containing entity.
pub fn container_id(parent_directory: &str) -> String {
    if parent_directory.is_empty() || parent_directory == ROOT_PARENT || parent_directory == ROOT_ID
    {
        ROOT_ID.to_string()
    } else {
        parent_directory.to_string()
    }
}

/// Parent directory of a relative id (`"."` for top-level entries).
pub fn parent_of(id: &str) -> &str {
    match id.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => ROOT_PARENT,
    }
}

/// Last component of a relative id.
pub fn basename(id: &str) -> &str {
    match id.rsplit_once('/') {
        Some((_, name)) => name,
        None => id,
    }
}

/// Strip the final extension from the last component of an id.
///
/// Leading dots do not start an extension, so `.env` keeps its name.
pub fn strip_extension(id: &str) -> &str {
    let name = basename(id);
    let dir_len = id.len() - name.len();
    let trimmed = name.trim_start_matches('.');
    let leading = name.len() - trimmed.len();
    match trimmed.rfind('.') {
        Some(dot) => &id[..dir_len + leading + dot],
        None => id,
    }
}

/// Join a relative id back onto the walk root.
pub fn resolve(root: &Path, id: &str) -> PathBuf {
    if id == ROOT_ID || id == ROOT_PARENT {
        return root.to_path_buf();
    }
    id.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
}
