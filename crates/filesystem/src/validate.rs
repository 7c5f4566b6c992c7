//! Path confinement for the sandboxed filesystem server.
//!
//! Every operation must pass its caller-supplied path through
//! [`resolve_path`] before touching the filesystem. The check is purely
//! lexical: `.` and `..` are folded without consulting the disk, and the
//! result is compared with the allowed root component by component.

use crate::error::FsError;
use std::path::{Component, Path, PathBuf};

/// Resolve `relative` against `root`, refusing anything that escapes it.
///
/// Steps:
/// 1. Reject empty paths and paths containing null bytes
/// 2. Join the path under the root, dropping any leading root or prefix so
///    absolute caller paths cannot replace the root
/// 3. Normalize `.`, `..` and redundant separators lexically
/// 4. Verify the normalized path starts with the normalized root
pub fn resolve_path(root: &Path, relative: &str) -> Result<PathBuf, FsError> {
    if relative.is_empty() || relative.contains('\0') {
        return Err(FsError::AccessDenied);
    }

    let root = normalize_lexical(root);
    let mut joined = root.clone();
    for component in Path::new(relative).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => joined.push(other),
        }
    }

    let resolved = normalize_lexical(&joined);
    // Component-wise, so `/srv/allowed-evil` is not inside `/srv/allowed`.
    if !resolved.starts_with(&root) {
        return Err(FsError::AccessDenied);
    }

    Ok(resolved)
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the filesystem root; on a relative path a leading
/// `..` that has nothing to pop is kept.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
