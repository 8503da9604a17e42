use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry path under `base`, rejecting anything that would
/// escape it (zip-slip protection).
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(entry_path: P, base: B) -> Result<PathBuf> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();
    let normalized = normalize_path(entry_path);

    if normalized.is_absolute() {
        return Err(Error::PathEscape {
            entry: entry_path.to_path_buf(),
            resolved: normalized,
        });
    }

    let resolved = normalize_path(&base.join(normalized));

    if !resolved.starts_with(base) {
        return Err(Error::PathEscape {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(resolved)
}

/// Sanitize a symlink target relative to the symlink's own location.
pub fn sanitize_symlink_target<P: AsRef<Path>, L: AsRef<Path>, B: AsRef<Path>>(
    target: P,
    symlink_location: L,
    base: B,
) -> Result<PathBuf> {
    let target = target.as_ref();
    let symlink_location = symlink_location.as_ref();
    let base = base.as_ref();

    if target.is_absolute() {
        return Err(Error::AbsoluteSymlinkTarget {
            target: target.to_path_buf(),
            symlink: symlink_location.to_path_buf(),
        });
    }

    let resolved = symlink_location
        .parent()
        .map(|p| p.join(target))
        .unwrap_or_else(|| target.to_path_buf());

    let absolute = if resolved.is_absolute() {
        resolved
    } else {
        base.join(resolved)
    };
    let final_path = normalize_path(&absolute);

    if !final_path.starts_with(base) {
        return Err(Error::SymlinkEscape {
            target: target.to_path_buf(),
            resolved: final_path,
        });
    }

    Ok(final_path)
}

/// Normalize separators and resolve `.`/`..` components lexically.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push("/"),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
