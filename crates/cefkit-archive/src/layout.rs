//! Post-extraction layout normalization.
//!
//! Release tarballs nest everything under a release-named directory and keep
//! libraries in per-OS locations (`lib`, `bin`, macOS app `Contents`). The
//! loader expects libraries and helpers as direct children of the install
//! directory, so the nesting level is hoisted away here.

use std::path::{Path, PathBuf};

use cefkit_platform::Os;

use crate::error::Result;

/// Flatten the extracted package so that libraries and helper bundles sit
/// directly under `install_dir`. A no-op when no nested release directory is
/// found.
pub fn normalize_layout(install_dir: &Path, os: Os) -> Result<()> {
    match os {
        Os::Linux => flatten_lib(install_dir, false),
        Os::Windows => flatten_lib(install_dir, true),
        Os::MacOs => flatten_bundle(install_dir),
    }
}

/// Linux and Windows layout: `<release>/lib` holds the libraries; on Windows
/// `<release>/bin` contents are merged in as well.
fn flatten_lib(install_dir: &Path, merge_bin: bool) -> Result<()> {
    let Some(parent) = find_child_with(install_dir, "lib")? else {
        tracing::debug!(dir = %install_dir.display(), "no nested lib directory, layout unchanged");
        return Ok(());
    };

    let target = install_dir.join("lib");
    std::fs::rename(parent.join("lib"), &target)?;

    if merge_bin {
        move_children(&parent.join("bin"), &target)?;
    }

    remove_all_except(install_dir, &target);
    hoist(&target, install_dir)?;

    Ok(())
}

/// macOS layout: the release directory is an app bundle; libraries live in
/// `Contents/Home/lib` and the framework/helper bundles in
/// `Contents/Frameworks`.
fn flatten_bundle(install_dir: &Path) -> Result<()> {
    let Some(parent) = find_child_with(install_dir, "Contents")? else {
        tracing::debug!(dir = %install_dir.display(), "no app bundle found, layout unchanged");
        return Ok(());
    };

    let contents = parent.join("Contents");
    let target = install_dir.join("lib");
    std::fs::create_dir_all(&target)?;

    move_children(&contents.join("Home/lib"), &target)?;
    move_if_exists(
        &contents.join("Frameworks/Chromium Embedded Framework.framework"),
        &target.join("Chromium Embedded Framework.framework"),
    )?;
    move_if_exists(
        &contents.join("Frameworks/jcef Helper.app"),
        &target.join("jcef Helper.app"),
    )?;

    remove_all_except(install_dir, &target);
    hoist(&target, install_dir)?;

    Ok(())
}

/// Find the child of `dir` that contains `marker` as a direct child.
fn find_child_with(dir: &Path, marker: &str) -> Result<Option<PathBuf>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.join(marker).exists() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Move every child of `src` into `dest`, skipping when `src` does not exist.
fn move_children(src: &Path, dest: &Path) -> Result<()> {
    if !src.exists() {
        return Ok(());
    }
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        std::fs::rename(entry.path(), dest.join(entry.file_name()))?;
    }
    Ok(())
}

fn move_if_exists(src: &Path, dest: &Path) -> Result<()> {
    if src.exists() {
        std::fs::rename(src, dest)?;
    }
    Ok(())
}

/// Remove everything in `dir` except `keep`. Cleanup failures are logged but
/// do not fail the normalization.
fn remove_all_except(dir: &Path, keep: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path == keep {
            continue;
        }
        let removed = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        if let Err(e) = removed {
            tracing::debug!(path = %path.display(), error = %e, "could not remove leftover entry");
        }
    }
}

/// Move every child of `staging` up into `dir`, then drop `staging`.
fn hoist(staging: &Path, dir: &Path) -> Result<()> {
    move_children(staging, dir)?;
    std::fs::remove_dir(staging)?;
    Ok(())
}
