//! Streaming tar.gz extraction.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};
use crate::sanitize::{sanitize_path, sanitize_symlink_target};

/// Extract `archive` into `install_dir`, streaming file contents in
/// `buffer_size` chunks.
///
/// Every entry path is validated to stay inside `install_dir`; a single
/// escaping entry fails the whole extraction. Extracted files and directories
/// are marked executable, since the bundle mixes libraries and helper
/// executables. The archive file itself is removed afterwards, best-effort,
/// whether extraction succeeded or not.
pub fn extract(install_dir: &Path, archive: &Path, buffer_size: usize) -> Result<()> {
    let result = extract_entries(install_dir, archive, buffer_size);

    if let Err(e) = std::fs::remove_file(archive) {
        tracing::debug!(path = %archive.display(), error = %e, "could not remove archive");
    }

    result
}

fn extract_entries(install_dir: &Path, archive: &Path, buffer_size: usize) -> Result<()> {
    tracing::info!(
        archive = %archive.display(),
        target = %install_dir.display(),
        "extracting package"
    );

    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    for entry in tar.entries().map_err(|_| Error::Corrupted)? {
        let mut entry = entry.map_err(|_| Error::Corrupted)?;
        let raw_path = entry.path().map_err(|_| Error::Corrupted)?.into_owned();
        let resolved = sanitize_path(&raw_path, install_dir)?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            std::fs::create_dir_all(&resolved).map_err(|e| Error::DirectoryCreationFailed {
                path: resolved.clone(),
                source: e,
            })?;
            mark_executable(&resolved)?;
        } else if entry_type.is_symlink() {
            let target = entry
                .link_name()
                .map_err(|_| Error::Corrupted)?
                .ok_or(Error::Corrupted)?
                .into_owned();
            let target = sanitize_symlink_target(&target, &resolved, install_dir)?;
            create_parent(&resolved)?;
            create_symlink(&target, &resolved)?;
        } else {
            create_parent(&resolved)?;
            write_chunked(&mut entry, &resolved, buffer_size)?;
            mark_executable(&resolved)?;
        }
    }

    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

fn write_chunked<R: Read>(reader: &mut R, path: &Path, buffer_size: usize) -> Result<()> {
    let mut out = File::create(path).map_err(|e| Error::ExtractionFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut buffer = vec![0u8; buffer_size.max(1)];
    loop {
        let count = reader.read(&mut buffer).map_err(|_| Error::Corrupted)?;
        if count == 0 {
            break;
        }
        out.write_all(&buffer[..count])
            .map_err(|e| Error::ExtractionFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    Ok(())
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::ExtractionFailed {
        path: link.to_path_buf(),
        source: e,
    })
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    let result = if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };
    result.map_err(|e| Error::ExtractionFailed {
        path: link.to_path_buf(),
        source: e,
    })
}
