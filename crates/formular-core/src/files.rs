//! Filesystem helpers: locating, copying and deleting files

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use globset::Glob;

use crate::error::{Error, Result};

/// Find the newest regular file in `dir` whose name matches `pattern`
///
/// `pattern` is a plain file name or a glob (`*.gdt`, `Formular?.pdf`).
/// Files are ranked by creation time, or by modification time where the
/// platform does not record creation; ties go to the greater path.
pub fn find_latest(dir: &Path, pattern: &str) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let matcher = Glob::new(pattern)
        .map_err(|e| Error::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !matcher.is_match(entry.file_name()) {
            continue;
        }
        // Follow symlinks; a dangling link is not a candidate
        let path = entry.path();
        let Ok(metadata) = std::fs::metadata(&path) else {
            tracing::debug!("Skipping unreadable entry {}", path.display());
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let stamp = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let candidate = (stamp, path);
        if newest.as_ref().is_none_or(|current| candidate > *current) {
            newest = Some(candidate);
        }
    }

    let (_, path) = newest.ok_or_else(|| Error::NoMatchingFile {
        dir: dir.to_path_buf(),
        pattern: pattern.to_string(),
    })?;

    tracing::info!("Found {} file: {}", pattern, path.display());
    Ok(path)
}

/// Create `dir` and its parents if missing
///
/// Returns `true` if the directory had to be created.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(dir)?;
    tracing::info!("Created export directory '{}'", dir.display());
    Ok(true)
}

/// Copy `from` to `to` byte for byte, creating parent directories as needed
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let copy_err = |source| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(copy_err)?;
    }
    let bytes = std::fs::copy(from, to).map_err(copy_err)?;

    tracing::info!("Saved file as: {}", to.display());
    Ok(bytes)
}

/// Remove a file
pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|source| Error::Delete {
        path: path.to_path_buf(),
        source,
    })
}

/// Remove a file, logging instead of failing
///
/// Returns `true` if the file was deleted.
pub fn delete_best_effort(path: &Path) -> bool {
    match remove_file(path) {
        Ok(()) => {
            tracing::info!("Deleted file: {}", path.display());
            true
        }
        Err(Error::Delete { source, .. }) if source.kind() == ErrorKind::NotFound => {
            tracing::warn!("File '{}' was already removed", path.display());
            false
        }
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}
