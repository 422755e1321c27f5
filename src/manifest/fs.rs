//! Filesystem primitives shared by the manifest files.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::ManifestError;
use crate::config::WriteMode;

/// Creates `path` empty when it does not exist, then checks that it can be written.
///
/// Parent directories are not created; a missing parent is reported as [`ManifestError::NotFound`].
pub fn ensure_writable(path: &Path) -> Result<(), ManifestError> {
    if !path.exists() {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                tracing::debug!(path = %path.display(), error = %e, "Failed to create manifest file");
                ManifestError::NotFound {
                    path: path.to_path_buf(),
                }
            })?;
        tracing::debug!(path = %path.display(), "Created empty manifest file");
    }

    if !is_writable(path) {
        return Err(ManifestError::NotWritable {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    rustix::fs::access(path, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && !m.permissions().readonly())
        .unwrap_or(false)
}

/// Replaces the whole content of `path`.
pub fn write_file(path: &Path, contents: &str, mode: WriteMode) -> Result<(), ManifestError> {
    match mode {
        WriteMode::Overwrite => std::fs::write(path, contents)?,
        WriteMode::Atomic => write_atomic(path, contents)?,
    }
    tracing::debug!(path = %path.display(), bytes = contents.len(), ?mode, "Rewrote manifest file");
    Ok(())
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let temp = temp_path(path);

    let result = (|| {
        let mut file = File::create(&temp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&temp, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp);
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
