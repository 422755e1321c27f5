//! Deduplicated line list backed by a plain-text file.

use std::path::{Path, PathBuf};

use super::ManifestError;
use super::fs::{ensure_writable, write_file};
use crate::config::WriteMode;

/// One manifest file holding one entry per line.
///
/// Every mutation reads the whole file and writes it back; concurrent writers are not
/// coordinated and the last write wins.
#[derive(Debug, Clone)]
pub struct LineStore {
    path: PathBuf,
    write_mode: WriteMode,
}

impl LineStore {
    pub fn open(path: impl Into<PathBuf>, write_mode: WriteMode) -> Result<Self, ManifestError> {
        let path = path.into();
        ensure_writable(&path)?;
        Ok(Self { path, write_mode })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> Result<(), ManifestError> {
        let path = path.into();
        ensure_writable(&path)?;
        self.path = path;
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<String>, ManifestError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    pub fn contains(&self, item: &str) -> Result<bool, ManifestError> {
        Ok(self.load()?.iter().any(|i| i == item))
    }

    /// Appends `item` unless it is already listed. Returns whether the file changed.
    pub fn add(&self, item: &str, kind: &'static str) -> Result<bool, ManifestError> {
        if item.is_empty() {
            return Err(ManifestError::empty(kind));
        }

        let mut items = self.load()?;
        if items.iter().any(|i| i == item) {
            return Ok(false);
        }

        items.push(item.to_string());
        self.save(&items)?;
        Ok(true)
    }

    /// Drops every entry equal to `item` and rewrites the file, even when nothing matched.
    pub fn remove(&self, item: &str) -> Result<usize, ManifestError> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|i| i != item);
        self.save(&items)?;
        Ok(before - items.len())
    }

    fn save(&self, items: &[String]) -> Result<(), ManifestError> {
        write_file(&self.path, &items.join("\n"), self.write_mode)
    }
}
