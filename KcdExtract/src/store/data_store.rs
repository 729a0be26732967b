//! On-disk versioned datasets

use super::dataset::{VersionedDataset, to_json_pretty};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the dataset inside a version directory.
pub const DATASET_FILE: &str = "data.json";

/// Owns the `<root>/<version>/data.json` documents.
///
/// Every write replaces the whole document. The store assumes a single
/// writer per version directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of `version`.
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }

    /// Write a fresh template document for `version`, replacing any existing one.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn initialize(&self, version: &str) -> Result<(VersionedDataset, PathBuf)> {
        let dir = self.version_dir(version);
        fs::create_dir_all(&dir)?;

        let dataset = VersionedDataset::template(version)?;
        let path = dir.join(DATASET_FILE);
        Self::save(&dataset, &path)?;
        tracing::info!("Initialized {}", path.display());
        Ok((dataset, path))
    }

    /// Load the document of a version directory.
    ///
    /// # Errors
    /// Returns [`Error::DatasetNotFound`] if the directory has no `data.json`.
    pub fn load(&self, version_dir: &Path) -> Result<(VersionedDataset, PathBuf)> {
        let path = version_dir.join(DATASET_FILE);
        if !path.is_file() {
            return Err(Error::DatasetNotFound { path });
        }
        let content = fs::read_to_string(&path)?;
        let dataset = VersionedDataset::from_json(&content)?;
        Ok((dataset, path))
    }

    /// Write `dataset` to `path`, replacing the file.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn save(dataset: &VersionedDataset, path: &Path) -> Result<()> {
        fs::write(path, dataset.to_json()?)?;
        tracing::debug!("Saved {}", path.display());
        Ok(())
    }

    /// Read the document of `version_dir`, apply `update` and write it back.
    ///
    /// # Errors
    /// Returns an error if the document cannot be loaded or saved.
    pub fn update<F>(&self, version_dir: &Path, update: F) -> Result<VersionedDataset>
    where
        F: FnOnce(&mut VersionedDataset),
    {
        let (mut dataset, path) = self.load(version_dir)?;
        update(&mut dataset);
        Self::save(&dataset, &path)?;
        Ok(dataset)
    }

    /// Write an auxiliary JSON file next to the dataset.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn write_side_file<T: Serialize + ?Sized>(
        &self,
        version_dir: &Path,
        name: &str,
        value: &T,
    ) -> Result<PathBuf> {
        let path = version_dir.join(name);
        fs::write(&path, to_json_pretty(value)?)?;
        tracing::info!("Saved {}", path.display());
        Ok(path)
    }
}
