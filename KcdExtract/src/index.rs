//! Logical file ids to local paths
//!
//! Extracted tables are addressed by a logical id derived from the file name
//! (`item__dlc.xml` becomes `item_dlc`, `sword_01_icon.webp` becomes
//! `sword_01`). The index is persisted next to each dataset as a diagnostic
//! side file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Side file name of the table index.
pub const XML_INDEX_FILE: &str = "xml_index.json";
/// Side file name of the icon index.
pub const ICON_INDEX_FILE: &str = "icon_index.json";

/// Logical id of an extracted table file.
pub fn xml_file_id(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(stem.replace("__", "_"))
}

/// Logical id of an icon texture.
pub fn icon_file_id(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(stem.replace("_icon", ""))
}

/// Mapping of logical file id to local path, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every file under `dir` with extension `extension`, naming each
    /// with `file_id`. The first file found for an id wins.
    pub fn scan(dir: &Path, extension: &str, file_id: fn(&Path) -> Option<String>) -> Self {
        let mut index = Self::new();
        if !dir.is_dir() {
            return index;
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| {
                e.path().is_file()
                    && e.path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        for path in files {
            if let Some(id) = file_id(&path)
                && !index.contains(&id)
            {
                index.insert(id, path);
            }
        }
        tracing::debug!("Indexed {} .{} files under {}", index.len(), extension, dir.display());
        index
    }

    /// Index extracted XML tables under `dir`.
    pub fn scan_xml(dir: &Path) -> Self {
        Self::scan(dir, "xml", xml_file_id)
    }

    /// Index converted icons under `dir`.
    pub fn scan_icons(dir: &Path) -> Self {
        Self::scan(dir, "webp", icon_file_id)
    }

    pub fn insert(&mut self, id: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(id.into(), path.into());
    }

    pub fn get(&self, id: &str) -> Option<&Path> {
        self.entries.get(id).map(PathBuf::as_path)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Path of a file the caller cannot proceed without.
    ///
    /// # Errors
    /// Returns [`Error::RequiredFileMissing`] if the id is not indexed and
    /// [`Error::SourceFileNotFound`] if the indexed file no longer exists.
    pub fn require(&self, id: &str) -> Result<&Path> {
        let path = self.get(id).ok_or_else(|| Error::RequiredFileMissing {
            file_id: id.to_string(),
        })?;
        if !path.is_file() {
            return Err(Error::SourceFileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(id, path)| (id.as_str(), path.as_path()))
    }

    /// Copy of the index with paths made relative to `base` where possible,
    /// for side files that should not depend on the install location.
    pub fn relative_to(&self, base: &Path) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(id, path)| {
                let relative = path.strip_prefix(base).unwrap_or(path.as_path());
                (id.clone(), relative.to_path_buf())
            })
            .collect();
        Self { entries }
    }
}
