//! Game version resolution
//!
//! The game ships `whdlversions.json`, whose `Preset.Branch.Name` (for example
//! `release_1_2`) identifies the build. A copy is kept in the data root as
//! `version.json`; `latest_version.json` records the last version a dataset
//! directory was created for.

use crate::error::{Error, Result};
use crate::store::to_json_pretty;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Version descriptor shipped in the game directory.
pub const GAME_VERSION_FILE: &str = "whdlversions.json";
/// Copy of the game descriptor in the data root.
pub const VERSION_FILE: &str = "version.json";
/// Last version a dataset directory was created for.
pub const LATEST_VERSION_FILE: &str = "latest_version.json";

/// Whether the resolved version differs from the last recorded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    New,
    Unchanged,
}

/// Result of [`resolve_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: String,
    pub status: VersionStatus,
    /// `<data root>/<version>`
    pub dir: PathBuf,
}

/// Canonical version from a branch name: `release_1_2` becomes `1.2`.
pub fn version_from_branch(name: &str) -> String {
    name.replace("release_", "").replace('_', ".")
}

fn read_json(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(Error::SourceFileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn branch(descriptor: &Value) -> Result<&Map<String, Value>> {
    descriptor
        .pointer("/Preset/Branch")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::InvalidVersionDescriptor {
            message: "missing Preset.Branch".to_string(),
        })
}

fn branch_version(descriptor: &Value) -> Result<String> {
    branch(descriptor)?
        .get("Name")
        .and_then(Value::as_str)
        .map(version_from_branch)
        .ok_or_else(|| Error::InvalidVersionDescriptor {
            message: "missing Preset.Branch.Name".to_string(),
        })
}

/// Version described by `<data_dir>/version.json`, without side effects.
///
/// # Errors
/// Returns an error if the descriptor is missing or malformed.
pub fn read_version(data_dir: &Path) -> Result<String> {
    branch_version(&read_json(&data_dir.join(VERSION_FILE))?)
}

/// Resolve the current version and prepare its directory.
///
/// When the version differs from `latest_version.json` (or that file is
/// missing), `latest_version.json` is rewritten and `<data_dir>/<version>` is
/// created.
///
/// # Errors
/// Returns an error if `version.json` is missing or malformed, or files cannot
/// be written.
pub fn resolve_version(data_dir: &Path) -> Result<ResolvedVersion> {
    let descriptor = read_json(&data_dir.join(VERSION_FILE))?;
    let version = branch_version(&descriptor)?;
    let dir = data_dir.join(&version);

    let latest_path = data_dir.join(LATEST_VERSION_FILE);
    if latest_path.is_file() {
        let latest = read_json(&latest_path)?;
        if latest.pointer("/Branch/version").and_then(Value::as_str) == Some(version.as_str()) {
            tracing::info!("Version {} matches the latest version", version);
            return Ok(ResolvedVersion {
                version,
                status: VersionStatus::Unchanged,
                dir,
            });
        }
    }

    let mut latest_branch = branch(&descriptor)?.clone();
    latest_branch.insert("version".to_string(), Value::String(version.clone()));
    let latest = json!({
        "Assembly": descriptor.get("Assembly").cloned().unwrap_or(Value::Null),
        "Branch": latest_branch,
    });
    fs::write(&latest_path, to_json_pretty(&latest)?)?;
    fs::create_dir_all(&dir)?;
    tracing::info!("New version {} detected, created {}", version, dir.display());

    Ok(ResolvedVersion {
        version,
        status: VersionStatus::New,
        dir,
    })
}

/// Copy the game's version descriptor into the data root when its `Preset`
/// differs from the stored copy. Returns whether the file was copied.
///
/// # Errors
/// Returns an error if the game descriptor cannot be read or copied.
pub fn sync_version_file(game_path: &Path, data_dir: &Path) -> Result<bool> {
    let game_file = game_path.join(GAME_VERSION_FILE);
    let data_file = data_dir.join(VERSION_FILE);
    let game_descriptor = read_json(&game_file)?;

    if data_file.is_file() {
        let stored = read_json(&data_file)?;
        if stored.get("Preset") == game_descriptor.get("Preset") {
            tracing::info!("Version descriptor is up to date");
            return Ok(false);
        }
    }

    fs::create_dir_all(data_dir)?;
    fs::copy(&game_file, &data_file)?;
    tracing::info!("Copied {} to {}", game_file.display(), data_file.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_descriptor(dir: &Path, file: &str, branch: &str) {
        let descriptor = json!({
            "Assembly": {"Build": 1234},
            "Preset": {"Branch": {"Name": branch, "Id": 7}}
        });
        fs::write(dir.join(file), descriptor.to_string()).unwrap();
    }

    #[test]
    fn test_version_from_branch() {
        assert_eq!(version_from_branch("release_1_2"), "1.2");
        assert_eq!(version_from_branch("release_1_2_1"), "1.2.1");
        assert_eq!(version_from_branch("main"), "main");
    }

    #[test]
    fn test_resolve_new_then_unchanged() {
        let temp = TempDir::new().unwrap();
        write_descriptor(temp.path(), VERSION_FILE, "release_1_2");

        let first = resolve_version(temp.path()).unwrap();
        assert_eq!(first.version, "1.2");
        assert_eq!(first.status, VersionStatus::New);
        assert!(first.dir.is_dir());

        let latest = read_json(&temp.path().join(LATEST_VERSION_FILE)).unwrap();
        assert_eq!(latest.pointer("/Branch/version"), Some(&json!("1.2")));
        assert_eq!(latest.pointer("/Branch/Id"), Some(&json!(7)));
        assert_eq!(latest.pointer("/Assembly/Build"), Some(&json!(1234)));

        let second = resolve_version(temp.path()).unwrap();
        assert_eq!(second.status, VersionStatus::Unchanged);

        write_descriptor(temp.path(), VERSION_FILE, "release_1_3");
        let third = resolve_version(temp.path()).unwrap();
        assert_eq!(third.version, "1.3");
        assert_eq!(third.status, VersionStatus::New);
    }

    #[test]
    fn test_missing_and_malformed_descriptor() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            read_version(temp.path()),
            Err(Error::SourceFileNotFound { .. })
        ));

        fs::write(temp.path().join(VERSION_FILE), r#"{"Preset": {}}"#).unwrap();
        assert!(matches!(
            read_version(temp.path()),
            Err(Error::InvalidVersionDescriptor { .. })
        ));
    }

    #[test]
    fn test_sync_version_file() {
        let game = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        write_descriptor(game.path(), GAME_VERSION_FILE, "release_1_2");

        assert!(sync_version_file(game.path(), data.path()).unwrap());
        assert!(!sync_version_file(game.path(), data.path()).unwrap());

        write_descriptor(game.path(), GAME_VERSION_FILE, "release_1_3");
        assert!(sync_version_file(game.path(), data.path()).unwrap());
        assert_eq!(read_version(data.path()).unwrap(), "1.3");
    }
}
