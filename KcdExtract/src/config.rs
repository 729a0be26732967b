//! Run configuration
//!
//! Every field has a default, so an empty or partial `config.toml` is valid:
//!
//! ```toml
//! game_path = "~/.steam/steam/steamapps/common/KingdomComeDeliverance2"
//! data_dir = "~/kcd2-data"
//!
//! [filter]
//! icon_ids = ["trafficcone"]
//! ```

use crate::error::{Error, Result};
use crate::items::{DEFAULT_CATEGORIES, ItemFilter};
use crate::merge::{MergeOptions, PruneOptions};
use crate::paths::expand_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Item table ids merged by a default run, base table first.
pub const DEFAULT_ITEM_FILES: &[&str] = &["item", "item_dlc", "item_horse", "item_reward", "item_rewards"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Game install folder; detected from Steam when unset
    pub game_path: Option<String>,
    /// Root holding `version.json`, `xml/` and the version directories
    pub data_dir: String,
    /// Item table ids; the first is the required base table
    pub item_files: Vec<String>,
    /// Raw item tags to normalize
    pub categories: Vec<String>,
    pub filter: ItemFilter,
    pub merge: MergeOptions,
    pub prune: PruneOptions,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            game_path: None,
            data_dir: "data".to_string(),
            item_files: DEFAULT_ITEM_FILES.iter().map(ToString::to_string).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            filter: ItemFilter::default(),
            merge: MergeOptions::default(),
            prune: PruneOptions::default(),
        }
    }
}

impl ExtractConfig {
    /// `<config dir>/kcdextract/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kcdextract").join("config.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `explicit` if given, else the default config file if it exists,
    /// else the built-in defaults.
    ///
    /// # Errors
    /// Returns an error if an explicit file is missing, or a config file
    /// cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(Error::SourceFileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    tracing::debug!("No config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::info!("Loading config from {}", path.display());
        Self::from_toml(&fs::read_to_string(&path)?)
    }

    /// Configured game path with `~` expanded.
    pub fn game_path(&self) -> Option<PathBuf> {
        self.game_path.as_deref().map(expand_path)
    }

    /// Data root with `~` expanded.
    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ExtractConfig::from_toml(
            r#"
data_dir = "/srv/kcd2"

[filter]
icon_ids = ["trafficcone", "placeholder"]

[prune]
sort_by_tag = true
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir(), PathBuf::from("/srv/kcd2"));
        assert_eq!(config.game_path(), None);
        assert_eq!(config.filter.icon_ids.len(), 2);
        assert_eq!(config.filter.ui_infos, ItemFilter::default().ui_infos);
        assert!(config.prune.sort_by_tag);
        assert_eq!(config.prune.hollow_tags, vec!["Document"]);
        assert_eq!(config.item_files[0], "item");
        assert_eq!(config.merge, MergeOptions::default());
    }

    #[test]
    fn test_load_explicit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "categories = [\"Die\"]\n").unwrap();

        let config = ExtractConfig::load(Some(&path)).unwrap();
        assert_eq!(config.categories, vec!["Die"]);

        assert!(matches!(
            ExtractConfig::load(Some(&temp.path().join("missing.toml"))),
            Err(Error::SourceFileNotFound { .. })
        ));

        fs::write(&path, "categories = 3\n").unwrap();
        assert!(ExtractConfig::load(Some(&path)).is_err());
    }
}
