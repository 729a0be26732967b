//! The per-version `data.json` document

use crate::error::Result;
use crate::items::ItemBuckets;
use crate::tables::{ArmorType, DiceBadges, WeaponType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const BASE_DATA: &str = include_str!("base_data.json");

/// Version stamp of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Game version the data was extracted from, e.g. `1.2`.
    pub base: String,
}

/// Display metadata of one item subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeInfo {
    pub name: String,
    /// Normalized item types grouped under this subcategory.
    #[serde(default)]
    pub types: Vec<String>,
}

/// Root document for one game version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedDataset {
    pub version: VersionInfo,
    /// Raw item tags that are normalized.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Subcategory metadata keyed by subcategory name.
    #[serde(default)]
    pub item_types: IndexMap<String, ItemTypeInfo>,
    #[serde(default)]
    pub armor_types: Vec<ArmorType>,
    #[serde(default)]
    pub weapon_types: Vec<WeaponType>,
    #[serde(default)]
    pub dice_badges: DiceBadges,
    #[serde(default)]
    pub items: ItemBuckets,
}

impl VersionedDataset {
    /// A fresh document from the bundled template, stamped with `version`.
    ///
    /// # Errors
    /// Returns an error if the bundled template is not valid JSON.
    pub fn template(version: &str) -> Result<Self> {
        let mut dataset: Self = serde_json::from_str(BASE_DATA)?;
        dataset.version.base = version.to_string();
        Ok(dataset)
    }

    /// Serialize with 4-space indentation.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        to_json_pretty(self)
    }

    /// # Errors
    /// Returns an error if `content` is not a valid dataset.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Serialize `value` as JSON indented with 4 spaces, with a trailing newline.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut output = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
    value.serialize(&mut serializer)?;
    output.push(b'\n');
    Ok(String::from_utf8(output)?)
}
