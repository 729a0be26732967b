//! In-memory dataset assembly

use super::dataset::VersionedDataset;
use crate::error::Result;
use crate::items::ItemBuckets;
use crate::tables::{ArmorType, DiceBadges, WeaponType};

/// Collects every section of a dataset before a single write.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    dataset: VersionedDataset,
}

impl DatasetBuilder {
    /// Start from the bundled template stamped with `version`.
    ///
    /// # Errors
    /// Returns an error if the bundled template is invalid.
    pub fn new(version: &str) -> Result<Self> {
        Ok(Self {
            dataset: VersionedDataset::template(version)?,
        })
    }

    /// Start from an existing document.
    pub fn from_dataset(dataset: VersionedDataset) -> Self {
        Self { dataset }
    }

    pub fn categories(&mut self, categories: Vec<String>) -> &mut Self {
        self.dataset.categories = categories;
        self
    }

    pub fn armor_types(&mut self, armor_types: Vec<ArmorType>) -> &mut Self {
        self.dataset.armor_types = armor_types;
        self
    }

    pub fn weapon_types(&mut self, weapon_types: Vec<WeaponType>) -> &mut Self {
        self.dataset.weapon_types = weapon_types;
        self
    }

    pub fn dice_badges(&mut self, dice_badges: DiceBadges) -> &mut Self {
        self.dataset.dice_badges = dice_badges;
        self
    }

    pub fn items(&mut self, items: ItemBuckets) -> &mut Self {
        self.dataset.items = items;
        self
    }

    /// The document as assembled so far.
    pub fn dataset(&self) -> &VersionedDataset {
        &self.dataset
    }

    pub fn build(self) -> VersionedDataset {
        self.dataset
    }
}
