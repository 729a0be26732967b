//! Item record types

use crate::mapping::FieldMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Normalized item type.
///
/// Source tags that describe the same kind of item are folded together:
/// `Hood`, `Helmet` and `Horse` (retagged horse armor) become [`ItemType::Armor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemType {
    MeleeWeapon,
    MissileWeapon,
    Armor,
    Die,
    DiceBadge,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl ItemType {
    /// Normalize a raw element tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "MeleeWeapon" => Self::MeleeWeapon,
            "MissileWeapon" => Self::MissileWeapon,
            "Armor" | "Hood" | "Helmet" | "Horse" => Self::Armor,
            "Die" => Self::Die,
            "DiceBadge" => Self::DiceBadge,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::MeleeWeapon => "MeleeWeapon",
            Self::MissileWeapon => "MissileWeapon",
            Self::Armor => "Armor",
            Self::Die => "Die",
            Self::DiceBadge => "DiceBadge",
            Self::Other(tag) => tag,
        }
    }

    /// Output bucket for this type, `None` for types without one.
    pub fn subcategory(&self) -> Option<Subcategory> {
        match self {
            Self::MeleeWeapon | Self::MissileWeapon => Some(Subcategory::Weapons),
            Self::Armor => Some(Subcategory::Armors),
            Self::Die => Some(Subcategory::Dice),
            Self::DiceBadge => Some(Subcategory::DiceBadges),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Output grouping of item records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcategory {
    Weapons,
    Armors,
    Dice,
    DiceBadges,
}

impl Subcategory {
    pub const ALL: [Subcategory; 4] = [Self::Weapons, Self::Armors, Self::Dice, Self::DiceBadges];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weapons => "weapons",
            Self::Armors => "armors",
            Self::Dice => "dice",
            Self::DiceBadges => "dice_badges",
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Localized item name looked up through `UIName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_name: Option<String>,
    /// Inferred armor slot id, armor only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u32>,
    #[serde(default)]
    pub attributes: FieldMap,
    #[serde(default)]
    pub stats: FieldMap,
}

/// Item records grouped by [`Subcategory`], each in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBuckets {
    #[serde(default)]
    pub weapons: Vec<ItemRecord>,
    #[serde(default)]
    pub armors: Vec<ItemRecord>,
    #[serde(default)]
    pub dice: Vec<ItemRecord>,
    #[serde(default)]
    pub dice_badges: Vec<ItemRecord>,
}

impl ItemBuckets {
    pub fn bucket(&self, subcategory: Subcategory) -> &[ItemRecord] {
        match subcategory {
            Subcategory::Weapons => &self.weapons,
            Subcategory::Armors => &self.armors,
            Subcategory::Dice => &self.dice,
            Subcategory::DiceBadges => &self.dice_badges,
        }
    }

    pub fn bucket_mut(&mut self, subcategory: Subcategory) -> &mut Vec<ItemRecord> {
        match subcategory {
            Subcategory::Weapons => &mut self.weapons,
            Subcategory::Armors => &mut self.armors,
            Subcategory::Dice => &mut self.dice,
            Subcategory::DiceBadges => &mut self.dice_badges,
        }
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        Subcategory::ALL.iter().map(|&s| self.bucket(s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord> {
        Subcategory::ALL.into_iter().flat_map(move |s| self.bucket(s).iter())
    }

    /// Record with the given id in any bucket.
    pub fn find(&self, id: &str) -> Option<&ItemRecord> {
        self.iter().find(|record| record.id == id)
    }
}
