//! Auxiliary game tables
//!
//! Equipment slots, weapon classes, dice badge types and localized item names.
//! These fill the metadata sections of the dataset and feed the item
//! normalizer (armor slot inference, display names).

mod dice;
mod equipment;
mod localization;
mod weapons;

pub use dice::{DiceBadges, parse_dice_badges};
pub use equipment::{ArmorType, infer_slot, parse_equipment_slots};
pub use localization::{LocalizedName, LocalizedNames};
pub use weapons::{UNKNOWN_AMMO, WeaponType, parse_ammo_classes, parse_weapon_classes};
