//! Equipment slot table (`equipment_slot.xml`)

use crate::formats::xml::XmlDocument;
use serde::{Deserialize, Serialize};

/// Keywords the slot table does not list for horse equipment.
const EXTRA_SLOT_KEYWORDS: &[(&str, &[&str])] = &[
    ("horse_torso", &["Caparison", "Harness"]),
    ("horse_head", &["Bridle", "Chanfron"]),
    ("horse_saddle", &["Saddle"]),
];

/// An armor slot and the name keywords that identify items worn in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArmorType {
    pub id: u32,
    pub name: String,
    #[serde(rename = "UIBodyPartId")]
    pub ui_body_part_id: Option<String>,
    #[serde(rename = "UISlot")]
    pub ui_slot: String,
    #[serde(rename = "filters")]
    pub filters: Vec<String>,
}

impl ArmorType {
    /// Whether any filter keyword occurs in `lowercase_name`.
    pub fn matches(&self, lowercase_name: &str) -> bool {
        self.filters
            .iter()
            .any(|keyword| lowercase_name.contains(&keyword.to_lowercase()))
    }
}

/// Parse `EquipmentSlot` elements into armor types sorted by id.
///
/// Keywords come from the space-separated `ArmorTypes` attribute, extended for
/// the horse slots; a slot with no keywords matches on its `UISlot` label.
/// Slots without a `UISlot` and slots with a non-numeric id are skipped.
pub fn parse_equipment_slots(doc: &XmlDocument) -> Vec<ArmorType> {
    let mut slots = Vec::new();

    for id in doc.find_all("EquipmentSlot") {
        let element = doc.element(id);
        let Some(slot_id) = element.get("Id").and_then(|v| v.trim().parse::<u32>().ok()) else {
            tracing::warn!("Skipping equipment slot with invalid id {:?}", element.get("Id"));
            continue;
        };
        let name = element.get("Name").unwrap_or_default().to_string();

        let mut filters: Vec<String> = element
            .get("ArmorTypes")
            .unwrap_or_default()
            .split_whitespace()
            .map(ToString::to_string)
            .collect();
        if let Some((_, extra)) = EXTRA_SLOT_KEYWORDS.iter().find(|(slot, _)| *slot == name) {
            filters.extend(extra.iter().map(ToString::to_string));
        }

        let Some(ui_slot) = element.get("UISlot").filter(|s| !s.is_empty()) else {
            tracing::debug!("Skipping equipment slot {} ({}) without UISlot", slot_id, name);
            continue;
        };
        if filters.is_empty() {
            filters.push(ui_slot.to_string());
        }

        slots.push(ArmorType {
            id: slot_id,
            name,
            ui_body_part_id: element.get("UIBodyPartId").map(ToString::to_string),
            ui_slot: ui_slot.to_string(),
            filters,
        });
    }

    slots.sort_by_key(|slot| slot.id);
    slots
}

/// First slot, in list order, whose keywords match `item_name`.
pub fn infer_slot<'a>(slots: &'a [ArmorType], item_name: &str) -> Option<&'a ArmorType> {
    let name = item_name.to_lowercase();
    slots.iter().find(|slot| slot.matches(&name))
}
