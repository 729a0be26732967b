//! Weapon class tables (`weapon_class.xml`, `ammo_class.xml`)

use crate::formats::xml::{XmlDocument, XmlElement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ammo name used when a missile weapon's ammo class cannot be resolved.
pub const UNKNOWN_AMMO: &str = "Unknown";

const WEAPON_CLASS_TAGS: &[&str] = &["MeleeWeaponClass", "MissileWeaponClass"];

/// A weapon class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponType {
    pub id: u32,
    pub name: String,
    /// `MeleeWeapon` or `MissileWeapon`.
    #[serde(rename = "type")]
    pub kind: String,
    pub skill: Option<String>,
    pub equip_slot: Option<String>,
    /// Ammo class name, missile weapons only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ammo: Option<String>,
}

/// Ammo class id to name.
pub fn parse_ammo_classes(doc: &XmlDocument) -> HashMap<String, String> {
    doc.find_all("ammo_class")
        .into_iter()
        .filter_map(|id| {
            let element = doc.element(id);
            Some((
                element.get("ammo_class_id")?.to_string(),
                element.get("ammo_class_name")?.to_string(),
            ))
        })
        .collect()
}

/// Combine melee and missile weapon classes into one list sorted by id.
///
/// Missile classes resolve their `ammo_class` through `ammo_doc`, falling back
/// to [`UNKNOWN_AMMO`].
pub fn parse_weapon_classes(weapon_doc: &XmlDocument, ammo_doc: &XmlDocument) -> Vec<WeaponType> {
    let ammo_classes = parse_ammo_classes(ammo_doc);
    let mut weapons = Vec::new();

    for tag in WEAPON_CLASS_TAGS {
        for id in weapon_doc.find_all(tag) {
            if let Some(weapon) = weapon_type(weapon_doc.element(id), &ammo_classes) {
                weapons.push(weapon);
            }
        }
    }

    weapons.sort_by_key(|weapon| weapon.id);
    weapons
}

fn weapon_type(element: &XmlElement, ammo_classes: &HashMap<String, String>) -> Option<WeaponType> {
    let Some(id) = element.get("id").and_then(|v| v.trim().parse::<u32>().ok()) else {
        tracing::warn!("Skipping {} with invalid id {:?}", element.tag, element.get("id"));
        return None;
    };

    let ammo = (element.tag == "MissileWeaponClass").then(|| {
        element
            .get("ammo_class")
            .and_then(|ammo_id| ammo_classes.get(ammo_id))
            .map_or_else(|| UNKNOWN_AMMO.to_string(), Clone::clone)
    });

    Some(WeaponType {
        id,
        name: element.get("name").unwrap_or_default().to_string(),
        kind: element.tag.trim_end_matches("Class").to_string(),
        skill: element.get("skill").map(ToString::to_string),
        equip_slot: element.get("equip_slot").map(ToString::to_string),
        ammo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xml::parse_xml;

    #[test]
    fn test_parse_weapon_classes() {
        let weapons = parse_xml(
            r#"<database><weapon_classes>
                <MissileWeaponClass id="20" name="bow" skill="marksmanship" equip_slot="bow" ammo_class="1"/>
                <MeleeWeaponClass id="2" name="sword" skill="sword" equip_slot="weapon"/>
                <MissileWeaponClass id="21" name="crossbow" skill="marksmanship" ammo_class="9"/>
                <MeleeWeaponClass id="bad" name="broken"/>
            </weapon_classes></database>"#,
        )
        .unwrap();
        let ammo = parse_xml(
            r#"<database><ammo_classes><ammo_class ammo_class_id="1" ammo_class_name="arrow"/></ammo_classes></database>"#,
        )
        .unwrap();

        let types = parse_weapon_classes(&weapons, &ammo);
        assert_eq!(types.iter().map(|w| w.id).collect::<Vec<_>>(), vec![2, 20, 21]);
        assert_eq!(types[0].kind, "MeleeWeapon");
        assert_eq!(types[0].ammo, None);
        assert_eq!(types[1].kind, "MissileWeapon");
        assert_eq!(types[1].ammo.as_deref(), Some("arrow"));
        assert_eq!(types[2].ammo.as_deref(), Some(UNKNOWN_AMMO));
        assert_eq!(types[2].equip_slot, None);
    }

    #[test]
    fn test_melee_serializes_without_ammo() {
        let weapon = WeaponType {
            id: 2,
            name: "sword".into(),
            kind: "MeleeWeapon".into(),
            skill: Some("sword".into()),
            equip_slot: Some("weapon".into()),
            ammo: None,
        };
        let json = serde_json::to_string(&weapon).unwrap();
        assert_eq!(
            json,
            r#"{"id":2,"name":"sword","type":"MeleeWeapon","skill":"sword","equip_slot":"weapon"}"#
        );
    }
}
