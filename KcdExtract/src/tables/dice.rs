//! Dice badge type tables

use crate::formats::xml::XmlDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dice badge type and subtype names keyed by id.
///
/// JSON object keys are strings; the integer ids are restored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceBadges {
    #[serde(default)]
    pub types: BTreeMap<i64, String>,
    #[serde(default)]
    pub subtypes: BTreeMap<i64, String>,
}

/// Parse `dice_badge_type.xml` and `dice_badge_subtype.xml`.
pub fn parse_dice_badges(type_doc: &XmlDocument, subtype_doc: &XmlDocument) -> DiceBadges {
    DiceBadges {
        types: id_name_table(type_doc, "dice_badge_type"),
        subtypes: id_name_table(subtype_doc, "dice_badge_subtype"),
    }
}

/// Flatten `<{tag} {tag}_id=".." {tag}_name=".."/>` rows into an id map.
fn id_name_table(doc: &XmlDocument, tag: &str) -> BTreeMap<i64, String> {
    let id_attr = format!("{tag}_id");
    let name_attr = format!("{tag}_name");
    let mut table = BTreeMap::new();

    for id in doc.find_all(tag) {
        let element = doc.element(id);
        match element.get(&id_attr).and_then(|v| v.trim().parse::<i64>().ok()) {
            Some(key) => {
                table.insert(key, element.get(&name_attr).unwrap_or_default().to_string());
            }
            None => tracing::warn!("Skipping {} with invalid id {:?}", tag, element.get(&id_attr)),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xml::parse_xml;

    #[test]
    fn test_parse_dice_badges() {
        let types = parse_xml(
            r#"<database><dice_badge_types>
                <dice_badge_type dice_badge_type_id="2" dice_badge_type_name="Silver"/>
                <dice_badge_type dice_badge_type_id="1" dice_badge_type_name="Tin"/>
            </dice_badge_types></database>"#,
        )
        .unwrap();
        let subtypes = parse_xml(
            r#"<database><dice_badge_subtypes>
                <dice_badge_subtype dice_badge_subtype_id="10" dice_badge_subtype_name="Resurrection"/>
                <dice_badge_subtype dice_badge_subtype_id="?" dice_badge_subtype_name="Broken"/>
            </dice_badge_subtypes></database>"#,
        )
        .unwrap();

        let badges = parse_dice_badges(&types, &subtypes);
        assert_eq!(badges.types.get(&1).map(String::as_str), Some("Tin"));
        assert_eq!(badges.types.len(), 2);
        assert_eq!(badges.subtypes.len(), 1);

        let json = serde_json::to_string(&badges).unwrap();
        assert_eq!(json, r#"{"types":{"1":"Tin","2":"Silver"},"subtypes":{"10":"Resurrection"}}"#);

        let back: DiceBadges = serde_json::from_str(&json).unwrap();
        assert_eq!(back, badges);
    }
}
