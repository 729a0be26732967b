//! Post-merge pruning of irrelevant elements and attributes

use super::combine::ITEM_CONTAINER;
use crate::formats::xml::XmlDocument;
use crate::items::ItemFilter;
use serde::{Deserialize, Serialize};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// What [`prune`] removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneOptions {
    /// Element tags removed with their subtree.
    pub remove_tags: Vec<String>,
    /// Elements whose `UIName` is listed are removed.
    pub remove_ui_names: Vec<String>,
    /// Attributes stripped from every remaining element.
    pub remove_attributes: Vec<String>,
    /// Tags whose children and text are dropped, leaving an empty marker.
    pub hollow_tags: Vec<String>,
    /// Remove elements rejected by the item filter.
    pub apply_filter: bool,
    /// Stable-sort the item container's children by tag.
    pub sort_by_tag: bool,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            remove_tags: strings(&[
                "NPCTool",
                "MiscItem",
                "Food",
                "Herb",
                "PickableItem",
                "Poison",
                "AlchemyBase",
                "Ointment",
                "Ammo",
                "CraftingMaterial",
            ]),
            remove_ui_names: strings(&["ui_nm_torch"]),
            remove_attributes: strings(&[
                "SocialClassId",
                "WealthLevel",
                "IsBreakable",
                "BrokenItemClassId",
                "FadeCoef",
                "VisibilityCoef",
                "Model",
                "PickpocketInPouch",
                "RPGBuffWeight",
            ]),
            hollow_tags: strings(&["Document"]),
            apply_filter: true,
            sort_by_tag: false,
        }
    }
}

/// Counts reported by [`prune`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub removed_elements: usize,
    pub removed_attributes: usize,
    pub hollowed: usize,
}

/// Prune `doc` in place.
pub fn prune(doc: &mut XmlDocument, options: &PruneOptions, filter: &ItemFilter) -> PruneReport {
    let mut report = PruneReport::default();

    for id in doc.descendants(doc.root()) {
        if !doc.is_attached(id) {
            continue;
        }
        let element = doc.element(id);
        let remove = options.remove_tags.contains(&element.tag)
            || element
                .get("UIName")
                .is_some_and(|name| options.remove_ui_names.iter().any(|n| n == name))
            || (options.apply_filter && filter.rejects(element));
        if remove {
            doc.detach(id);
            report.removed_elements += 1;
        }
    }

    for id in doc.descendants(doc.root()) {
        if !doc.is_attached(id) {
            continue;
        }
        let element = doc.element_mut(id);
        let before = element.attributes.len();
        element
            .attributes
            .retain(|name, _| !options.remove_attributes.contains(name));
        report.removed_attributes += before - element.attributes.len();

        if options.hollow_tags.contains(&element.tag) {
            doc.clear_content(id);
            report.hollowed += 1;
        }
    }

    if options.sort_by_tag
        && let Some(container) = doc.find_first(ITEM_CONTAINER)
    {
        doc.sort_children_by_tag(container);
    }

    tracing::info!(
        "Pruned {} elements and {} attributes, hollowed {} elements",
        report.removed_elements,
        report.removed_attributes,
        report.hollowed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xml::parse_xml;

    const ITEMS: &str = r#"<db><ItemClasses>
        <Food Id="apple"/>
        <Armor Id="cap" WealthLevel="2" Model="cap.cgf" Weight="1"/>
        <MiscItem Id="torch" UIName="ui_nm_torch"/>
        <MeleeWeapon Id="torch2" UIName="ui_nm_torch"/>
        <Document Id="letter"><Page>Dear friend</Page></Document>
        <Armor Id="debug" IconId="TrafficCone"/>
        <Die Id="die"/>
    </ItemClasses></db>"#;

    fn ids(doc: &XmlDocument) -> Vec<String> {
        let container = doc.find_first(ITEM_CONTAINER).unwrap();
        doc.children(container)
            .iter()
            .map(|&id| doc.element(id).get("Id").unwrap_or("?").to_string())
            .collect()
    }

    #[test]
    fn test_default_prune() {
        let mut doc = parse_xml(ITEMS).unwrap();
        let report = prune(&mut doc, &PruneOptions::default(), &ItemFilter::default());

        assert_eq!(ids(&doc), vec!["cap", "letter", "die"]);
        assert_eq!(report.removed_elements, 4);
        assert_eq!(report.removed_attributes, 2);
        assert_eq!(report.hollowed, 1);

        let cap = doc.find_by_attribute("Id", "cap", |_| false).unwrap();
        let attributes: Vec<_> = doc.element(cap).attributes.keys().cloned().collect();
        assert_eq!(attributes, vec!["Id", "Weight"]);

        let letter = doc.find_first("Document").unwrap();
        assert!(doc.children(letter).is_empty());
        assert_eq!(doc.element(letter).get("Id"), Some("letter"));
    }

    #[test]
    fn test_sorted_by_tag() {
        let mut doc = parse_xml(ITEMS).unwrap();
        let options = PruneOptions {
            sort_by_tag: true,
            apply_filter: false,
            ..PruneOptions::default()
        };
        prune(&mut doc, &options, &ItemFilter::default());
        // Stable: the two Armor elements keep their relative order
        assert_eq!(ids(&doc), vec!["cap", "debug", "die", "letter"]);
    }
}
