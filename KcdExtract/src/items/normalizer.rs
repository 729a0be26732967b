//! Item normalization
//!
//! Turns the merged item tree into [`ItemRecord`]s grouped by subcategory.

use super::filter::ItemFilter;
use super::types::{ItemBuckets, ItemRecord, ItemType, Subcategory};
use crate::error::Result;
use crate::formats::xml::{XmlDocument, XmlElement};
use crate::mapping::{Domain, FieldMap, FieldValue, MappingRegistry, apply_transforms};
use crate::merge::{ALIAS_TAG, SOURCE_ATTRIBUTE, find_container};
use crate::tables::{ArmorType, LocalizedNames, infer_slot};
use std::collections::{HashMap, HashSet};

/// Raw tags normalized by default.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "MeleeWeapon",
    "MissileWeapon",
    "Armor",
    "Hood",
    "Helmet",
    "Horse",
    "Die",
    "DiceBadge",
];

/// Counters collected by [`ItemNormalizer::normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Base items written to a bucket.
    pub items: usize,
    /// Alias items written to a bucket.
    pub aliases: usize,
    /// Items and aliases rejected by the filter.
    pub filtered: usize,
    /// Elements whose tag is not in the category list.
    pub ignored: usize,
    /// Listed categories without an output bucket.
    pub unknown_type: usize,
    /// Aliases whose source is not a normalized item.
    pub dropped_aliases: usize,
    /// Records whose id was already emitted.
    pub duplicates: usize,
    /// Elements without an `Id`.
    pub missing_id: usize,
}

/// Normalizes merged item trees.
///
/// ```no_run
/// use kcdextract::items::ItemNormalizer;
/// use kcdextract::mapping::MappingRegistry;
///
/// # fn run(merged: &kcdextract::formats::xml::XmlDocument) -> kcdextract::Result<()> {
/// let registry = MappingRegistry::bundled()?;
/// let (items, report) = ItemNormalizer::new(&registry).normalize(merged)?;
/// println!("{} weapons, {} filtered", items.weapons.len(), report.filtered);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ItemNormalizer<'a> {
    registry: &'a MappingRegistry,
    categories: Vec<String>,
    filter: ItemFilter,
    armor_types: &'a [ArmorType],
    names: Option<&'a LocalizedNames>,
}

/// Where an emitted record lives.
#[derive(Debug, Clone, Copy)]
struct Emitted {
    subcategory: Subcategory,
    index: usize,
}

/// Per-run bookkeeping.
#[derive(Default)]
struct State {
    buckets: ItemBuckets,
    report: NormalizeReport,
    emitted: HashMap<String, Emitted>,
    /// Items of a normalized type that were filtered out.
    rejected: HashMap<String, ItemType>,
    seen_ids: HashSet<String>,
}

impl<'a> ItemNormalizer<'a> {
    pub fn new(registry: &'a MappingRegistry) -> Self {
        Self {
            registry,
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            filter: ItemFilter::default(),
            armor_types: &[],
            names: None,
        }
    }

    /// Raw tags to normalize.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ItemFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Armor slots used for slot inference, in matching order.
    #[must_use]
    pub fn with_armor_types(mut self, armor_types: &'a [ArmorType]) -> Self {
        self.armor_types = armor_types;
        self
    }

    /// Localized names stamped onto records through `UIName`.
    #[must_use]
    pub fn with_names(mut self, names: &'a LocalizedNames) -> Self {
        self.names = Some(names);
        self
    }

    /// Normalize the children of the merged `ItemClasses` container in
    /// document order.
    ///
    /// # Errors
    /// Returns an error if the document has no `ItemClasses` container.
    pub fn normalize(&self, doc: &XmlDocument) -> Result<(ItemBuckets, NormalizeReport)> {
        let container = find_container(doc, "merged items")?;
        let mut state = State::default();

        for &id in doc.children(container) {
            let element = doc.element(id);
            if element.tag == ALIAS_TAG {
                self.normalize_alias(element, &mut state);
            } else if self.categories.contains(&element.tag) {
                self.normalize_item(element, &mut state);
            } else {
                state.report.ignored += 1;
            }
        }

        tracing::info!(
            "Normalized {} items and {} aliases ({} filtered, {} duplicates)",
            state.report.items,
            state.report.aliases,
            state.report.filtered,
            state.report.duplicates
        );
        Ok((state.buckets, state.report))
    }

    fn normalize_item(&self, element: &XmlElement, state: &mut State) {
        let item_type = ItemType::from_tag(&element.tag);
        let Some(subcategory) = item_type.subcategory() else {
            tracing::warn!("Unknown item type: {}. Skipping...", element.tag);
            state.report.unknown_type += 1;
            return;
        };

        if self.filter.rejects(element) {
            state.report.filtered += 1;
            if let Some(id) = element.get("Id") {
                state.rejected.insert(id.to_string(), item_type);
            }
            return;
        }

        let Some(mut record) = self.build_record(element, item_type) else {
            state.report.missing_id += 1;
            return;
        };
        record.slot = self.infer_slot(&record);

        if self.emit(record, subcategory, state) {
            state.report.items += 1;
        }
    }

    fn normalize_alias(&self, element: &XmlElement, state: &mut State) {
        let Some(source_id) = element.get(SOURCE_ATTRIBUTE) else {
            state.report.dropped_aliases += 1;
            return;
        };

        let source = state.emitted.get(source_id).copied();
        let item_type = match source {
            Some(source) => state.buckets.bucket(source.subcategory)[source.index].item_type.clone(),
            None => match state.rejected.get(source_id) {
                Some(item_type) => item_type.clone(),
                None => {
                    tracing::debug!(
                        "Dropping alias {:?}: source {} is not a normalized item",
                        element.get("Id"),
                        source_id
                    );
                    state.report.dropped_aliases += 1;
                    return;
                }
            },
        };

        if self.filter.rejects(element) {
            state.report.filtered += 1;
            if let Some(id) = element.get("Id") {
                state.rejected.insert(id.to_string(), item_type);
            }
            return;
        }

        let Some(subcategory) = item_type.subcategory() else {
            state.report.unknown_type += 1;
            return;
        };
        let Some(mut record) = self.build_record(element, item_type) else {
            state.report.missing_id += 1;
            return;
        };

        if let Some(source) = source {
            let inherited = &state.buckets.bucket(source.subcategory)[source.index];
            record.attributes = overlay(&inherited.attributes, record.attributes);
            record.stats = overlay(&inherited.stats, record.stats);
            record.slot = self.infer_slot(&record).or(inherited.slot);
        } else {
            record.slot = self.infer_slot(&record);
        }

        if self.emit(record, subcategory, state) {
            state.report.aliases += 1;
        }
    }

    /// Extract, transform and wrap the fields of `element` for `item_type`.
    ///
    /// Returns `None` when the element has no `Id`.
    fn build_record(&self, element: &XmlElement, item_type: ItemType) -> Option<ItemRecord> {
        let mut attributes = self.extract(element, Domain::Attributes, &item_type);
        let stats = self.extract(element, Domain::Stats, &item_type);

        let Some(id) = attributes.shift_remove("Id").map(|v| v.to_string()) else {
            tracing::warn!("Skipping {} without Id", element.tag);
            return None;
        };
        let name = attributes
            .shift_remove("Name")
            .map(|v| v.to_string())
            .unwrap_or_default();

        let localized = attributes
            .get("UIName")
            .and_then(FieldValue::as_str)
            .and_then(|key| self.names?.get(key));

        Some(ItemRecord {
            id,
            name,
            item_type,
            display_name: localized.and_then(|n| n.item_name.clone()),
            alt_name: localized.and_then(|n| n.alt_name.clone()),
            slot: None,
            attributes,
            stats,
        })
    }

    fn extract(&self, element: &XmlElement, domain: Domain, item_type: &ItemType) -> FieldMap {
        let mut bucket: FieldMap = self
            .registry
            .fields_for(domain, item_type.as_str())
            .into_iter()
            .filter_map(|field| Some((field.to_string(), FieldValue::coerce(element.get(field)?))))
            .collect();
        apply_transforms(&mut bucket, self.registry.transforms_for(domain));
        bucket
    }

    fn infer_slot(&self, record: &ItemRecord) -> Option<u32> {
        if record.item_type != ItemType::Armor {
            return None;
        }
        infer_slot(self.armor_types, &record.name).map(|slot| slot.id)
    }

    /// Append `record` to its bucket unless its id was seen before.
    fn emit(&self, record: ItemRecord, subcategory: Subcategory, state: &mut State) -> bool {
        if !state.seen_ids.insert(record.id.clone()) {
            tracing::warn!("Duplicate item id {}, keeping the first occurrence", record.id);
            state.report.duplicates += 1;
            return false;
        }
        let bucket = state.buckets.bucket_mut(subcategory);
        state.emitted.insert(
            record.id.clone(),
            Emitted {
                subcategory,
                index: bucket.len(),
            },
        );
        bucket.push(record);
        true
    }
}

/// `base` with every field of `overrides` written over it.
fn overlay(base: &FieldMap, overrides: FieldMap) -> FieldMap {
    let mut merged = base.clone();
    for (name, value) in overrides {
        merged.insert(name, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xml::parse_xml;
    use crate::merge::resolve_aliases;
    use crate::tables::parse_equipment_slots;
    use pretty_assertions::assert_eq;

    fn normalize(xml: &str) -> (ItemBuckets, NormalizeReport) {
        let registry = MappingRegistry::bundled().unwrap();
        let mut doc = parse_xml(xml).unwrap();
        resolve_aliases(&mut doc);
        ItemNormalizer::new(&registry).normalize(&doc).unwrap()
    }

    #[test]
    fn test_weapon_derived_stats() {
        let (items, _) = normalize(
            r#"<db><ItemClasses>
                <MeleeWeapon Id="sword_01" Name="sword_hunting" Class="4" Skill="sword"
                    Weight="2.5" Price="1000" Attack="10" AttackModStab="1.5" AttackModSlash="1.0" AttackModSmash="0.3"/>
            </ItemClasses></db>"#,
        );
        let sword = &items.weapons[0];
        assert_eq!(sword.id, "sword_01");
        assert_eq!(sword.name, "sword_hunting");
        assert_eq!(sword.item_type, ItemType::MeleeWeapon);
        assert_eq!(sword.attributes.get("Type"), Some(&FieldValue::Integer(4)));
        assert!(!sword.attributes.contains_key("Class"));

        let stats: Vec<_> = sword.stats.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        assert_eq!(
            stats,
            vec![
                ("Weight", FieldValue::Float(2.5)),
                ("Price", FieldValue::Integer(100)),
                ("AttackStab", FieldValue::Integer(15)),
                ("AttackSlash", FieldValue::Integer(10)),
                ("AttackSmash", FieldValue::Integer(3)),
            ]
        );
    }

    #[test]
    fn test_hood_is_armor_with_slot() {
        let registry = MappingRegistry::bundled().unwrap();
        let slots = parse_equipment_slots(
            &parse_xml(
                r#"<db><EquipmentSlot Id="3" Name="head" UISlot="Head" ArmorTypes="Cap Hood"/>
                <EquipmentSlot Id="5" Name="body" UISlot="Body" ArmorTypes="Gambeson"/></db>"#,
            )
            .unwrap(),
        );
        let doc = parse_xml(
            r#"<db><ItemClasses>
                <Hood Id="h1" Name="Leather Cap" DefenseStab="4"/>
                <Armor Id="a1" Name="Plate Cuirass"/>
            </ItemClasses></db>"#,
        )
        .unwrap();
        let (items, _) = ItemNormalizer::new(&registry)
            .with_armor_types(&slots)
            .normalize(&doc)
            .unwrap();

        assert_eq!(items.armors.len(), 2);
        assert_eq!(items.armors[0].item_type, ItemType::Armor);
        assert_eq!(items.armors[0].slot, Some(3));
        assert_eq!(items.armors[0].stats.get("DefenseStab"), Some(&FieldValue::Integer(4)));
        assert_eq!(items.armors[1].slot, None);
    }

    #[test]
    fn test_alias_overrides_source() {
        let (items, report) = normalize(
            r#"<db><ItemClasses>
                <Die Id="die_01" Name="die_bone" Weight="1" Price="500" Material="bone"/>
                <ItemAlias Id="die_02" Name="die_bone_heavy" SourceItemId="die_01" Price="750"/>
            </ItemClasses></db>"#,
        );
        assert_eq!(report.items, 1);
        assert_eq!(report.aliases, 1);

        let alias = items.find("die_02").unwrap();
        assert_eq!(alias.item_type, ItemType::Die);
        assert_eq!(alias.name, "die_bone_heavy");
        assert_eq!(alias.stats.get("Weight"), Some(&FieldValue::Integer(1)));
        assert_eq!(alias.stats.get("Price"), Some(&FieldValue::Integer(75)));
        assert_eq!(alias.attributes.get("Material"), Some(&FieldValue::Text("bone".into())));
    }

    #[test]
    fn test_filter_applies_to_aliases_both_ways() {
        let (items, report) = normalize(
            r#"<db><ItemClasses>
                <Armor Id="ok" Name="cap"/>
                <ItemAlias Id="ok_debug" SourceItemId="ok" IconId="TrafficCone"/>
                <Armor Id="debug" Name="cap" UIInfo="ui_in_warning"/>
                <ItemAlias Id="debug_fixed" SourceItemId="debug" UIInfo="ui_in_cap"/>
            </ItemClasses></db>"#,
        );
        let ids: Vec<_> = items.armors.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "debug_fixed"]);
        assert_eq!(report.filtered, 2);
    }

    #[test]
    fn test_unlisted_and_unknown_tags() {
        let registry = MappingRegistry::bundled().unwrap();
        let doc = parse_xml(
            r#"<db><ItemClasses>
                <Food Id="apple"/>
                <Herb Id="sage"/>
                <Die Id="d"/>
                <ItemAlias Id="apple_2" SourceItemId="apple"/>
            </ItemClasses></db>"#,
        )
        .unwrap();
        let (items, report) = ItemNormalizer::new(&registry)
            .with_categories(vec!["Die".into(), "Food".into()])
            .normalize(&doc)
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(report.unknown_type, 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.dropped_aliases, 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let (items, report) = normalize(
            r#"<db><ItemClasses>
                <Die Id="d" Material="bone"/>
                <Die Id="d" Material="wood"/>
                <Die Name="no_id"/>
            </ItemClasses></db>"#,
        );
        assert_eq!(items.dice.len(), 1);
        assert_eq!(items.dice[0].attributes.get("Material"), Some(&FieldValue::Text("bone".into())));
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.missing_id, 1);
    }

    #[test]
    fn test_display_names() {
        let registry = MappingRegistry::bundled().unwrap();
        let names = LocalizedNames::from_document(
            &parse_xml("<Table><Row><Cell>ui_nm_die</Cell><Cell>Bone</Cell><Cell>Bone Die</Cell></Row></Table>")
                .unwrap(),
        );
        let doc = parse_xml(r#"<db><ItemClasses><Die Id="d" UIName="ui_nm_die"/></ItemClasses></db>"#).unwrap();
        let (items, _) = ItemNormalizer::new(&registry).with_names(&names).normalize(&doc).unwrap();

        assert_eq!(items.dice[0].display_name.as_deref(), Some("Bone Die"));
        assert_eq!(items.dice[0].alt_name.as_deref(), Some("Bone"));
    }
}
