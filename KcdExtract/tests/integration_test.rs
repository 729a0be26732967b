use kcdextract::index::XML_INDEX_FILE;
use kcdextract::pipeline::build_dataset;
use kcdextract::prelude::*;
use kcdextract::store::DATASET_FILE;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const ITEMS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<database name="item">
    <ItemClasses>
        <MeleeWeapon Id="sword_01" Name="sword_hunting" UIName="ui_nm_sword" Class="2" Skill="sword"
            Weight="2.5" Price="1000" Attack="10" AttackModStab="1.5" AttackModSlash="1.0" AttackModSmash="0.3"/>
        <Hood Id="cap_01" Name="Leather Cap" DefenseStab="4" Price="120"/>
        <Armor Id="cuirass_01" Name="Plate Cuirass" DefenseSlash="30"/>
        <Die Id="die_01" Name="die_bone" Weight="1" Price="500" Material="bone"/>
        <Die Id="die_debug" Name="die_debug" IconId="TrafficCone"/>
        <Food Id="apple" Name="apple"/>
        <ItemAlias Id="ghost" Name="ghost" SourceItemId="nonexistent_id" Price="10"/>
    </ItemClasses>
</database>
"#;

const ITEMS_DLC: &str = r#"<database name="item">
    <ItemClasses>
        <ItemAlias Id="die_02" Name="die_bone_heavy" SourceItemId="die_01" Price="750"/>
        <ItemAlias Id="die_03" Name="die_bone_test" SourceItemId="die_01" IconId="trafficcone"/>
        <DiceBadge Id="badge_01" Name="badge_tin" Type="1" SubType="10"/>
    </ItemClasses>
</database>
"#;

const EQUIPMENT_SLOTS: &str = r#"<database><EquipmentSlots>
    <EquipmentSlot Id="3" Name="head" UIBodyPartId="1" UISlot="Head" ArmorTypes="Cap Hood Coif"/>
    <EquipmentSlot Id="13" Name="horse_torso" UISlot="HorseTorso"/>
</EquipmentSlots></database>"#;

const WEAPON_CLASSES: &str = r#"<database><weapon_classes>
    <MissileWeaponClass id="20" name="bow" skill="marksmanship" equip_slot="bow" ammo_class="1"/>
    <MeleeWeaponClass id="2" name="sword" skill="sword" equip_slot="weapon"/>
</weapon_classes></database>"#;

const AMMO_CLASSES: &str =
    r#"<database><ammo_classes><ammo_class ammo_class_id="1" ammo_class_name="arrow"/></ammo_classes></database>"#;

const BADGE_TYPES: &str = r#"<database><dice_badge_types>
    <dice_badge_type dice_badge_type_id="1" dice_badge_type_name="Tin"/>
</dice_badge_types></database>"#;

const BADGE_SUBTYPES: &str = r#"<database><dice_badge_subtypes>
    <dice_badge_subtype dice_badge_subtype_id="10" dice_badge_subtype_name="Resurrection"/>
</dice_badge_subtypes></database>"#;

const NAMES: &str = r#"<Table>
    <Row><Cell>ui_nm_sword</Cell><Cell>Sword</Cell><Cell>Hunting Sword</Cell></Row>
</Table>"#;

const VERSION_DESCRIPTOR: &str = r#"{
    "Assembly": {"Build": 101},
    "Preset": {"Branch": {"Name": "release_1_2", "Id": 3}}
}"#;

/// Data directory laid out as `extract` leaves it.
fn data_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("version.json"), VERSION_DESCRIPTOR).unwrap();

    let xml = dir.path().join("xml");
    fs::create_dir_all(&xml).unwrap();
    for (name, content) in [
        ("item.xml", ITEMS),
        ("item__dlc.xml", ITEMS_DLC),
        ("equipment_slot.xml", EQUIPMENT_SLOTS),
        ("weapon_class.xml", WEAPON_CLASSES),
        ("ammo_class.xml", AMMO_CLASSES),
        ("dice_badge_type.xml", BADGE_TYPES),
        ("dice_badge_subtype.xml", BADGE_SUBTYPES),
        ("text_ui_items.xml", NAMES),
    ] {
        fs::write(xml.join(name), content).unwrap();
    }
    dir
}

fn build(data_dir: &Path) -> BuildSummary {
    let registry = MappingRegistry::bundled().unwrap();
    build_dataset(data_dir, &ExtractConfig::default(), &registry, &|_| {}).unwrap()
}

fn load(data_dir: &Path) -> VersionedDataset {
    let store = DataStore::new(data_dir);
    store.load(&store.version_dir("1.2")).unwrap().0
}

fn ids(items: &[ItemRecord]) -> Vec<&str> {
    items.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn test_build_writes_versioned_dataset() {
    let data = data_fixture();
    let summary = build(data.path());

    assert_eq!(summary.version, "1.2");
    assert_eq!(summary.status, VersionStatus::New);
    assert_eq!(summary.dataset_path, data.path().join("1.2").join(DATASET_FILE));
    assert_eq!(summary.tables_loaded, 2);
    assert_eq!(summary.tables_missing, vec!["item_horse", "item_reward", "item_rewards"]);

    let dataset = load(data.path());
    assert_eq!(dataset.version.base, "1.2");
    assert_eq!(ids(&dataset.items.weapons), vec!["sword_01"]);
    assert_eq!(ids(&dataset.items.armors), vec!["cap_01", "cuirass_01"]);
    assert_eq!(ids(&dataset.items.dice), vec!["die_01", "die_02"]);
    assert_eq!(ids(&dataset.items.dice_badges), vec!["badge_01"]);

    assert_eq!(dataset.armor_types.len(), 2);
    assert_eq!(dataset.weapon_types.iter().map(|w| w.id).collect::<Vec<_>>(), vec![2, 20]);
    assert_eq!(dataset.dice_badges.types.get(&1).map(String::as_str), Some("Tin"));

    let sword = dataset.items.find("sword_01").unwrap();
    assert_eq!(sword.display_name.as_deref(), Some("Hunting Sword"));
}

#[test]
fn test_side_files_use_logical_ids() {
    let data = data_fixture();
    build(data.path());

    let raw = fs::read_to_string(data.path().join("1.2").join(XML_INDEX_FILE)).unwrap();
    let index: FileIndex = serde_json::from_str(&raw).unwrap();
    assert_eq!(index.get("item_dlc"), Some(Path::new("xml/item__dlc.xml")));
    assert!(index.contains("text_ui_items"));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let data = data_fixture();
    build(data.path());
    let path = data.path().join("1.2").join(DATASET_FILE);
    let first = fs::read(&path).unwrap();

    let summary = build(data.path());
    assert_eq!(summary.status, VersionStatus::Unchanged);
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_alias_inherits_and_overrides() {
    let data = data_fixture();
    build(data.path());
    let dataset = load(data.path());

    let source = dataset.items.find("die_01").unwrap();
    let alias = dataset.items.find("die_02").unwrap();
    assert_eq!(alias.item_type, ItemType::Die);
    assert_eq!(alias.name, "die_bone_heavy");
    assert_eq!(alias.stats.get("Weight"), source.stats.get("Weight"));
    assert_eq!(alias.stats.get("Weight"), Some(&FieldValue::Integer(1)));
    assert_eq!(source.stats.get("Price"), Some(&FieldValue::Integer(50)));
    assert_eq!(alias.stats.get("Price"), Some(&FieldValue::Integer(75)));
    assert_eq!(alias.attributes.get("Material"), Some(&FieldValue::Text("bone".to_string())));
}

#[test]
fn test_dangling_alias_is_dropped() {
    let data = data_fixture();
    let summary = build(data.path());

    assert!(load(data.path()).items.find("ghost").is_none());
    assert!(summary.aliases.dropped >= 1);
}

#[test]
fn test_filter_applies_to_items_and_aliases() {
    let data = data_fixture();
    let summary = build(data.path());
    let dataset = load(data.path());

    // die_03 inherits from an item that passes, but its own IconId is rejected.
    assert!(dataset.items.find("die_debug").is_none());
    assert!(dataset.items.find("die_03").is_none());
    assert_eq!(summary.normalize.filtered, 2);
}

#[test]
fn test_derived_attack_stats() {
    let data = data_fixture();
    build(data.path());
    let sword = load(data.path()).items.find("sword_01").cloned().unwrap();

    assert_eq!(sword.stats.get("AttackStab"), Some(&FieldValue::Integer(15)));
    assert_eq!(sword.stats.get("AttackSlash"), Some(&FieldValue::Integer(10)));
    assert_eq!(sword.stats.get("AttackSmash"), Some(&FieldValue::Integer(3)));
    for raw in ["Attack", "AttackModStab", "AttackModSlash", "AttackModSmash"] {
        assert!(!sword.stats.contains_key(raw), "{raw} should be consumed");
    }
    assert_eq!(sword.attributes.get("Type"), Some(&FieldValue::Integer(2)));
}

#[test]
fn test_armor_slot_inference() {
    let data = data_fixture();
    build(data.path());
    let dataset = load(data.path());

    let cap = dataset.items.find("cap_01").unwrap();
    assert_eq!(cap.item_type, ItemType::Armor);
    assert_eq!(cap.slot, Some(3));

    let cuirass = dataset.items.find("cuirass_01").unwrap();
    assert_eq!(cuirass.slot, None);
    let json = serde_json::to_value(cuirass).unwrap();
    assert!(json.get("slot").is_none());
}

#[test]
fn test_deterministic_ordering_across_data_dirs() {
    let first = data_fixture();
    let second = data_fixture();
    build(first.path());
    build(second.path());

    assert_eq!(load(first.path()).items, load(second.path()).items);
}

#[test]
fn test_numeric_coercion_boundary() {
    assert_eq!(FieldValue::coerce("3.0"), FieldValue::Integer(3));
    assert_eq!(FieldValue::coerce("3.5"), FieldValue::Float(3.5));
    assert_eq!(FieldValue::coerce("abc"), FieldValue::Text("abc".to_string()));
}

#[test]
fn test_missing_side_table_writes_nothing() {
    let data = data_fixture();
    fs::remove_file(data.path().join("xml").join("ammo_class.xml")).unwrap();

    let registry = MappingRegistry::bundled().unwrap();
    let result = build_dataset(data.path(), &ExtractConfig::default(), &registry, &|_| {});
    assert!(matches!(result, Err(Error::RequiredFileMissing { ref file_id }) if file_id == "ammo_class"));
    assert!(!data.path().join("1.2").join(DATASET_FILE).exists());
}
