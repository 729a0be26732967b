//! End-to-end dataset build
//!
//! Reads the extracted tables indexed under `<data_dir>/xml`, merges and
//! normalizes the item tables, and writes `<data_dir>/<version>/data.json`
//! together with the file index side files.

use crate::archive::XML_DIR;
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::formats::xml::{XmlDocument, read_xml, write_xml};
use crate::index::{FileIndex, ICON_INDEX_FILE, XML_INDEX_FILE};
use crate::items::{ItemNormalizer, NormalizeReport, Subcategory};
use crate::mapping::MappingRegistry;
use crate::merge::{AliasReport, ItemSource, PruneReport, merge_item_trees, prune, resolve_aliases};
use crate::store::{DATASET_FILE, DataStore, DatasetBuilder};
use crate::tables::{
    ArmorType, DiceBadges, LocalizedNames, WeaponType, parse_dice_badges, parse_equipment_slots,
    parse_weapon_classes,
};
use crate::version::{VersionStatus, resolve_version};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the data root holding converted icons.
pub const ICON_DIR: &str = "icons";

/// File name of the merged item dump.
pub const MERGED_FILE: &str = "items_merged.xml";

/// File name of the pruned item dump.
pub const PURGED_FILE: &str = "items_purged.xml";

/// Progress callback for build phases
pub type PhaseCallback<'a> = &'a (dyn Fn(BuildPhase) + Sync + Send);

/// Phase of a dataset build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    ResolvingVersion,
    LoadingTables,
    MergingItems,
    Normalizing,
    Writing,
}

impl BuildPhase {
    /// Number of phases in a build.
    pub const COUNT: usize = 5;

    /// 1-based position of this phase
    #[must_use]
    pub fn step(self) -> usize {
        match self {
            Self::ResolvingVersion => 1,
            Self::LoadingTables => 2,
            Self::MergingItems => 3,
            Self::Normalizing => 4,
            Self::Writing => 5,
        }
    }

    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResolvingVersion => "Resolving game version",
            Self::LoadingTables => "Loading side tables",
            Self::MergingItems => "Merging item tables",
            Self::Normalizing => "Normalizing items",
            Self::Writing => "Writing dataset",
        }
    }
}

/// Lookup tables used while normalizing, all parsed from required files.
#[derive(Debug, Clone)]
pub struct SideTables {
    pub armor_types: Vec<ArmorType>,
    pub weapon_types: Vec<WeaponType>,
    pub dice_badges: DiceBadges,
    pub names: LocalizedNames,
}

impl SideTables {
    /// Load every side table named in `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::RequiredFileMissing`] if a table is not indexed,
    /// or a parse error.
    pub fn load(index: &FileIndex) -> Result<Self> {
        let armor_types = parse_equipment_slots(&read_xml(index.require("equipment_slot")?)?);
        let weapon_types = parse_weapon_classes(
            &read_xml(index.require("weapon_class")?)?,
            &read_xml(index.require("ammo_class")?)?,
        );
        let dice_badges = parse_dice_badges(
            &read_xml(index.require("dice_badge_type")?)?,
            &read_xml(index.require("dice_badge_subtype")?)?,
        );
        let names = LocalizedNames::from_document(&read_xml(index.require("text_ui_items")?)?);

        tracing::info!(
            "Loaded {} armor types, {} weapon types, {} badge types, {} localized names",
            armor_types.len(),
            weapon_types.len(),
            dice_badges.types.len(),
            names.len()
        );
        Ok(Self {
            armor_types,
            weapon_types,
            dice_badges,
            names,
        })
    }
}

/// Item tables found for a run.
#[derive(Debug, Clone)]
pub struct ItemTables {
    pub sources: Vec<ItemSource>,
    /// Optional table ids that were not indexed
    pub missing: Vec<String>,
}

/// Read the item tables named in `item_files`. The first id is the base
/// table and is required; the rest are skipped with a warning when absent.
///
/// # Errors
/// Returns an error if the base table is missing or any table fails to parse.
pub fn load_item_tables(index: &FileIndex, item_files: &[String]) -> Result<ItemTables> {
    let mut tables = ItemTables {
        sources: Vec::with_capacity(item_files.len()),
        missing: Vec::new(),
    };

    for (position, id) in item_files.iter().enumerate() {
        let path = if position == 0 {
            index.require(id)?
        } else {
            match index.require(id) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("Skipping item table {}: {}", id, e);
                    tables.missing.push(id.clone());
                    continue;
                }
            }
        };
        tables.sources.push(ItemSource::new(id.clone(), read_xml(path)?));
    }
    Ok(tables)
}

/// Combined item tree with aliases resolved.
#[derive(Debug, Clone)]
pub struct MergedItems {
    pub document: XmlDocument,
    pub tables_loaded: usize,
    pub tables_missing: Vec<String>,
    pub aliases: AliasReport,
}

/// Merge the configured item tables and resolve their aliases.
///
/// # Errors
/// Returns an error if the base table is missing or malformed.
pub fn merge_items(index: &FileIndex, config: &ExtractConfig) -> Result<MergedItems> {
    let tables = load_item_tables(index, &config.item_files)?;
    let mut document = merge_item_trees(&tables.sources, &config.merge)?;
    let aliases = resolve_aliases(&mut document);
    tracing::info!(
        "Merged {} item tables, resolved {} aliases in {} groups ({} dropped)",
        tables.sources.len(),
        aliases.resolved,
        aliases.groups,
        aliases.dropped
    );
    Ok(MergedItems {
        document,
        tables_loaded: tables.sources.len(),
        tables_missing: tables.missing,
        aliases,
    })
}

/// Outcome of [`build_dataset`].
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub version: String,
    pub status: VersionStatus,
    pub dataset_path: PathBuf,
    pub tables_loaded: usize,
    pub tables_missing: Vec<String>,
    pub aliases: AliasReport,
    pub normalize: NormalizeReport,
    /// Records per output bucket
    pub counts: Vec<(Subcategory, usize)>,
    pub indexed_files: usize,
    pub indexed_icons: usize,
}

/// Build the dataset of the current version from the tables under `data_dir`.
///
/// The document is assembled in memory and written once, replacing any
/// previous `data.json` of the same version.
///
/// # Errors
/// Returns an error if the version cannot be resolved, a required table is
/// missing or malformed, or output cannot be written.
pub fn build_dataset(
    data_dir: &Path,
    config: &ExtractConfig,
    registry: &MappingRegistry,
    on_phase: PhaseCallback,
) -> Result<BuildSummary> {
    on_phase(BuildPhase::ResolvingVersion);
    let resolved = resolve_version(data_dir)?;

    on_phase(BuildPhase::LoadingTables);
    let index = FileIndex::scan_xml(&data_dir.join(XML_DIR));
    let icons = FileIndex::scan_icons(&data_dir.join(ICON_DIR));
    let tables = SideTables::load(&index)?;

    on_phase(BuildPhase::MergingItems);
    let merged = merge_items(&index, config)?;

    on_phase(BuildPhase::Normalizing);
    let (items, normalize) = ItemNormalizer::new(registry)
        .with_categories(config.categories.clone())
        .with_filter(config.filter.clone())
        .with_armor_types(&tables.armor_types)
        .with_names(&tables.names)
        .normalize(&merged.document)?;
    let counts = Subcategory::ALL
        .iter()
        .map(|&sub| (sub, items.bucket(sub).len()))
        .collect();

    on_phase(BuildPhase::Writing);
    let mut builder = DatasetBuilder::new(&resolved.version)?;
    builder
        .categories(config.categories.clone())
        .armor_types(tables.armor_types)
        .weapon_types(tables.weapon_types)
        .dice_badges(tables.dice_badges)
        .items(items);
    let dataset = builder.build();

    let store = DataStore::new(data_dir);
    let version_dir = store.version_dir(&resolved.version);
    fs::create_dir_all(&version_dir)?;
    let dataset_path = version_dir.join(DATASET_FILE);
    DataStore::save(&dataset, &dataset_path)?;
    store.write_side_file(&version_dir, XML_INDEX_FILE, &index.relative_to(data_dir))?;
    store.write_side_file(&version_dir, ICON_INDEX_FILE, &icons.relative_to(data_dir))?;
    tracing::info!("Wrote {} items to {}", normalize.items + normalize.aliases, dataset_path.display());

    Ok(BuildSummary {
        version: resolved.version,
        status: resolved.status,
        dataset_path,
        tables_loaded: merged.tables_loaded,
        tables_missing: merged.tables_missing,
        aliases: merged.aliases,
        normalize,
        counts,
        indexed_files: index.len(),
        indexed_icons: icons.len(),
    })
}

/// Paths written by [`export_merged`].
#[derive(Debug, Clone)]
pub struct MergedExport {
    pub merged_path: PathBuf,
    pub purged: Option<(PathBuf, PruneReport)>,
}

/// Write the merged item tree to `out_dir`, and a pruned copy when `purge`
/// is set.
///
/// # Errors
/// Returns an error if merging fails or a dump cannot be written.
pub fn export_merged(
    data_dir: &Path,
    config: &ExtractConfig,
    out_dir: &Path,
    purge: bool,
) -> Result<MergedExport> {
    let index = FileIndex::scan_xml(&data_dir.join(XML_DIR));
    let mut merged = merge_items(&index, config)?;

    fs::create_dir_all(out_dir)?;
    let merged_path = out_dir.join(MERGED_FILE);
    write_xml(&merged.document, &merged_path)?;
    tracing::info!("Wrote {}", merged_path.display());

    let purged = if purge {
        let report = prune(&mut merged.document, &config.prune, &config.filter);
        let purged_path = out_dir.join(PURGED_FILE);
        write_xml(&merged.document, &purged_path)?;
        tracing::info!(
            "Wrote {} ({} elements and {} attributes removed)",
            purged_path.display(),
            report.removed_elements,
            report.removed_attributes
        );
        Some((purged_path, report))
    } else {
        None
    };

    Ok(MergedExport { merged_path, purged })
}
