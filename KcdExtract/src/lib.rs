//! # KcdExtract
//!
//! Item data extraction for Kingdom Come: Deliverance II.
//!
//! The game's item tables are spread over several XML files with
//! overlapping sections, alias entries that inherit from other items, and
//! engine-internal field names and units. This crate turns them into one
//! versioned JSON document per game build.
//!
//! ## Pipeline
//!
//! - **Archives** - collect item tables and localized names from the `.pak` containers
//! - **Merge** - combine the item tables into one tree and resolve `ItemAlias` inheritance
//! - **Normalize** - map raw elements to typed item records through a declarative field mapping
//! - **Store** - write `<data dir>/<version>/data.json` with the armor, weapon and dice side tables
//!
//! ## Quick Start
//!
//! ```no_run
//! use kcdextract::config::ExtractConfig;
//! use kcdextract::mapping::MappingRegistry;
//! use kcdextract::pipeline::build_dataset;
//!
//! let config = ExtractConfig::load(None)?;
//! let registry = MappingRegistry::bundled()?;
//! let summary = build_dataset(&config.data_dir(), &config, &registry, &|_| {})?;
//! println!("Wrote {}", summary.dataset_path.display());
//! # Ok::<(), kcdextract::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use kcdextract::prelude::*;
//!
//! // Now you have access to:
//! // - XmlDocument, MappingRegistry, ItemNormalizer
//! // - DataStore, VersionedDataset, FileIndex
//! // - Error, Result, and more
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `kcdextract` command-line binary

pub mod error;
pub mod formats;
pub mod mapping;
pub mod merge;
pub mod items;
pub mod tables;
pub mod store;
pub mod version;
pub mod archive;
pub mod index;
pub mod paths;
pub mod config;
pub mod pipeline;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::xml::{ElementId, XmlDocument, XmlElement, parse_xml, read_xml, write_xml};

    pub use crate::mapping::{Domain, FieldMap, FieldValue, Formula, MappingRegistry, Transform};
    pub use crate::merge::{ItemSource, MergeOptions, PruneOptions, merge_item_trees, prune, resolve_aliases};
    pub use crate::items::{ItemBuckets, ItemFilter, ItemNormalizer, ItemRecord, ItemType, Subcategory};
    pub use crate::tables::{ArmorType, DiceBadges, LocalizedNames, WeaponType};

    // Storage
    pub use crate::store::{DataStore, DatasetBuilder, VersionedDataset};
    pub use crate::version::{ResolvedVersion, VersionStatus, resolve_version};

    pub use crate::archive::{ArchiveSource, ExtractReport, collect_tables};
    pub use crate::index::FileIndex;
    pub use crate::config::ExtractConfig;
    pub use crate::pipeline::{BuildSummary, build_dataset, export_merged};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
