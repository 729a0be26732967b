//! Item table merging
//!
//! KCD2 splits item definitions across several tables (`item.xml`,
//! `item_dlc.xml`, `item_horse.xml`, ...). This module combines them into one
//! tree, resolves `ItemAlias` inheritance and optionally prunes elements that
//! are irrelevant for item data.
//!
//! # Usage
//!
//! ```no_run
//! use kcdextract::formats::xml::read_xml;
//! use kcdextract::merge::{merge_item_trees, resolve_aliases, ItemSource, MergeOptions};
//!
//! let sources = vec![
//!     ItemSource::new("item", read_xml("item.xml")?),
//!     ItemSource::new("item_horse", read_xml("item_horse.xml")?),
//! ];
//! let mut merged = merge_item_trees(&sources, &MergeOptions::default())?;
//! let report = resolve_aliases(&mut merged);
//! println!("{} aliases resolved", report.resolved);
//! # Ok::<(), kcdextract::Error>(())
//! ```

mod alias;
mod combine;
mod prune;

pub use alias::{ALIAS_TAG, AliasReport, SOURCE_ATTRIBUTE, resolve_aliases};
pub use combine::{ITEM_CONTAINER, ItemSource, MergeOptions, RetagRule, find_container, merge_item_trees};
pub use prune::{PruneOptions, PruneReport, prune};
