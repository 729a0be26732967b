//! Item normalization
//!
//! Walks a merged item tree and produces [`ItemRecord`]s: the mapped and
//! transformed attributes and stats of every weapon, armor piece, die and dice
//! badge, grouped by [`Subcategory`].

mod filter;
mod normalizer;
mod types;

pub use filter::ItemFilter;
pub use normalizer::{DEFAULT_CATEGORIES, ItemNormalizer, NormalizeReport};
pub use types::{ItemBuckets, ItemRecord, ItemType, Subcategory};
