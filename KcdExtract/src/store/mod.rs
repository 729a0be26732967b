//! Versioned data store
//!
//! Each game version gets a directory under the data root holding `data.json`
//! (the [`VersionedDataset`]) plus the file index side files recorded for that
//! run. Documents are built in memory with [`DatasetBuilder`] and written once;
//! [`DataStore::update`] covers read-modify-write of an existing document.

mod builder;
mod data_store;
mod dataset;

pub use builder::DatasetBuilder;
pub use data_store::{DATASET_FILE, DataStore};
pub use dataset::{ItemTypeInfo, VersionInfo, VersionedDataset, to_json_pretty};
