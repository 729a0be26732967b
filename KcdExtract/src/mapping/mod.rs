//! Attribute and stat mappings
//!
//! The [`MappingRegistry`] says which fields are pulled for each item type and
//! which derived fields replace raw ones (price scaling, attack products, ...).
//! The table itself is data, bundled as `mappings.toml`.

mod registry;
mod transform;
mod value;

pub use registry::{Domain, MappingRegistry};
pub use transform::{FieldMap, Formula, Transform, apply_transforms};
pub use value::FieldValue;
