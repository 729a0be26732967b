//! Field mapping registry
//!
//! Declares, per normalized item type, which attributes and stats are pulled
//! from an item element and which derived fields are computed from them.

use super::transform::Transform;
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

const BUNDLED_MAPPINGS: &str = include_str!("mappings.toml");

/// Field domain of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Attributes,
    Stats,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields and transforms of one domain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainTable {
    #[serde(default)]
    default: Vec<String>,
    #[serde(default)]
    categories: IndexMap<String, Vec<String>>,
    #[serde(default)]
    transforms: Vec<Transform>,
}

impl DomainTable {
    fn fields_for(&self, category: &str) -> Vec<&str> {
        let specific = self.categories.get(category).into_iter().flatten();
        let fields: IndexSet<&str> = self.default.iter().chain(specific).map(String::as_str).collect();
        fields.into_iter().collect()
    }

    fn validate(&self, domain: Domain) -> Result<()> {
        let mut seen = HashSet::new();
        for transform in &self.transforms {
            if !seen.insert(transform.field.as_str()) {
                return Err(Error::DuplicateTransform {
                    domain: domain.to_string(),
                    field: transform.field.clone(),
                });
            }
            if transform.requires.is_empty() {
                return Err(Error::InvalidMapping(format!(
                    "{domain} transform '{}' requires no fields",
                    transform.field
                )));
            }
            if let Some(arity) = transform.formula.arity()
                && transform.requires.len() != arity
            {
                return Err(Error::InvalidMapping(format!(
                    "{domain} transform '{}' needs {arity} required field(s), got {}",
                    transform.field,
                    transform.requires.len()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingTable {
    #[serde(default)]
    attributes: DomainTable,
    #[serde(default)]
    stats: DomainTable,
}

/// Immutable mapping table consulted by the item normalizer.
///
/// Built once and passed explicitly; construction rejects a derived field
/// declared twice within one domain.
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    attributes: DomainTable,
    stats: DomainTable,
}

impl MappingRegistry {
    /// The mapping table shipped with the crate.
    ///
    /// # Errors
    /// Returns an error if the bundled table fails validation.
    pub fn bundled() -> Result<Self> {
        Self::from_toml(BUNDLED_MAPPINGS)
    }

    /// Build a registry from a TOML mapping table.
    ///
    /// # Errors
    /// Returns [`Error::TomlError`] for malformed TOML, [`Error::DuplicateTransform`]
    /// when a derived field is declared twice, and [`Error::InvalidMapping`] when
    /// a formula gets the wrong number of inputs.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: MappingTable = toml::from_str(content)?;
        table.attributes.validate(Domain::Attributes)?;
        table.stats.validate(Domain::Stats)?;
        Ok(Self {
            attributes: table.attributes,
            stats: table.stats,
        })
    }

    /// Attribute fields for `category`: defaults first, then category fields.
    pub fn attributes_for(&self, category: &str) -> Vec<&str> {
        self.attributes.fields_for(category)
    }

    /// Stat fields for `category`: defaults first, then category fields.
    pub fn stats_for(&self, category: &str) -> Vec<&str> {
        self.stats.fields_for(category)
    }

    /// Fields of `domain` for `category`.
    pub fn fields_for(&self, domain: Domain, category: &str) -> Vec<&str> {
        self.table(domain).fields_for(category)
    }

    /// Transforms of `domain`, in declaration order.
    pub fn transforms_for(&self, domain: Domain) -> &[Transform] {
        &self.table(domain).transforms
    }

    /// Categories with specific fields in either domain.
    pub fn categories(&self) -> Vec<&str> {
        let names: IndexSet<&str> = self
            .attributes
            .categories
            .keys()
            .chain(self.stats.categories.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().collect()
    }

    fn table(&self, domain: Domain) -> &DomainTable {
        match domain {
            Domain::Attributes => &self.attributes,
            Domain::Stats => &self.stats,
        }
    }
}
