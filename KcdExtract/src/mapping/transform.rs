//! Derived-field transformations
//!
//! A [`Transform`] computes one derived field from one or more raw fields. It
//! fires when any of its required fields is present in the bucket. Once every
//! transform has run, the raw fields consumed by the successful ones are removed
//! and the derived values are appended.

use super::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered bucket of extracted fields.
pub type FieldMap = IndexMap<String, FieldValue>;

/// Arithmetic rule of a transform.
///
/// Results of the rounding formulas use round-half-to-even.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Formula {
    /// `round(x * factor)`
    Scale { factor: f64 },
    /// `round(offset + x * factor)`
    OffsetScale { offset: f64, factor: f64 },
    /// `round(a * b)`
    Product,
    /// Integer part of the first present required field.
    Integer,
}

impl Formula {
    /// Number of required fields the formula reads, `None` for "one or more".
    pub fn arity(self) -> Option<usize> {
        match self {
            Self::Scale { .. } | Self::OffsetScale { .. } => Some(1),
            Self::Product => Some(2),
            Self::Integer => None,
        }
    }
}

/// A derived-field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Name of the derived field.
    pub field: String,
    /// Raw fields read (and consumed) by the formula.
    pub requires: Vec<String>,
    pub formula: Formula,
}

impl Transform {
    /// Whether at least one required field is present.
    pub fn is_triggered(&self, bucket: &FieldMap) -> bool {
        self.requires.iter().any(|name| bucket.contains_key(name))
    }

    /// Whether every input the formula reads is present.
    pub fn has_inputs(&self, bucket: &FieldMap) -> bool {
        match self.formula {
            Formula::Integer => self.is_triggered(bucket),
            _ => self.requires.iter().all(|name| bucket.contains_key(name)),
        }
    }

    /// Compute the derived value, `None` when an input is missing or not numeric.
    pub fn evaluate(&self, bucket: &FieldMap) -> Option<FieldValue> {
        let number = |name: &String| bucket.get(name).and_then(FieldValue::as_f64);

        let value = match self.formula {
            Formula::Scale { factor } => (number(self.requires.first()?)? * factor).round_ties_even(),
            Formula::OffsetScale { offset, factor } => {
                (offset + number(self.requires.first()?)? * factor).round_ties_even()
            }
            Formula::Product => {
                let [a, b] = self.requires.as_slice() else {
                    return None;
                };
                (number(a)? * number(b)?).round_ties_even()
            }
            Formula::Integer => {
                let source = self.requires.iter().find(|name| bucket.contains_key(*name))?;
                number(source)?.trunc()
            }
        };
        Some(FieldValue::from_f64(value))
    }
}

/// Apply `transforms` to `bucket` in declaration order.
///
/// Triggered transforms whose inputs are missing or not numeric are skipped
/// and consume nothing. Returns the names of the derived fields that
/// were written.
pub fn apply_transforms(bucket: &mut FieldMap, transforms: &[Transform]) -> Vec<String> {
    let mut derived: Vec<(String, FieldValue)> = Vec::new();
    let mut consumed: Vec<&str> = Vec::new();

    for transform in transforms {
        if !transform.is_triggered(bucket) {
            continue;
        }
        match transform.evaluate(bucket) {
            Some(value) => {
                tracing::debug!("derived {} = {} from {:?}", transform.field, value, transform.requires);
                consumed.extend(transform.requires.iter().map(String::as_str));
                derived.push((transform.field.clone(), value));
            }
            None if transform.has_inputs(bucket) => {
                tracing::warn!(
                    "skipping transform '{}': inputs {:?} are not numeric",
                    transform.field,
                    transform.requires
                );
            }
            None => {
                tracing::debug!("skipping transform '{}': missing inputs", transform.field);
            }
        }
    }

    for name in consumed {
        bucket.shift_remove(name);
    }
    derived
        .into_iter()
        .map(|(name, value)| {
            bucket.insert(name.clone(), value);
            name
        })
        .collect()
}
