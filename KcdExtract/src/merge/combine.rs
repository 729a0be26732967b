//! Combining item tables into one tree

use crate::error::{Error, Result};
use crate::formats::xml::{ElementId, XmlDocument};
use serde::{Deserialize, Serialize};

/// Tag of the container holding item definitions.
pub const ITEM_CONTAINER: &str = "ItemClasses";

/// One parsed item table and its logical file id.
#[derive(Debug, Clone)]
pub struct ItemSource {
    /// Logical file id (`item`, `item_dlc`, `item_horse`, ...).
    pub id: String,
    pub document: XmlDocument,
}

impl ItemSource {
    pub fn new(id: impl Into<String>, document: XmlDocument) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }
}

/// Renames elements of one source before they are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetagRule {
    /// Logical file id the rule applies to.
    pub source: String,
    /// Tag to match.
    pub from: String,
    /// Replacement tag.
    pub to: String,
}

/// Options for [`merge_item_trees`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub retags: Vec<RetagRule>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            // Horse armor would otherwise be indistinguishable from player armor
            retags: vec![RetagRule {
                source: "item_horse".to_string(),
                from: "Armor".to_string(),
                to: "Horse".to_string(),
            }],
        }
    }
}

/// Merge item tables into one document.
///
/// The first source is the base; children of every later source's
/// `ItemClasses` container are appended to the base container in order.
/// Retag rules apply to the direct children of each source's container,
/// the base included.
///
/// # Errors
/// Returns [`Error::NoItemTrees`] for an empty source list and
/// [`Error::MissingContainer`] when a source has no `ItemClasses` element.
pub fn merge_item_trees(sources: &[ItemSource], options: &MergeOptions) -> Result<XmlDocument> {
    let (base, rest) = sources.split_first().ok_or(Error::NoItemTrees)?;

    let mut merged = base.document.clone();
    let container = find_container(&merged, &base.id)?;
    retag_children(&mut merged, container, &base.id, options);

    for source in rest {
        let source_container = find_container(&source.document, &source.id)?;
        let children = source.document.children(source_container);
        tracing::debug!("Merging {} elements from {}", children.len(), source.id);

        for &child in children {
            let copy = merged.import(&source.document, child);
            merged.append_child(container, copy);
            retag(&mut merged, copy, &source.id, options);
        }
    }

    tracing::info!(
        "Merged {} item tables into {} elements",
        sources.len(),
        merged.children(container).len()
    );
    Ok(merged)
}

/// The `ItemClasses` container of `doc`.
///
/// # Errors
/// Returns [`Error::MissingContainer`] if the document has none.
pub fn find_container(doc: &XmlDocument, source_id: &str) -> Result<ElementId> {
    doc.find_first(ITEM_CONTAINER).ok_or_else(|| Error::MissingContainer {
        tag: ITEM_CONTAINER.to_string(),
        source_id: source_id.to_string(),
    })
}

fn retag_children(
    doc: &mut XmlDocument,
    container: ElementId,
    source_id: &str,
    options: &MergeOptions,
) {
    for child in doc.children(container).to_vec() {
        retag(doc, child, source_id, options);
    }
}

fn retag(
    doc: &mut XmlDocument,
    id: ElementId,
    source_id: &str,
    options: &MergeOptions,
) {
    let element = doc.element_mut(id);
    if let Some(rule) = options
        .retags
        .iter()
        .find(|rule| rule.source == source_id && rule.from == element.tag)
    {
        element.tag.clone_from(&rule.to);
    }
}
