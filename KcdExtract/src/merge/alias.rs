//! `ItemAlias` inheritance

use crate::formats::xml::{ElementId, XmlDocument};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Tag of alias elements.
pub const ALIAS_TAG: &str = "ItemAlias";

/// Attribute naming the item an alias derives from.
pub const SOURCE_ATTRIBUTE: &str = "SourceItemId";

/// Outcome of [`resolve_aliases`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AliasReport {
    /// Distinct source ids referenced by aliases.
    pub groups: usize,
    /// Aliases that inherited from a source and were relocated.
    pub resolved: usize,
    /// Aliases detached because their source is missing or unnamed.
    pub dropped: usize,
}

/// Resolve every attached `ItemAlias` in `doc`.
///
/// Aliases are grouped by `SourceItemId` in first-seen order. For each group
/// the source item is looked up by `Id` (ignoring the group's own aliases);
/// each alias receives every source attribute it does not define itself and is
/// moved directly after the source, keeping the group's order. Aliases without
/// a `SourceItemId` or with an unknown source are detached.
///
/// A group whose source is itself an alias is resolved after that alias's own
/// group, so chains inherit the full attribute set regardless of document
/// order. An alias whose source was dropped is dropped too.
pub fn resolve_aliases(doc: &mut XmlDocument) -> AliasReport {
    let mut report = AliasReport::default();
    let mut groups: IndexMap<String, Vec<ElementId>> = IndexMap::new();

    for alias in doc.find_all(ALIAS_TAG) {
        let source_id = doc.element(alias).get(SOURCE_ATTRIBUTE).map(str::to_string);
        match source_id {
            Some(source_id) => groups.entry(source_id).or_default().push(alias),
            None => {
                tracing::debug!(
                    "Dropping alias {:?} without {}",
                    doc.element(alias).get("Id"),
                    SOURCE_ATTRIBUTE
                );
                doc.detach(alias);
                report.dropped += 1;
            }
        }
    }
    report.groups = groups.len();

    let by_id = index_ids(doc);
    let sources: Vec<Option<ElementId>> = groups
        .iter()
        .map(|(source_id, aliases)| {
            let own: HashSet<ElementId> = aliases.iter().copied().collect();
            by_id
                .get(source_id.as_str())
                .and_then(|candidates| candidates.iter().copied().find(|id| !own.contains(id)))
        })
        .collect();

    for group in resolution_order(doc, &groups, &sources) {
        let Some((source_id, aliases)) = groups.get_index(group) else {
            continue;
        };
        let Some(source) = sources[group].filter(|&source| doc.is_attached(source)) else {
            tracing::debug!("Dropping {} alias(es) of missing item {}", aliases.len(), source_id);
            for &alias in aliases {
                doc.detach(alias);
            }
            report.dropped += aliases.len();
            continue;
        };

        let inherited = doc.element(source).attributes.clone();
        let parent = doc.parent(source);

        for (offset, &alias) in aliases.iter().enumerate() {
            let attributes = &mut doc.element_mut(alias).attributes;
            for (name, value) in &inherited {
                if !attributes.contains_key(name) {
                    attributes.insert(name.clone(), value.clone());
                }
            }

            if let Some(parent) = parent {
                doc.detach(alias);
                let index = doc.child_index(source).unwrap_or_default();
                doc.insert_child(parent, index + 1 + offset, alias);
            }
            report.resolved += 1;
        }
    }

    tracing::info!(
        "Resolved {} aliases across {} sources, dropped {}",
        report.resolved,
        report.groups,
        report.dropped
    );
    report
}

/// Attached elements by `Id`, each list in document order.
fn index_ids(doc: &XmlDocument) -> HashMap<String, Vec<ElementId>> {
    let mut by_id: HashMap<String, Vec<ElementId>> = HashMap::new();
    for id in doc.descendants(doc.root()) {
        if let Some(item_id) = doc.element(id).get("Id") {
            by_id.entry(item_id.to_string()).or_default().push(id);
        }
    }
    by_id
}

/// Group indices ordered so a group whose source is an alias comes after the
/// group that alias belongs to. Cycles fall back to first-seen order.
fn resolution_order(
    doc: &XmlDocument,
    groups: &IndexMap<String, Vec<ElementId>>,
    sources: &[Option<ElementId>],
) -> Vec<usize> {
    let mut order = Vec::with_capacity(groups.len());
    let mut visited = vec![false; groups.len()];

    for start in 0..groups.len() {
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(group) = current {
            if visited[group] {
                break;
            }
            visited[group] = true;
            chain.push(group);
            current = sources[group]
                .map(|source| doc.element(source))
                .filter(|source| source.tag == ALIAS_TAG)
                .and_then(|source| source.get(SOURCE_ATTRIBUTE))
                .and_then(|parent_id| groups.get_index_of(parent_id));
        }
        order.extend(chain.into_iter().rev());
    }
    order
}
