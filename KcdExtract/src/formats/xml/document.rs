//! XML element arena
//!
//! Elements live in a flat arena and are addressed by [`ElementId`]. Each element
//! keeps a parent back-reference, so moving an element (alias relocation, pruning)
//! is an index update rather than a search through a live tree.

use indexmap::IndexMap;

/// Index of an element inside an [`XmlDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// A single XML element.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    /// Element tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attributes: IndexMap<String, String>,
    /// Concatenated text content, if any.
    pub text: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl XmlElement {
    /// Creates a detached element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the attribute is defined on this element.
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Parent element, `None` for the root or a detached element.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// An XML document stored as an element arena.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<XmlElement>,
    root: ElementId,
}

impl XmlDocument {
    /// Creates a document containing only a root element.
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![XmlElement::new(root_tag)],
            root: ElementId(0),
        }
    }

    /// The document root.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Element by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this document.
    pub fn element(&self, id: ElementId) -> &XmlElement {
        &self.nodes[id.0]
    }

    /// Mutable element by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this document.
    pub fn element_mut(&mut self, id: ElementId) -> &mut XmlElement {
        &mut self.nodes[id.0]
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.nodes[id.0].children
    }

    /// Parent of `id`.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes[id.0].parent
    }

    /// Allocates a new detached element.
    pub fn create_element(&mut self, element: XmlElement) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(XmlElement {
            parent: None,
            children: Vec::new(),
            ..element
        });
        id
    }

    /// Removes `id` from its parent. The element stays in the arena but is no
    /// longer reachable from the root.
    pub fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Moves `child` to position `index` among `parent`'s children.
    ///
    /// An index past the end appends.
    pub fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Position of `id` among its siblings.
    pub fn child_index(&self, id: ElementId) -> Option<usize> {
        let parent = self.nodes[id.0].parent?;
        self.nodes[parent.0].children.iter().position(|&c| c == id)
    }

    /// Drops all children and text of `id`, keeping the element and its attributes.
    pub fn clear_content(&mut self, id: ElementId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.nodes[id.0].text = None;
    }

    /// Stable sort of `id`'s children by tag name.
    pub fn sort_children_by_tag(&mut self, id: ElementId) {
        let mut children = std::mem::take(&mut self.nodes[id.0].children);
        children.sort_by(|a, b| self.nodes[a.0].tag.cmp(&self.nodes[b.0].tag));
        self.nodes[id.0].children = children;
    }

    /// All descendants of `id` in pre-order (document order), excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    /// The root followed by all its descendants in document order.
    fn attached(&self) -> impl Iterator<Item = ElementId> {
        std::iter::once(self.root).chain(self.descendants(self.root))
    }

    /// First element (root included) with the given tag.
    pub fn find_first(&self, tag: &str) -> Option<ElementId> {
        self.attached().find(|&id| self.nodes[id.0].tag == tag)
    }

    /// Every attached element with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<ElementId> {
        self.attached()
            .filter(|&id| self.nodes[id.0].tag == tag)
            .collect()
    }

    /// First attached element whose attribute `name` equals `value`, skipping
    /// elements rejected by `skip`.
    pub fn find_by_attribute(
        &self,
        name: &str,
        value: &str,
        skip: impl Fn(ElementId) -> bool,
    ) -> Option<ElementId> {
        self.attached()
            .find(|&id| !skip(id) && self.nodes[id.0].get(name) == Some(value))
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Deep-copies the subtree at `id` in `other` into this arena and returns the
    /// detached copy.
    pub fn import(&mut self, other: &XmlDocument, id: ElementId) -> ElementId {
        let source = other.element(id);
        let copy = self.create_element(XmlElement {
            tag: source.tag.clone(),
            attributes: source.attributes.clone(),
            text: source.text.clone(),
            ..XmlElement::default()
        });
        for &child in source.children() {
            let child_copy = self.import(other, child);
            self.append_child(copy, child_copy);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with_id(doc: &mut XmlDocument, tag: &str, id: &str) -> ElementId {
        let mut element = XmlElement::new(tag);
        element.attributes.insert("Id".to_string(), id.to_string());
        doc.create_element(element)
    }

    #[test]
    fn test_append_and_detach() {
        let mut doc = XmlDocument::new("root");
        let a = element_with_id(&mut doc, "Armor", "a");
        let b = element_with_id(&mut doc, "Armor", "b");
        doc.append_child(doc.root(), a);
        doc.append_child(doc.root(), b);
        assert_eq!(doc.children(doc.root()), &[a, b]);
        assert_eq!(doc.parent(a), Some(doc.root()));

        doc.detach(a);
        assert_eq!(doc.children(doc.root()), &[b]);
        assert!(!doc.is_attached(a));
        assert!(doc.is_attached(b));
    }

    #[test]
    fn test_insert_moves_existing_child() {
        let mut doc = XmlDocument::new("root");
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|id| element_with_id(&mut doc, "Die", id))
            .collect();
        for &id in &ids {
            doc.append_child(doc.root(), id);
        }

        // Move "c" right after "a"
        doc.insert_child(doc.root(), 1, ids[2]);
        assert_eq!(doc.children(doc.root()), &[ids[0], ids[2], ids[1]]);
        assert_eq!(doc.child_index(ids[1]), Some(2));
    }

    #[test]
    fn test_find_by_attribute_in_document_order() {
        let mut doc = XmlDocument::new("root");
        let container = doc.create_element(XmlElement::new("ItemClasses"));
        doc.append_child(doc.root(), container);
        let first = element_with_id(&mut doc, "Armor", "dup");
        let second = element_with_id(&mut doc, "Hood", "dup");
        doc.append_child(container, first);
        doc.append_child(container, second);

        assert_eq!(doc.find_by_attribute("Id", "dup", |_| false), Some(first));
        assert_eq!(doc.find_by_attribute("Id", "dup", |id| id == first), Some(second));
        assert_eq!(doc.find_first("ItemClasses"), Some(container));
    }

    #[test]
    fn test_import_copies_subtree() {
        let mut source = XmlDocument::new("database");
        let parent = element_with_id(&mut source, "Document", "doc");
        let child = source.create_element(XmlElement::new("Page"));
        source.append_child(parent, child);
        source.append_child(source.root(), parent);

        let mut target = XmlDocument::new("database");
        let copy = target.import(&source, parent);
        assert_eq!(target.element(copy).get("Id"), Some("doc"));
        assert_eq!(target.children(copy).len(), 1);
        assert!(!target.is_attached(copy));
    }
}
