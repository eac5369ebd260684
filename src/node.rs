//! Canonical tree model for declaration documents

use indexmap::map::Entry;
use indexmap::IndexMap;

/// One element of the document tree.
///
/// Text, attributes and children may all be present on the same node
/// (mixed content is valid). Child order and attribute order follow the
/// source document; both are preserved through edits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmlNode {
    /// Element text, `None` when the element holds no text content
    pub text: Option<String>,
    /// Attribute name → attribute value, in document order
    pub attributes: IndexMap<String, String>,
    /// Child tag name → child content, in document order
    pub children: IndexMap<String, Children>,
}

/// Content stored under one child tag name.
///
/// Repeated siblings with the same tag collapse to `Many`; exactly one
/// occurrence stays `One`. Consumers iterate through [`Children::as_slice`]
/// instead of branching on the shape, so a single occurrence is never
/// skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Children {
    One(Box<XmlNode>),
    Many(Vec<XmlNode>),
}

impl XmlNode {
    /// Creates an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node holding only text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Returns the text content, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replaces the text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Returns the attribute value for `name`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Sets an attribute, replacing any previous value
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Returns the content stored under a child tag name
    pub fn child(&self, name: &str) -> Option<&Children> {
        self.children.get(name)
    }

    /// Returns true if any child is stored under `name`
    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Children under `name` normalized to a slice; absent yields empty.
    ///
    /// Iteration over repeated elements goes through this accessor so a
    /// single occurrence is never skipped.
    pub fn children_named(&self, name: &str) -> &[XmlNode] {
        self.child(name).map_or(&[], Children::as_slice)
    }

    /// Appends a child under `name`, promoting an existing single
    /// occurrence to a sequence
    pub fn add_child(&mut self, name: impl Into<String>, node: XmlNode) {
        match self.children.entry(name.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(node),
            Entry::Vacant(entry) => {
                entry.insert(Children::One(Box::new(node)));
            }
        }
    }

    /// Replaces the whole content under `name`. An existing key keeps its
    /// position among the siblings; a new key is appended.
    pub fn set_child(&mut self, name: impl Into<String>, children: Children) {
        self.children.insert(name.into(), children);
    }

    /// Removes the content under `name`. Sibling order of the remaining
    /// keys is preserved.
    pub fn remove_child(&mut self, name: &str) -> Option<Children> {
        self.children.shift_remove(name)
    }

    /// True when the node carries no text, no attributes and no children
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.attributes.is_empty() && self.children.is_empty()
    }
}

impl Children {
    /// Canonicalizing constructor: empty input yields `None`, one node
    /// stays `One`, anything more becomes `Many`.
    pub fn from_vec(mut nodes: Vec<XmlNode>) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => nodes.pop().map(|node| Self::One(Box::new(node))),
            _ => Some(Self::Many(nodes)),
        }
    }

    /// The single normalization accessor: every consumer reads repeated
    /// elements through this, whatever the stored shape.
    pub fn as_slice(&self) -> &[XmlNode] {
        match self {
            Self::One(node) => std::slice::from_ref(node),
            Self::Many(nodes) => nodes,
        }
    }

    /// Number of nodes stored
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(nodes) => nodes.len(),
        }
    }

    /// True when no node is stored (only possible for an emptied `Many`)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the stored nodes in document order
    pub fn iter(&self) -> std::slice::Iter<'_, XmlNode> {
        self.as_slice().iter()
    }

    /// Appends a node, promoting `One` to `Many`
    pub fn push(&mut self, node: XmlNode) {
        let current = std::mem::replace(self, Self::Many(Vec::new()));
        *self = match current {
            Self::One(first) => Self::Many(vec![*first, node]),
            Self::Many(mut nodes) => {
                nodes.push(node);
                Self::Many(nodes)
            }
        };
    }
}

impl From<XmlNode> for Children {
    fn from(node: XmlNode) -> Self {
        Self::One(Box::new(node))
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a XmlNode;
    type IntoIter = std::slice::Iter<'a, XmlNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_node() {
        let node = XmlNode::new();
        assert!(node.is_empty());
        assert_eq!(node.text(), None);
    }

    #[test]
    fn test_text_node() {
        let node = XmlNode::with_text("hello");
        assert_eq!(node.text(), Some("hello"));
        assert!(!node.is_empty());
    }

    #[test]
    fn test_attributes() {
        let mut node = XmlNode::new();
        node.set_attr("faltkod", "201");
        assert_eq!(node.attr("faltkod"), Some("201"));
        assert_eq!(node.attr("missing"), None);
        assert!(!node.is_empty());
    }

    #[test]
    fn test_add_child_collapses_to_sequence() {
        let mut node = XmlNode::new();
        node.add_child("Item", XmlNode::with_text("a"));
        assert!(matches!(node.child("Item"), Some(Children::One(_))));

        node.add_child("Item", XmlNode::with_text("b"));
        let children = node.child("Item").expect("children");
        assert!(matches!(children, Children::Many(_)));
        assert_eq!(children.len(), 2);
        assert_eq!(children.as_slice()[0].text(), Some("a"));
        assert_eq!(children.as_slice()[1].text(), Some("b"));
    }

    #[test]
    fn test_as_slice_normalizes_single() {
        let mut node = XmlNode::new();
        node.add_child("Only", XmlNode::with_text("x"));
        let slice = node.child("Only").expect("children").as_slice();
        assert_eq!(slice.len(), 1);
        assert_eq!(slice[0].text(), Some("x"));
    }

    #[test]
    fn test_children_named_covers_all_shapes() {
        let mut node = XmlNode::new();
        assert!(node.children_named("Item").is_empty());
        node.add_child("Item", XmlNode::with_text("a"));
        assert_eq!(node.children_named("Item").len(), 1);
        node.add_child("Item", XmlNode::with_text("b"));
        assert_eq!(node.children_named("Item").len(), 2);
    }

    #[test]
    fn test_from_vec_canonicalizes() {
        assert!(Children::from_vec(Vec::new()).is_none());
        assert!(matches!(
            Children::from_vec(vec![XmlNode::new()]),
            Some(Children::One(_))
        ));
        assert!(matches!(
            Children::from_vec(vec![XmlNode::new(), XmlNode::new()]),
            Some(Children::Many(_))
        ));
    }

    #[test]
    fn test_remove_child_preserves_order() {
        let mut node = XmlNode::new();
        node.add_child("A", XmlNode::new());
        node.add_child("B", XmlNode::new());
        node.add_child("C", XmlNode::new());

        node.remove_child("B");
        let keys: Vec<_> = node.children.keys().collect();
        assert_eq!(keys, vec!["A", "C"]);
    }

    #[test]
    fn test_set_child_keeps_position() {
        let mut node = XmlNode::new();
        node.add_child("A", XmlNode::new());
        node.add_child("B", XmlNode::new());
        node.add_child("C", XmlNode::new());

        node.set_child("B", Children::Many(vec![XmlNode::new(), XmlNode::new()]));
        let keys: Vec<_> = node.children.keys().collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(node.child("B").map(Children::len), Some(2));
    }

    #[test]
    fn test_mixed_content() {
        let mut node = XmlNode::with_text("note");
        node.set_attr("id", "1");
        node.add_child("Child", XmlNode::new());
        assert_eq!(node.text(), Some("note"));
        assert_eq!(node.attr("id"), Some("1"));
        assert!(node.has_child("Child"));
    }
}
