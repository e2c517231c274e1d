/// Name of the element every document tree hangs from.
pub const ROOT_NAME: &str = "$root";

/// Handle of a node inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { name: String },
    Text { data: String },
}

#[derive(Debug, Clone)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree.
///
/// Nodes are never freed: removing a node only detaches it, so a `NodeId`
/// handed out once stays valid for lookups for the lifetime of the document.
/// Inside every element, adjacent text nodes are joined and empty text nodes
/// dropped after each mutation, which keeps offsets the only stable way of
/// addressing text.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root element
    pub fn new() -> Self {
        let root = NodeRecord {
            kind: NodeKind::Element {
                name: ROOT_NAME.to_string(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a detached element
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Element { name: name.into() })
    }

    /// Allocate a detached text node
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text { data: data.into() })
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    /// Element name, `None` for text nodes
    pub fn name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { name } => Some(name.as_str()),
            NodeKind::Text { .. } => None,
        }
    }

    /// Character data, `None` for elements
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Text { data } => Some(data.as_str()),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Element { .. })
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn is_empty(&self, node: NodeId) -> bool {
        self.nodes[node.0].children.is_empty()
    }

    /// Number of offset units the node occupies in its parent
    pub fn offset_size(&self, node: NodeId) -> usize {
        match &self.nodes[node.0].kind {
            NodeKind::Element { .. } => 1,
            NodeKind::Text { data } => data.chars().count(),
        }
    }

    /// Offset of the position at the very end of an element's content
    pub fn max_offset(&self, element: NodeId) -> usize {
        self.children(element)
            .iter()
            .map(|child| self.offset_size(*child))
            .sum()
    }

    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|child| *child == node)
    }

    /// Offset at which the node starts inside its parent
    pub fn start_offset(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        Some(
            self.children(parent)[..index]
                .iter()
                .map(|child| self.offset_size(*child))
                .sum(),
        )
    }

    /// Chain of nodes from the top of the node's tree down to the node itself
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.ancestors(node).first() == Some(&self.root)
    }

    /// Deepest node that contains both `a` and `b` (either may be the answer)
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let left = self.ancestors(a);
        let right = self.ancestors(b);
        left.iter()
            .zip(right.iter())
            .take_while(|(l, r)| l == r)
            .last()
            .map(|(l, _)| *l)
    }

    /// Child that starts exactly at `offset`
    pub fn node_after(&self, parent: NodeId, offset: usize) -> Option<NodeId> {
        let mut current = 0;
        for child in self.children(parent) {
            if current == offset {
                return Some(*child);
            }
            if current > offset {
                break;
            }
            current += self.offset_size(*child);
        }
        None
    }

    /// Child that ends exactly at `offset`
    pub fn node_before(&self, parent: NodeId, offset: usize) -> Option<NodeId> {
        let mut current = 0;
        for child in self.children(parent) {
            current += self.offset_size(*child);
            if current == offset {
                return Some(*child);
            }
            if current > offset {
                break;
            }
        }
        None
    }

    /// Append a detached node at the end of `parent`
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) {
        let end = self.max_offset(parent);
        self.insert_at(parent, end, node);
    }

    /// Make sure a child boundary exists at `offset`, splitting a text node if
    /// needed. Returns the index of the first child at or after the offset.
    pub(crate) fn split_at(&mut self, parent: NodeId, offset: usize) -> usize {
        let mut current = 0;
        let count = self.nodes[parent.0].children.len();
        for index in 0..count {
            if current == offset {
                return index;
            }
            let child = self.nodes[parent.0].children[index];
            let size = self.offset_size(child);
            if offset < current + size {
                let tail = match &mut self.nodes[child.0].kind {
                    NodeKind::Text { data } => {
                        let at = byte_index(data, offset - current);
                        data.split_off(at)
                    }
                    // Elements are one unit wide, so the boundary check above caught them.
                    NodeKind::Element { .. } => return index,
                };
                let tail_node = self.create_text(tail);
                self.nodes[tail_node.0].parent = Some(parent);
                self.nodes[parent.0].children.insert(index + 1, tail_node);
                return index + 1;
            }
            current += size;
        }
        debug_assert!(
            offset <= current,
            "offset {offset} is past the end of the element ({current})"
        );
        count
    }

    pub(crate) fn insert_at(&mut self, parent: NodeId, offset: usize, node: NodeId) {
        debug_assert!(self.parent(node).is_none(), "node is already attached");
        let index = self.split_at(parent, offset);
        self.nodes[parent.0].children.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
        self.normalize_text(parent);
    }

    /// Detach everything between two offsets of one element
    pub(crate) fn remove_offsets(&mut self, parent: NodeId, from: usize, to: usize) -> Vec<NodeId> {
        if from >= to {
            return Vec::new();
        }
        let start = self.split_at(parent, from);
        let end = self.split_at(parent, to);
        let removed: Vec<NodeId> = self.nodes[parent.0].children.drain(start..end).collect();
        for node in &removed {
            self.nodes[node.0].parent = None;
        }
        self.normalize_text(parent);
        removed
    }

    pub(crate) fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != node);
        self.normalize_text(parent);
    }

    /// Move the children of the element after `offset` into the element before
    /// it and detach the emptied element. Returns false when either side is not
    /// an element.
    pub(crate) fn merge_at(&mut self, parent: NodeId, offset: usize) -> bool {
        let (Some(before), Some(after)) = (
            self.node_before(parent, offset),
            self.node_after(parent, offset),
        ) else {
            return false;
        };
        if !self.is_element(before) || !self.is_element(after) {
            return false;
        }

        let moved = std::mem::take(&mut self.nodes[after.0].children);
        for child in &moved {
            self.nodes[child.0].parent = Some(before);
        }
        self.nodes[before.0].children.extend(moved);
        self.detach(after);
        self.normalize_text(before);
        true
    }

    fn normalize_text(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        let mut normalized: Vec<NodeId> = Vec::with_capacity(children.len());

        for child in children {
            let data = match &self.nodes[child.0].kind {
                NodeKind::Text { data } => Some(data.clone()),
                NodeKind::Element { .. } => None,
            };
            match data {
                Some(data) if data.is_empty() => {
                    self.nodes[child.0].parent = None;
                }
                Some(data) => {
                    if let Some(&last) = normalized.last()
                        && let NodeKind::Text { data: previous } = &mut self.nodes[last.0].kind
                    {
                        previous.push_str(&data);
                        self.nodes[child.0].parent = None;
                        continue;
                    }
                    normalized.push(child);
                }
                None => normalized.push(child),
            }
        }

        self.nodes[parent.0].children = normalized;
    }
}

/// Byte index of the `chars`-th character, clamped to the end of the string
fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph_with_text(doc: &mut Document, text: &str) -> NodeId {
        let paragraph = doc.create_element("paragraph");
        let root = doc.root();
        doc.append_child(root, paragraph);
        let text = doc.create_text(text);
        doc.append_child(paragraph, text);
        paragraph
    }

    fn texts(doc: &Document, element: NodeId) -> Vec<String> {
        doc.children(element)
            .iter()
            .map(|child| match doc.kind(*child) {
                NodeKind::Text { data } => data.clone(),
                NodeKind::Element { name } => format!("<{name}>"),
            })
            .collect()
    }

    #[test]
    fn test_new_document_has_empty_root() {
        let doc = Document::new();

        assert_eq!(doc.name(doc.root()), Some(ROOT_NAME));
        assert!(doc.is_empty(doc.root()));
        assert_eq!(doc.max_offset(doc.root()), 0);
    }

    #[test]
    fn test_offsets_count_characters_and_elements() {
        let mut doc = Document::new();
        let paragraph = paragraph_with_text(&mut doc, "héllo");
        let marker = doc.create_element("softBreak");
        doc.append_child(paragraph, marker);

        assert_eq!(doc.max_offset(paragraph), 6);
        assert_eq!(doc.start_offset(marker), Some(5));
        assert_eq!(doc.max_offset(doc.root()), 1);
    }

    #[test]
    fn test_insert_inside_text_splits_it() {
        let mut doc = Document::new();
        let paragraph = paragraph_with_text(&mut doc, "foobar");
        let marker = doc.create_element("softBreak");

        doc.insert_at(paragraph, 3, marker);

        assert_eq!(texts(&doc, paragraph), vec!["foo", "<softBreak>", "bar"]);
        assert_eq!(doc.parent(marker), Some(paragraph));
    }

    #[test]
    fn test_split_respects_multibyte_characters() {
        let mut doc = Document::new();
        let paragraph = paragraph_with_text(&mut doc, "🦀世界");
        let marker = doc.create_element("softBreak");

        doc.insert_at(paragraph, 1, marker);

        assert_eq!(texts(&doc, paragraph), vec!["🦀", "<softBreak>", "世界"]);
    }

    #[test]
    fn test_remove_offsets_joins_remaining_text() {
        let mut doc = Document::new();
        let paragraph = paragraph_with_text(&mut doc, "abcdef");

        let removed = doc.remove_offsets(paragraph, 2, 4);

        assert_eq!(removed.len(), 1);
        assert_eq!(doc.text(removed[0]), Some("cd"));
        assert_eq!(texts(&doc, paragraph), vec!["abef"]);
    }

    #[test]
    fn test_remove_offsets_across_element_rejoins_text() {
        let mut doc = Document::new();
        let paragraph = paragraph_with_text(&mut doc, "ab");
        let marker = doc.create_element("softBreak");
        doc.append_child(paragraph, marker);
        let tail = doc.create_text("cd");
        doc.append_child(paragraph, tail);

        doc.remove_offsets(paragraph, 1, 4);

        assert_eq!(texts(&doc, paragraph), vec!["ad"]);
        assert_eq!(doc.parent(marker), None);
    }

    #[test]
    fn test_empty_range_removes_nothing() {
        let mut doc = Document::new();
        let paragraph = paragraph_with_text(&mut doc, "abc");

        assert!(doc.remove_offsets(paragraph, 2, 2).is_empty());
        assert_eq!(texts(&doc, paragraph), vec!["abc"]);
    }

    #[test]
    fn test_merge_moves_children_and_detaches_second_element() {
        let mut doc = Document::new();
        let first = paragraph_with_text(&mut doc, "foo");
        let second = paragraph_with_text(&mut doc, "bar");

        assert!(doc.merge_at(doc.root(), 1));

        assert_eq!(texts(&doc, first), vec!["foobar"]);
        assert_eq!(doc.parent(second), None);
        assert_eq!(doc.children(doc.root()), &[first]);
    }

    #[test]
    fn test_merge_refuses_text_neighbours() {
        let mut doc = Document::new();
        let paragraph = paragraph_with_text(&mut doc, "foo");
        let marker = doc.create_element("softBreak");
        doc.append_child(paragraph, marker);

        assert!(!doc.merge_at(paragraph, 3));
        assert_eq!(texts(&doc, paragraph), vec!["foo", "<softBreak>"]);
    }

    #[test]
    fn test_common_ancestor_of_nested_elements() {
        let mut doc = Document::new();
        let quote = doc.create_element("blockQuote");
        let root = doc.root();
        doc.append_child(root, quote);
        let inner = doc.create_element("paragraph");
        doc.append_child(quote, inner);
        let outer = paragraph_with_text(&mut doc, "x");

        assert_eq!(doc.common_ancestor(inner, outer), Some(root));
        assert_eq!(doc.common_ancestor(inner, quote), Some(quote));
        assert_eq!(doc.ancestors(inner), vec![root, quote, inner]);
    }

    #[test]
    fn test_detached_nodes_are_not_attached() {
        let mut doc = Document::new();
        let paragraph = doc.create_element("paragraph");

        assert!(!doc.is_attached(paragraph));
        let root = doc.root();
        doc.append_child(root, paragraph);
        assert!(doc.is_attached(paragraph));
    }
}
