use std::cmp::Ordering;

use super::document::{Document, NodeId};

/// A place between two offset units of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub parent: NodeId,
    pub offset: usize,
}

/// Where a position is created relative to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
    /// End of the element's own content
    End,
    /// Explicit offset inside the element
    Offset(usize),
}

/// Something a position can be created from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Position(Position),
    Node(NodeId),
}

impl From<Position> for Target {
    fn from(position: Position) -> Self {
        Target::Position(position)
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

impl Position {
    pub fn new(parent: NodeId, offset: usize) -> Self {
        Self { parent, offset }
    }

    pub fn at_start(parent: NodeId) -> Self {
        Self::new(parent, 0)
    }

    pub fn at_end(doc: &Document, parent: NodeId) -> Self {
        Self::new(parent, doc.max_offset(parent))
    }

    /// Position right before a node, `None` if the node is detached
    pub fn before(doc: &Document, node: NodeId) -> Option<Self> {
        Some(Self::new(doc.parent(node)?, doc.start_offset(node)?))
    }

    /// Position right after a node, `None` if the node is detached
    pub fn after(doc: &Document, node: NodeId) -> Option<Self> {
        let start = doc.start_offset(node)?;
        Some(Self::new(doc.parent(node)?, start + doc.offset_size(node)))
    }

    /// Resolve a target and placement into a position.
    ///
    /// A target that already is a position is returned unchanged, whatever the
    /// placement. For nodes, `Before`/`After` need an attached node and
    /// `End`/`Offset` need an element (and an offset within its content).
    pub fn create_at(doc: &Document, target: impl Into<Target>, placement: Placement) -> Option<Self> {
        match target.into() {
            Target::Position(position) => Some(position),
            Target::Node(node) => match placement {
                Placement::Before => Self::before(doc, node),
                Placement::After => Self::after(doc, node),
                Placement::End => doc.is_element(node).then(|| Self::at_end(doc, node)),
                Placement::Offset(offset) => (doc.is_element(node)
                    && offset <= doc.max_offset(node))
                .then_some(Self::new(node, offset)),
            },
        }
    }

    pub fn is_at_start(&self) -> bool {
        self.offset == 0
    }

    pub fn is_at_end(&self, doc: &Document) -> bool {
        self.offset == doc.max_offset(self.parent)
    }

    /// Offsets from the root down to this position, used for document order
    pub fn path(&self, doc: &Document) -> Vec<usize> {
        doc.ancestors(self.parent)
            .iter()
            .skip(1)
            .filter_map(|node| doc.start_offset(*node))
            .chain(std::iter::once(self.offset))
            .collect()
    }

    pub fn compare(&self, other: &Position, doc: &Document) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.path(doc).cmp(&other.path(doc))
    }

    pub fn is_before(&self, other: &Position, doc: &Document) -> bool {
        self.compare(other, doc) == Ordering::Less
    }
}
