use crate::model::{NodeId, Position, Selection};

/// Primitive tree or selection change performed through a `Writer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Insert { node: NodeId, position: Position },
    Remove { position: Position, how_many: usize },
    Move { node: NodeId, target: Position },
    Merge { position: Position },
    SetSelection { selection: Selection },
}

impl Operation {
    pub fn changes_tree(&self) -> bool {
        !matches!(self, Operation::SetSelection { .. })
    }
}

/// Result of one `Model::change`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub operations: Vec<Operation>,
    pub new_selection: Selection,
    pub version: u64,
}

impl Patch {
    /// No operation at all was recorded
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn changes_tree(&self) -> bool {
        self.operations.iter().any(Operation::changes_tree)
    }

    /// Nodes inserted during the change, in order
    pub fn inserted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.operations.iter().filter_map(|operation| match operation {
            Operation::Insert { node, .. } => Some(*node),
            _ => None,
        })
    }
}
