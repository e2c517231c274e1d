use crate::editing::delete_content;
use crate::editing::patch::Operation;
use crate::model::{Document, NodeId, Placement, Position, Selection, Target};
use crate::schema::Schema;

/// Tree and selection mutations available to editing actions
pub trait MutationHandle {
    fn document(&self) -> &Document;

    fn selection(&self) -> &Selection;

    /// Allocate a detached element
    fn create_element(&mut self, name: &str) -> NodeId;

    /// Insert a detached node at the position resolved from `target` and
    /// `placement` (see [`Position::create_at`])
    fn insert(&mut self, node: NodeId, target: Target, placement: Placement);

    /// Replace the selection with a caret at the resolved position
    fn set_selection(&mut self, target: Target, placement: Placement);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Keep the elements on both sides of the deleted span apart
    pub leave_unmerged: bool,
}

/// Deletion of the selected content
pub trait ContentEditor {
    fn delete_content(&mut self, options: DeleteOptions);
}

/// Mutation handle lent out by `Model::change`.
///
/// Every primitive goes through here so the change can report what it did.
pub struct Writer<'a> {
    document: &'a mut Document,
    selection: &'a mut Selection,
    schema: &'a Schema,
    operations: Vec<Operation>,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(
        document: &'a mut Document,
        selection: &'a mut Selection,
        schema: &'a Schema,
    ) -> Self {
        Self {
            document,
            selection,
            schema,
            operations: Vec::new(),
        }
    }

    /// Schema of the model being changed, usable while the writer is borrowed
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub(crate) fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.document.create_text(data)
    }

    /// Insert a detached node, or move an attached one, at `position`
    pub fn insert_at(&mut self, node: NodeId, position: Position) {
        if self.document.parent(node).is_some() {
            self.move_node(node, position);
            return;
        }
        log::trace!("insert {node:?} at {position:?}");
        self.document
            .insert_at(position.parent, position.offset, node);
        self.operations.push(Operation::Insert { node, position });
    }

    /// Remove the content between two offsets of one element
    pub fn remove_offsets(&mut self, parent: NodeId, from: usize, to: usize) {
        if from >= to {
            return;
        }
        log::trace!("remove {from}..{to} from {parent:?}");
        self.document.remove_offsets(parent, from, to);
        self.operations.push(Operation::Remove {
            position: Position::new(parent, from),
            how_many: to - from,
        });
    }

    /// Detach a node from the tree
    pub fn remove(&mut self, node: NodeId) {
        let Some(position) = Position::before(self.document, node) else {
            return;
        };
        let how_many = self.document.offset_size(node);
        log::trace!("remove {node:?} at {position:?}");
        self.document.detach(node);
        self.operations.push(Operation::Remove { position, how_many });
    }

    /// Move an attached node to `target`, given in pre-move coordinates
    pub fn move_node(&mut self, node: NodeId, target: Position) {
        let Some(source) = Position::before(self.document, node) else {
            log::warn!("cannot move detached node {node:?}");
            return;
        };
        let mut target = target;
        if source.parent == target.parent && source.offset < target.offset {
            target.offset -= self.document.offset_size(node);
        }
        log::trace!("move {node:?} from {source:?} to {target:?}");
        self.document.detach(node);
        self.document.insert_at(target.parent, target.offset, node);
        self.operations.push(Operation::Move { node, target });
    }

    /// Merge the element after `position` into the element before it
    pub fn merge(&mut self, position: Position) {
        if self.document.merge_at(position.parent, position.offset) {
            log::trace!("merge at {position:?}");
            self.operations.push(Operation::Merge { position });
        } else {
            log::warn!("nothing to merge at {position:?}");
        }
    }

    /// Collapse the selection at `position`
    pub fn set_caret(&mut self, position: Position) {
        self.replace_selection(Selection::caret(position));
    }

    pub fn replace_selection(&mut self, selection: Selection) {
        *self.selection = selection.clone();
        self.operations.push(Operation::SetSelection { selection });
    }
}

impl MutationHandle for Writer<'_> {
    fn document(&self) -> &Document {
        self.document
    }

    fn selection(&self) -> &Selection {
        self.selection
    }

    fn create_element(&mut self, name: &str) -> NodeId {
        self.document.create_element(name)
    }

    fn insert(&mut self, node: NodeId, target: Target, placement: Placement) {
        match Position::create_at(self.document, target, placement) {
            Some(position) => self.insert_at(node, position),
            None => log::warn!("cannot insert {node:?}: {target:?} with {placement:?} is not a valid position"),
        }
    }

    fn set_selection(&mut self, target: Target, placement: Placement) {
        match Position::create_at(self.document, target, placement) {
            Some(position) => self.set_caret(position),
            None => log::warn!("cannot select {target:?} with {placement:?}: not a valid position"),
        }
    }
}

impl ContentEditor for Writer<'_> {
    fn delete_content(&mut self, options: DeleteOptions) {
        delete_content::delete_content(self, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Model;
    use crate::model::Range;
    use pretty_assertions::assert_eq;

    fn model(input: &str) -> Model {
        Model::from_notation(input, Schema::default()).unwrap()
    }

    #[test]
    fn test_insert_records_operation() {
        let mut model = model("<paragraph>foo[]</paragraph>");
        let paragraph = model.document().children(model.document().root())[0];

        let patch = model.change(|writer| {
            let marker = writer.create_element("softBreak");
            writer.insert(marker, paragraph.into(), Placement::End);
        });

        assert_eq!(patch.operations.len(), 1);
        assert!(matches!(
            patch.operations[0],
            Operation::Insert { position, .. } if position == Position::new(paragraph, 3)
        ));
        assert_eq!(model.to_notation(), "<paragraph>foo[]<softBreak></softBreak></paragraph>");
    }

    #[test]
    fn test_insert_with_invalid_target_does_nothing() {
        let mut model = model("<paragraph>foo[]</paragraph>");

        let patch = model.change(|writer| {
            let marker = writer.create_element("softBreak");
            let detached = writer.create_element("paragraph");
            writer.insert(marker, detached.into(), Placement::After);
        });

        assert!(patch.is_empty());
        assert_eq!(model.version(), 0);
    }

    #[test]
    fn test_set_selection_after_node() {
        let mut model = model("<paragraph>[]foo</paragraph><paragraph>bar</paragraph>");
        let root = model.document().root();
        let first = model.document().children(root)[0];

        model.change(|writer| writer.set_selection(first.into(), Placement::After));

        assert_eq!(model.selection(), &Selection::caret(Position::new(root, 1)));
    }

    #[test]
    fn test_move_within_same_parent_accounts_for_removal() {
        let mut model = model("<paragraph>a</paragraph><paragraph>b</paragraph><heading>c[]</heading>");
        let root = model.document().root();
        let first = model.document().children(root)[0];

        model.change(|writer| writer.move_node(first, Position::new(root, 3)));

        assert_eq!(
            model.to_notation(),
            "<paragraph>b</paragraph><heading>c[]</heading><paragraph>a</paragraph>"
        );
    }

    #[test]
    fn test_merge_and_remove() {
        let mut model = model("<paragraph>a</paragraph><paragraph>b</paragraph><heading>[]</heading>");
        let root = model.document().root();
        let heading = model.document().children(root)[2];

        let patch = model.change(|writer| {
            writer.merge(Position::new(root, 1));
            writer.remove(heading);
            writer.set_caret(Position::new(root, 1));
        });

        assert_eq!(model.to_notation(), "<paragraph>ab</paragraph>[]");
        assert_eq!(patch.operations.len(), 3);
        assert!(patch.changes_tree());
    }

    #[test]
    fn test_replace_selection_is_not_a_tree_change() {
        let mut model = model("<paragraph>f[]oo</paragraph>");
        let paragraph = model.document().children(model.document().root())[0];
        let range = Range::new(
            model.document(),
            Position::new(paragraph, 0),
            Position::new(paragraph, 3),
        );

        let patch = model.change(|writer| writer.replace_selection(Selection::new(vec![range], true)));

        assert!(!patch.changes_tree());
        assert_eq!(model.to_notation(), "<paragraph>[foo]</paragraph>");
        assert!(model.selection().is_backward());
        assert_eq!(model.version(), 1);
    }
}
