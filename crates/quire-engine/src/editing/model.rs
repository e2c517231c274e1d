use crate::editing::patch::Patch;
use crate::editing::writer::{ContentEditor, DeleteOptions, Writer};
use crate::model::{Document, Selection};
use crate::notation::{self, NotationError};
use crate::schema::Schema;

/// Editable model: document tree, current selection and the schema they obey.
///
/// All mutations happen inside [`Model::change`], which is the atomic change
/// scope commands run in. The model never hands a `Writer` out beyond the
/// callback.
#[derive(Debug, Clone)]
pub struct Model {
    document: Document,
    selection: Selection,
    schema: Schema,
    /// Incremented by every change that performed at least one operation
    version: u64,
}

impl Model {
    /// Empty document with no selection
    pub fn new(schema: Schema) -> Self {
        Self::from_parts(Document::new(), Selection::empty(), schema)
    }

    pub fn from_parts(document: Document, selection: Selection, schema: Schema) -> Self {
        Self {
            document,
            selection,
            schema,
            version: 0,
        }
    }

    /// Build a model from its notation, e.g. `<paragraph>fo[]o</paragraph>`
    pub fn from_notation(input: &str, schema: Schema) -> Result<Self, NotationError> {
        let (document, selection) = notation::parse(input)?;
        Ok(Self::from_parts(document, selection, schema))
    }

    pub fn to_notation(&self) -> String {
        notation::stringify(&self.document, &self.selection)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Run `callback` with a writer and report what it changed
    pub fn change(&mut self, callback: impl FnOnce(&mut Writer<'_>)) -> Patch {
        let mut writer = Writer::new(&mut self.document, &mut self.selection, &self.schema);
        callback(&mut writer);
        let operations = writer.into_operations();

        if !operations.is_empty() {
            self.version += 1;
        }
        log::trace!(
            "change recorded {} operation(s), model version {}",
            operations.len(),
            self.version
        );

        Patch {
            operations,
            new_selection: self.selection.clone(),
            version: self.version,
        }
    }

    /// Delete the selected content in a change of its own
    pub fn delete_content(&mut self, options: DeleteOptions) -> Patch {
        self.change(|writer| writer.delete_content(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    #[test]
    fn test_new_model_is_empty() {
        let model = Model::new(Schema::default());

        assert!(model.document().is_empty(model.document().root()));
        assert_eq!(model.selection(), &Selection::empty());
        assert_eq!(model.version(), 0);
    }

    #[test]
    fn test_empty_change_keeps_version() {
        let mut model = Model::from_notation("<paragraph>[]</paragraph>", Schema::default()).unwrap();

        let patch = model.change(|_| {});

        assert!(patch.is_empty());
        assert_eq!(patch.version, 0);
        assert_eq!(model.version(), 0);
    }

    #[test]
    fn test_change_bumps_version_and_reports_selection() {
        let mut model = Model::from_notation("<paragraph>[]ab</paragraph>", Schema::default()).unwrap();
        let paragraph = model.document().children(model.document().root())[0];

        let patch = model.change(|writer| writer.set_caret(Position::new(paragraph, 2)));

        assert_eq!(patch.version, 1);
        assert_eq!(model.version(), 1);
        assert_eq!(patch.new_selection, Selection::caret(Position::new(paragraph, 2)));
    }

    #[test]
    fn test_from_notation_reports_errors() {
        assert!(Model::from_notation("<paragraph>oops", Schema::default()).is_err());
    }
}
