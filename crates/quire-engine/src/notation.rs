//! Compact text notation for documents and selections.
//!
//! ```text
//! <heading>x[x</heading><paragraph>y]y</paragraph>
//! <paragraph>foo<softBreak></softBreak>[]</paragraph>
//! ```
//!
//! Elements are written as tags (`<name/>` is accepted for empty ones), text
//! as plain characters. `[` and `]` mark range boundaries and `[]` a caret.
//! Everything sits inside an implicit root element, so markers may also
//! appear between top level elements.

use thiserror::Error;

use crate::model::{Document, NodeId, NodeKind, Position, Range, Selection};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("Expected `</{expected}>` but found `</{found}>` at byte {at}")]
    MismatchedClosingTag {
        expected: String,
        found: String,
        at: usize,
    },

    #[error("Element `{0}` is never closed")]
    UnclosedElement(String),

    #[error("Tag starting at byte {at} is not terminated")]
    UnterminatedTag { at: usize },

    #[error("Empty tag name at byte {at}")]
    EmptyTagName { at: usize },

    #[error("Unbalanced selection marker at byte {at}")]
    UnbalancedSelection { at: usize },
}

struct Parser {
    document: Document,
    open: Vec<NodeId>,
    text: String,
    pending_start: Option<(Position, usize)>,
    ranges: Vec<Range>,
}

impl Parser {
    fn new() -> Self {
        let document = Document::new();
        let root = document.root();
        Self {
            document,
            open: vec![root],
            text: String::new(),
            pending_start: None,
            ranges: Vec::new(),
        }
    }

    fn current(&self) -> NodeId {
        self.open[self.open.len() - 1]
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = self.document.create_text(std::mem::take(&mut self.text));
        let parent = self.current();
        self.document.append_child(parent, text);
    }

    fn here(&mut self) -> Position {
        self.flush_text();
        let parent = self.current();
        Position::new(parent, self.document.max_offset(parent))
    }

    fn tag(&mut self, body: &str, at: usize) -> Result<(), NotationError> {
        self.flush_text();

        if let Some(name) = body.strip_prefix('/') {
            let name = name.trim();
            if name.is_empty() {
                return Err(NotationError::EmptyTagName { at });
            }
            let current = self.current();
            let expected = self.document.name(current).unwrap_or_default();
            if self.open.len() == 1 || expected != name {
                return Err(NotationError::MismatchedClosingTag {
                    expected: expected.to_string(),
                    found: name.to_string(),
                    at,
                });
            }
            self.open.pop();
            return Ok(());
        }

        let (name, self_closing) = match body.strip_suffix('/') {
            Some(name) => (name.trim(), true),
            None => (body.trim(), false),
        };
        if name.is_empty() {
            return Err(NotationError::EmptyTagName { at });
        }

        let element = self.document.create_element(name);
        let parent = self.current();
        self.document.append_child(parent, element);
        if !self_closing {
            self.open.push(element);
        }
        Ok(())
    }

    fn start_marker(&mut self, at: usize) -> Result<(), NotationError> {
        if self.pending_start.is_some() {
            return Err(NotationError::UnbalancedSelection { at });
        }
        let position = self.here();
        self.pending_start = Some((position, at));
        Ok(())
    }

    fn end_marker(&mut self, at: usize) -> Result<(), NotationError> {
        let Some((start, _)) = self.pending_start.take() else {
            return Err(NotationError::UnbalancedSelection { at });
        };
        let end = self.here();
        self.ranges.push(Range::new(&self.document, start, end));
        Ok(())
    }

    fn finish(mut self) -> Result<(Document, Selection), NotationError> {
        self.flush_text();
        if let Some((_, at)) = self.pending_start {
            return Err(NotationError::UnbalancedSelection { at });
        }
        if self.open.len() > 1 {
            let name = self.document.name(self.current()).unwrap_or_default();
            return Err(NotationError::UnclosedElement(name.to_string()));
        }
        Ok((self.document, Selection::new(self.ranges, false)))
    }
}

/// Parse the notation into a document and a forward selection
pub fn parse(input: &str) -> Result<(Document, Selection), NotationError> {
    let mut parser = Parser::new();
    let mut chars = input.char_indices();

    while let Some((at, c)) = chars.next() {
        match c {
            '<' => {
                let rest = &input[at + 1..];
                let Some(length) = rest.find('>') else {
                    return Err(NotationError::UnterminatedTag { at });
                };
                parser.tag(&rest[..length], at)?;
                // Skip the tag body and the closing '>'.
                for _ in rest[..=length].chars() {
                    chars.next();
                }
            }
            '[' => parser.start_marker(at)?,
            ']' => parser.end_marker(at)?,
            c => parser.text.push(c),
        }
    }

    parser.finish()
}

/// Render a document and selection back into the notation
pub fn stringify(document: &Document, selection: &Selection) -> String {
    let mut output = String::new();
    write_children(document, selection, document.root(), &mut output);
    output
}

fn write_children(document: &Document, selection: &Selection, element: NodeId, output: &mut String) {
    let mut offset = 0;
    write_markers(selection, Position::new(element, offset), output);

    for &child in document.children(element) {
        match document.kind(child) {
            NodeKind::Element { name } => {
                output.push('<');
                output.push_str(name);
                output.push('>');
                write_children(document, selection, child, output);
                output.push_str("</");
                output.push_str(name);
                output.push('>');
                offset += 1;
                write_markers(selection, Position::new(element, offset), output);
            }
            NodeKind::Text { data } => {
                for c in data.chars() {
                    output.push(c);
                    offset += 1;
                    write_markers(selection, Position::new(element, offset), output);
                }
            }
        }
    }
}

fn write_markers(selection: &Selection, position: Position, output: &mut String) {
    let ranges = selection.ranges();

    // Close ranges before opening new ones so touching ranges read `a]b[c`.
    for range in ranges {
        if !range.is_collapsed() && range.end() == position {
            output.push(']');
        }
    }
    for range in ranges {
        if range.start() == position {
            output.push_str(if range.is_collapsed() { "[]" } else { "[" });
        }
    }
}
