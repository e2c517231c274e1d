use super::document::Document;
use super::position::Position;

/// Two positions in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    /// Build a range from two positions given in any order
    pub fn new(doc: &Document, a: Position, b: Position) -> Self {
        if b.is_before(&a, doc) {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Whether both ends share a parent element
    pub fn is_flat(&self) -> bool {
        self.start.parent == self.end.parent
    }
}
