use super::document::Document;
use super::position::Position;
use super::range::Range;

/// Document selection: any number of ranges and the direction of the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<Range>,
    backward: bool,
}

impl Selection {
    pub fn new(ranges: Vec<Range>, backward: bool) -> Self {
        Self { ranges, backward }
    }

    /// Selection without any range
    pub fn empty() -> Self {
        Self::default()
    }

    /// A caret at `position`
    pub fn caret(position: Position) -> Self {
        Self::new(vec![Range::collapsed(position)], false)
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_backward(&self) -> bool {
        self.backward
    }

    /// True only for exactly one collapsed range
    pub fn is_collapsed(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].is_collapsed()
    }

    /// Range whose start comes first in the document
    pub fn first_range(&self, doc: &Document) -> Option<Range> {
        self.ranges
            .iter()
            .copied()
            .min_by(|a, b| a.start().compare(&b.start(), doc))
    }

    /// Active end of the most recently added range
    pub fn focus(&self) -> Option<Position> {
        let last = self.ranges.last()?;
        Some(if self.backward { last.start() } else { last.end() })
    }

    /// Fixed end of the most recently added range
    pub fn anchor(&self) -> Option<Position> {
        let last = self.ranges.last()?;
        Some(if self.backward { last.end() } else { last.start() })
    }
}
