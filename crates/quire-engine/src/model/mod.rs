//! Tree model: the document arena and the values that address it.
//!
//! - **`document`**: `Document` arena of element and text nodes
//! - **`position`**: `Position` (parent element + offset) and how to create one
//! - **`range`**: ordered pair of positions
//! - **`selection`**: ranges plus direction, with anchor/focus accessors
//!
//! Offsets count one unit per text character and one per child element, so a
//! position stays meaningful when text nodes are split or joined.

pub mod document;
pub mod position;
pub mod range;
pub mod selection;

pub use document::{Document, NodeId, NodeKind, ROOT_NAME};
pub use position::{Placement, Position, Target};
pub use range::Range;
pub use selection::Selection;
