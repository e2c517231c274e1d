pub mod editing;
pub mod model;
pub mod notation;
pub mod schema;

// Re-export key types for easier usage
pub use editing::{
    AfterExecuteListener, Command, CommandBase, CommandCollection, CommandError, ContentEditor,
    DeleteOptions, Model, MutationHandle, Operation, Patch, SOFT_BREAK, SoftBreakCommand, Writer,
    soft_break_action,
};
pub use model::{Document, NodeId, NodeKind, Placement, Position, Range, Selection, Target};
pub use notation::NotationError;
pub use schema::{ItemDefinition, LimitCheck, Schema, SchemaError};
