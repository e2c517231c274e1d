/*!
 * # Editing Core Module
 *
 * Everything that changes a [`Model`] lives here.
 *
 * ## Architecture Overview
 *
 * ### 1. One Change, One Patch
 * - Mutations only happen inside **`Model::change`**, which lends out a **`Writer`**
 * - The writer records every primitive as an **`Operation`**
 * - The change returns a **`Patch`** with the operations, the new selection and the model version
 *
 * ### 2. Narrow Seams for Actions
 * - Actions depend on the **`MutationHandle`** and **`ContentEditor`** traits, not on `Writer`
 * - Limit checks go through **`LimitCheck`**, so a plain predicate can stand in for a schema
 *
 * ### 3. Commands
 * - A **`Command`** refreshes its enabled state from the model and runs in a change of its own
 * - Listeners registered on the command run inside that same change
 * - **`CommandCollection`** looks commands up by name
 *
 * ## Module Structure
 *
 * - **`model`**: `Model` and its change scope
 * - **`writer`**: `Writer` plus the traits actions are written against
 * - **`patch`**: operations and change results
 * - **`delete_content`**: removal of the selected content with optional merging
 * - **`soft_break`**: the soft break action and command
 * - **`commands`**: command trait, shared state and registry
 *
 * ## Usage Pattern
 *
 * ```rust
 * use quire_engine::editing::*;
 * use quire_engine::schema::Schema;
 *
 * let mut model = Model::from_notation("<paragraph>fo[]o</paragraph>", Schema::default()).unwrap();
 *
 * let mut commands = CommandCollection::new();
 * commands.add(SoftBreakCommand::new());
 *
 * let patch = commands.execute("softBreak", &mut model).unwrap();
 * assert!(patch.is_some());
 * assert_eq!(
 *     model.to_notation(),
 *     "<paragraph>fo<softBreak></softBreak>[]o</paragraph>"
 * );
 * ```
 */

pub mod commands;
pub mod delete_content;
pub mod model;
pub mod patch;
pub mod soft_break;
pub mod writer;

pub use commands::{AfterExecuteListener, Command, CommandBase, CommandCollection, CommandError};
pub use model::Model;
pub use patch::{Operation, Patch};
pub use soft_break::{SOFT_BREAK, SoftBreakCommand, soft_break_action};
pub use writer::{ContentEditor, DeleteOptions, MutationHandle, Writer};
