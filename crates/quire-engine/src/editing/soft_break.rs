//! Soft break: a line break inside the current block (Shift+Enter).

use crate::editing::commands::{Command, CommandBase};
use crate::editing::writer::{ContentEditor, DeleteOptions, MutationHandle, Writer};
use crate::model::{NodeId, Placement, Position};
use crate::schema::LimitCheck;

/// Name of the break marker element and of the command inserting it
pub const SOFT_BREAK: &str = "softBreak";

/// Insert a soft break at the selection, replacing selected content.
///
/// Limit elements (the root included) are never split: a selection inside a
/// single limit only has its content deleted, and any other selection
/// touching a limit is left alone. Otherwise the selected content is deleted
/// and a break is inserted where the caret lands, except when the selection
/// spans several elements, in which case the caret moves to the start of the
/// last one.
pub fn soft_break_action<E, S>(editor: &mut E, schema: &S)
where
    E: MutationHandle + ContentEditor + ?Sized,
    S: LimitCheck + ?Sized,
{
    let document = editor.document();
    let selection = editor.selection();
    let is_selection_empty = selection.is_collapsed();
    let Some(range) = selection.first_range(document) else {
        log::warn!("soft break requested without a selection");
        return;
    };

    let start_element = range.start().parent;
    let end_element = range.end().parent;
    let is_contained_within_one_element = range.is_flat();
    let is_limit = |element: NodeId| document.name(element).is_some_and(|name| schema.is_limit(name));

    // Don't touch the roots and other limit elements.
    if is_limit(start_element) || is_limit(end_element) {
        // Deleting inside one limit is fine. A selection crossing limit boundaries,
        // e.g. <limit1>x[x</limit1>donttouchme<limit2>y]y</limit2>, is left as is.
        if !is_selection_empty && is_contained_within_one_element {
            editor.delete_content(DeleteOptions::default());
        } else {
            log::debug!("soft break: selection touches a limit element, nothing to do");
        }
        return;
    }

    if is_selection_empty {
        insert_break(editor, range.end());
        return;
    }

    let document = editor.document();
    let leave_unmerged = !(range.start().is_at_start() && range.end().is_at_end(document));
    editor.delete_content(DeleteOptions { leave_unmerged });

    if !leave_unmerged {
        return;
    }

    if is_contained_within_one_element {
        // <h>x[xx]x</h> -> <h>x^x</h> -> <h>x<softBreak/>^x</h>
        if let Some(focus) = editor.selection().focus() {
            insert_break(editor, focus);
        }
    } else {
        // <h>x[x</h><p>y]y</p> -> <h>x^</h><p>y</p> -> <h>x</h><p>^y</p>
        editor.set_selection(end_element.into(), Placement::Offset(0));
    }
}

fn insert_break<E>(editor: &mut E, position: Position)
where
    E: MutationHandle + ?Sized,
{
    let marker = editor.create_element(SOFT_BREAK);

    let placement = if position.is_at_end(editor.document()) {
        Placement::After
    } else if position.is_at_start() {
        Placement::Before
    } else {
        Placement::End
    };
    log::debug!("soft break: inserting marker at {position:?} ({placement:?})");

    editor.insert(marker, position.into(), placement);
    editor.set_selection(marker.into(), Placement::After);
}

/// Command wrapper around [`soft_break_action`]
#[derive(Debug, Default)]
pub struct SoftBreakCommand {
    base: CommandBase,
}

impl SoftBreakCommand {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for SoftBreakCommand {
    fn name(&self) -> &'static str {
        SOFT_BREAK
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn run(&mut self, writer: &mut Writer<'_>) {
        let schema = writer.schema();
        soft_break_action(writer, schema);
    }
}
