//! Removal of selected content, optionally merging what is left around it.

use crate::editing::writer::{DeleteOptions, MutationHandle, Writer};
use crate::model::{NodeId, Position};
use crate::schema::LimitCheck;

/// Delete the content of the selection's first range and collapse the
/// selection where the range started.
///
/// ```text
/// <paragraph>x[x</paragraph><heading>y]y</heading>
///   leave_unmerged: false -> <paragraph>x[]y</paragraph>
///   leave_unmerged: true  -> <paragraph>x[]</paragraph><heading>y</heading>
/// ```
pub fn delete_content(writer: &mut Writer<'_>, options: DeleteOptions) {
    let Some(range) = writer.selection().first_range(writer.document()) else {
        log::warn!("delete_content called without a selection");
        return;
    };
    if range.is_collapsed() {
        return;
    }

    let start = range.start();
    let end = range.end();
    let Some(common) = writer.document().common_ancestor(start.parent, end.parent) else {
        log::warn!("selection ends {start:?} and {end:?} are in different trees");
        return;
    };

    let end = remove_between(writer, start, end, common);

    if !options.leave_unmerged {
        merge_branches(writer, start, end, common);
    }

    writer.set_caret(start);
}

/// Remove everything between `start` and `end`. Returns where `end` sits
/// once the content is gone.
fn remove_between(
    writer: &mut Writer<'_>,
    start: Position,
    end: Position,
    common: NodeId,
) -> Position {
    if start.parent == end.parent {
        writer.remove_offsets(start.parent, start.offset, end.offset);
        return start;
    }

    // Start side: drop everything after the boundary on each level up to the common ancestor.
    let mut upper_start = start;
    while upper_start.parent != common {
        let element = upper_start.parent;
        let max_offset = writer.document().max_offset(element);
        writer.remove_offsets(element, upper_start.offset, max_offset);
        let Some(after) = Position::after(writer.document(), element) else {
            return end;
        };
        upper_start = after;
    }

    // End side: drop everything before the boundary on each level.
    let mut upper_end = end;
    while upper_end.parent != common {
        let element = upper_end.parent;
        writer.remove_offsets(element, 0, upper_end.offset);
        let Some(before) = Position::before(writer.document(), element) else {
            return end;
        };
        upper_end = before;
    }

    writer.remove_offsets(common, upper_start.offset, upper_end.offset);

    if end.parent == common {
        upper_start
    } else {
        Position::at_start(end.parent)
    }
}

/// Join the branches left on both sides of a removed span, innermost first.
fn merge_branches(writer: &mut Writer<'_>, start: Position, end: Position, common: NodeId) {
    let mut start = start;
    let mut end = end;

    loop {
        let start_element = start.parent;
        let end_element = end.parent;
        if start_element == common || end_element == common {
            return;
        }
        if !can_be_merged(writer, start_element, end_element, common) {
            log::debug!("not merging {start_element:?} and {end_element:?}: limit element in the way");
            return;
        }

        let document = writer.document();
        let (Some(after_start), Some(before_end)) = (
            Position::after(document, start_element),
            Position::before(document, end_element),
        ) else {
            return;
        };

        if before_end != after_start {
            writer.move_node(end_element, after_start);
        }
        writer.merge(after_start);

        // Moving the end element out may have emptied its ancestors.
        let mut next_end = before_end;
        while next_end.parent != common && writer.document().is_empty(next_end.parent) {
            let empty = next_end.parent;
            let Some(before) = Position::before(writer.document(), empty) else {
                break;
            };
            writer.remove(empty);
            next_end = before;
        }

        start = after_start;
        end = next_end;
    }
}

/// No limit element between either branch and the common ancestor
fn can_be_merged(writer: &Writer<'_>, left: NodeId, right: NodeId, common: NodeId) -> bool {
    let document = writer.document();
    let schema = writer.schema();
    [left, right].into_iter().all(|element| {
        document
            .ancestors(element)
            .into_iter()
            .rev()
            .take_while(|node| *node != common)
            .all(|node| document.name(node).is_none_or(|name| !schema.is_limit(name)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{ContentEditor, Model};
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn delete(input: &str, leave_unmerged: bool) -> String {
        let mut model = Model::from_notation(input, Schema::default()).unwrap();
        model.change(|writer| writer.delete_content(DeleteOptions { leave_unmerged }));
        model.to_notation()
    }

    #[rstest]
    #[case::inside_text("<paragraph>f[oo]bar</paragraph>", "<paragraph>f[]bar</paragraph>")]
    #[case::whole_element("<paragraph>[foo]</paragraph>", "<paragraph>[]</paragraph>")]
    #[case::across_inline_element(
        "<paragraph>a[b<softBreak></softBreak>c]d</paragraph>",
        "<paragraph>a[]d</paragraph>"
    )]
    #[case::two_blocks(
        "<paragraph>x[x</paragraph><heading>y]y</heading>",
        "<paragraph>x[]y</paragraph>"
    )]
    #[case::blocks_in_between(
        "<paragraph>x[x</paragraph><heading>a</heading><heading>b</heading><paragraph>y]y</paragraph>",
        "<paragraph>x[]y</paragraph>"
    )]
    #[case::full_content_of_two_blocks(
        "<paragraph>[xx</paragraph><heading>yy]</heading>",
        "<paragraph>[]</paragraph>"
    )]
    #[case::different_depths(
        "<blockQuote><paragraph>x[x</paragraph></blockQuote><paragraph>y]y</paragraph>",
        "<blockQuote><paragraph>x[]y</paragraph></blockQuote>"
    )]
    #[case::end_deeper_than_start(
        "<paragraph>x[x</paragraph><blockQuote><paragraph>y]y</paragraph><paragraph>z</paragraph></blockQuote>",
        "<paragraph>x[]y</paragraph><blockQuote><paragraph>z</paragraph></blockQuote>"
    )]
    #[case::emptied_end_ancestor_is_removed(
        "<paragraph>x[x</paragraph><blockQuote><paragraph>y]y</paragraph></blockQuote>",
        "<paragraph>x[]y</paragraph>"
    )]
    fn test_delete_and_merge(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(delete(input, false), expected);
    }

    #[rstest]
    #[case::two_blocks(
        "<paragraph>x[x</paragraph><heading>y]y</heading>",
        "<paragraph>x[]</paragraph><heading>y</heading>"
    )]
    #[case::blocks_in_between(
        "<paragraph>x[x</paragraph><heading>a</heading><paragraph>y]y</paragraph>",
        "<paragraph>x[]</paragraph><paragraph>y</paragraph>"
    )]
    #[case::single_element("<paragraph>x[xx]x</paragraph>", "<paragraph>x[]x</paragraph>")]
    fn test_delete_leaving_unmerged(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(delete(input, true), expected);
    }

    #[test]
    fn test_limit_elements_are_never_merged() {
        let input = "<table><tableRow><tableCell>x[x</tableCell><tableCell>y]y</tableCell></tableRow></table>";

        assert_eq!(
            delete(input, false),
            "<table><tableRow><tableCell>x[]</tableCell><tableCell>y</tableCell></tableRow></table>"
        );
    }

    #[test]
    fn test_collapsed_selection_is_a_no_op() {
        let mut model = Model::from_notation("<paragraph>fo[]o</paragraph>", Schema::default()).unwrap();

        let patch = model.delete_content(DeleteOptions::default());

        assert!(patch.is_empty());
        assert_eq!(model.to_notation(), "<paragraph>fo[]o</paragraph>");
    }

    #[test]
    fn test_selection_in_root_between_blocks() {
        assert_eq!(
            delete("<paragraph>a</paragraph>[<paragraph>b</paragraph>]<paragraph>c</paragraph>", false),
            "<paragraph>a</paragraph>[]<paragraph>c</paragraph>"
        );
    }
}
