//! Country tree rendering

use super::field_renderer::{focus_style, indent, FOCUS_MARKER};
use crate::state::{CountryNodeKind, CountryTree};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// One line per visible node, paired with the node index for focus tracking
pub fn country_lines(
    tree: &CountryTree,
    depth: usize,
    focused: Option<usize>,
) -> Vec<(usize, Line<'static>)> {
    tree.visible_nodes()
        .into_iter()
        .map(|index| {
            let node = &tree.nodes()[index];
            let is_focused = focused == Some(index);
            let symbol = match node.kind {
                CountryNodeKind::Heading { expanded: true } => "▾ ",
                CountryNodeKind::Heading { expanded: false } => "▸ ",
                CountryNodeKind::Leaf { selected: true } => "[x] ",
                CountryNodeKind::Leaf { selected: false } => "[ ] ",
            };
            let pad = indent(depth + node.depth);
            let lead = if is_focused {
                Span::styled(
                    format!("{}{FOCUS_MARKER}", &pad[..pad.len() - 2]),
                    Style::default().fg(Color::Cyan),
                )
            } else {
                Span::raw(pad)
            };
            let line = Line::from(vec![
                lead,
                Span::styled(format!("{symbol}{}", node.label), focus_style(is_focused)),
            ]);
            (index, line)
        })
        .collect()
}
