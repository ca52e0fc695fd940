//! Field rendering utilities for forms

use crate::state::{FieldKind, FormField};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Marker drawn before the focused item
pub const FOCUS_MARKER: &str = "› ";
const CURSOR: &str = "▌";

pub fn indent(depth: usize) -> String {
    "  ".repeat(depth + 1)
}

pub fn focus_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Leading indent, with the focus marker replacing its last two columns
fn lead(depth: usize, is_focused: bool) -> Span<'static> {
    if is_focused {
        let mut pad = indent(depth);
        pad.truncate(pad.len() - FOCUS_MARKER.chars().count());
        Span::styled(
            format!("{pad}{FOCUS_MARKER}"),
            Style::default().fg(Color::Cyan),
        )
    } else {
        Span::raw(indent(depth))
    }
}

fn label_span(field: &FormField, is_focused: bool) -> Span<'static> {
    let text = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    };
    let style = if field.error_visible() {
        Style::default().fg(Color::Red)
    } else {
        focus_style(is_focused)
    };
    Span::styled(text, style)
}

/// Lines for one field: the label and value, then its error if shown
pub fn field_lines(field: &FormField, depth: usize, is_focused: bool) -> Vec<Line<'static>> {
    let value_style = focus_style(is_focused);
    let mut lines = match &field.kind {
        FieldKind::Checkbox { .. } => {
            let mark = if field.is_checked() { "[x] " } else { "[ ] " };
            vec![Line::from(vec![
                lead(depth, is_focused),
                Span::styled(mark, value_style),
                label_span(field, is_focused),
            ])]
        }
        FieldKind::RadioGroup { options } => {
            let selected = field.selected_option();
            let mut spans = vec![Span::raw(indent(depth + 1))];
            for option in options {
                let mark = if Some(option.as_str()) == selected {
                    "(•) "
                } else {
                    "( ) "
                };
                spans.push(Span::styled(format!("{mark}{option}  "), value_style));
            }
            vec![
                Line::from(vec![lead(depth, is_focused), label_span(field, is_focused)]),
                Line::from(spans),
            ]
        }
        FieldKind::Number { .. } => vec![Line::from(vec![
            lead(depth, is_focused),
            label_span(field, is_focused),
            Span::raw(": "),
            Span::styled(format!("< {} >", field.as_number()), value_style),
        ])],
        FieldKind::CountryList => {
            let value = field.as_text();
            let shown = if value.is_empty() {
                "(none added yet)".to_string()
            } else {
                value.to_string()
            };
            vec![
                Line::from(vec![lead(depth, is_focused), label_span(field, is_focused)]),
                Line::from(vec![
                    Span::raw(indent(depth + 1)),
                    Span::styled(shown, Style::default().fg(Color::DarkGray)),
                ]),
            ]
        }
        FieldKind::TextArea => {
            let mut lines = vec![Line::from(vec![
                lead(depth, is_focused),
                label_span(field, is_focused),
            ])];
            let text = field.as_text();
            let mut body: Vec<Line<'static>> = text
                .split('\n')
                .map(|l| {
                    Line::from(vec![
                        Span::raw(format!("{}│ ", indent(depth + 1))),
                        Span::styled(l.to_string(), value_style),
                    ])
                })
                .collect();
            if is_focused {
                if let Some(last) = body.last_mut() {
                    last.spans
                        .push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
                }
            }
            lines.append(&mut body);
            lines
        }
        _ => {
            let value = field.display_value();
            let shown = if value.is_empty() && !is_focused {
                Span::styled("(empty)", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(value, value_style)
            };
            let mut spans = vec![
                lead(depth, is_focused),
                label_span(field, is_focused),
                Span::raw(": "),
                shown,
            ];
            if is_focused {
                spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
            }
            vec![Line::from(spans)]
        }
    };

    if let Some(error) = field.error.as_ref().filter(|e| e.visible) {
        lines.push(error_line(&error.text, depth + 1));
    }
    lines
}

pub fn error_line(text: &str, depth: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!("{}! {text}", indent(depth)),
        Style::default().fg(Color::Red),
    ))
}
