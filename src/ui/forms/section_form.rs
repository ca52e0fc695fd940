//! The body of the current section

use super::country_tree::country_lines;
use super::field_renderer::{error_line, field_lines, focus_style, indent, FOCUS_MARKER};
use crate::state::{
    AppState, FieldKind, FocusTarget, FormField, Section, SectionId, END_DATE,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Collected lines plus the line holding focus, used to scroll
#[derive(Default)]
struct Body {
    lines: Vec<Line<'static>>,
    focused_line: Option<usize>,
}

impl Body {
    fn push(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    fn push_focusable(&mut self, mut lines: Vec<Line<'static>>, is_focused: bool) {
        if is_focused {
            self.focused_line = Some(self.lines.len());
        }
        self.lines.append(&mut lines);
    }
}

pub fn draw_section(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = state.registration.current_section();
    let focused = state.focused();
    let body = section_body(state, section, focused.as_ref());

    let block = Block::default()
        .title(format!(" {} ", section.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner_height = block.inner(area).height as usize;

    // Keep the focused line a couple of rows above the bottom edge
    let scroll = body
        .focused_line
        .map(|line| (line + 3).saturating_sub(inner_height))
        .unwrap_or(0);

    let paragraph = Paragraph::new(body.lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn section_body(state: &AppState, section: &Section, focused: Option<&FocusTarget>) -> Body {
    let mut body = Body::default();

    if let Some(banner) = section.banner.as_ref().filter(|b| b.visible) {
        body.push(Line::from(Span::styled(
            format!(" {} ", banner.text),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )));
        body.push(Line::from(""));
    }

    push_fields(&mut body, section, &section.fields, 0, focused);

    for person in &section.persons {
        body.push(Line::from(""));
        body.push(Line::from(Span::styled(
            person.heading.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        push_fields(&mut body, section, &person.fields, 0, focused);
    }

    if section.id == SectionId::Review {
        push_review(&mut body, state);
    }
    body
}

fn push_fields(
    body: &mut Body,
    section: &Section,
    fields: &[FormField],
    depth: usize,
    focused: Option<&FocusTarget>,
) {
    for field in fields {
        let is_focused = matches!(focused, Some(FocusTarget::Field(name)) if *name == field.name);
        body.push_focusable(field_lines(field, depth, is_focused), is_focused);

        if field.kind == FieldKind::CountryList {
            push_countries(body, section, depth, focused);
        }
        if field.name == END_DATE {
            if let Some(error) = section.date_pair_error.as_ref().filter(|e| e.visible) {
                body.push(error_line(&error.text, depth + 1));
            }
        }

        push_fields(body, section, field.visible_dependents(), depth + 1, focused);
    }
}

fn push_countries(
    body: &mut Body,
    section: &Section,
    depth: usize,
    focused: Option<&FocusTarget>,
) {
    let Some(tree) = &section.countries else {
        return;
    };
    let focused_node = match focused {
        Some(FocusTarget::Country(index)) => Some(*index),
        _ => None,
    };
    for (index, line) in country_lines(tree, depth + 1, focused_node) {
        body.push_focusable(vec![line], focused_node == Some(index));
    }

    let is_focused = focused == Some(&FocusTarget::CollectCountries);
    let lead = if is_focused {
        format!("{}{FOCUS_MARKER}", " ".repeat(indent(depth + 1).len() - 2))
    } else {
        indent(depth + 1)
    };
    body.push_focusable(
        vec![Line::from(vec![
            Span::raw(lead),
            Span::styled("[ Add selected countries ]", focus_style(is_focused)),
        ])],
        is_focused,
    );
}

/// Everything that would be submitted, for a last look
fn push_review(body: &mut Body, state: &AppState) {
    match state.registration.payload() {
        Ok(fields) => {
            body.push(Line::from(Span::styled(
                "Please check your answers before submitting.",
                Style::default().fg(Color::DarkGray),
            )));
            body.push(Line::from(""));
            for (name, value) in fields {
                body.push(Line::from(vec![
                    Span::styled(format!("  {name}: "), Style::default().fg(Color::Gray)),
                    Span::raw(value.replace('\n', " ")),
                ]));
            }
        }
        Err(e) => body.push(error_line(&e.to_string(), 0)),
    }
    if let Some(id) = state.submitted {
        body.push(Line::from(""));
        body.push(Line::from(Span::styled(
            format!("Submitted as {id}"),
            Style::default().fg(Color::Green),
        )));
    }
}
