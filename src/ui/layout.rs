//! Layout components (header, footer buttons, status bar)

use super::components::{render_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::{BACK_SHORTCUT, NEXT_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{FieldKind, FocusTarget};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Areas of the wizard screen, top to bottom
pub struct WizardLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub status: Rect,
}

/// Split the screen into header, section body, buttons and status bar
pub fn create_layout(area: Rect) -> WizardLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // Title and progress
            Constraint::Min(0),                // Section body
            Constraint::Length(BUTTON_HEIGHT), // Back / Next / Submit
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    WizardLayout {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
        status: chunks[3],
    }
}

/// Draw the title, section number and shared progress bar
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let registration = &app.state.registration;
    let section = registration.current_section();

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let mut title = vec![Span::styled(
        "Event registration",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(number) = section.number {
        title.push(Span::styled(
            format!("  Section {number}"),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), rows[0]);

    if section.has_progress {
        let progress = registration.progress();
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .ratio(progress.ratio().clamp(0.0, 1.0))
            .label(format!("{:.0}/{:.0}", progress.value, progress.max));
        frame.render_widget(gauge, rows[1]);
    }
}

/// Draw the navigation buttons for the current section
pub fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.state.focused();
    let targets = app.state.focus_targets();

    let mut buttons = Vec::new();
    if targets.contains(&FocusTarget::Back) {
        buttons.push((FocusTarget::Back, "Back", Color::Cyan));
    }
    if targets.contains(&FocusTarget::Next) {
        buttons.push((FocusTarget::Next, "Next", Color::Cyan));
    }
    if targets.contains(&FocusTarget::Submit) {
        buttons.push((FocusTarget::Submit, "Submit", Color::Green));
    }

    let mut constraints = vec![Constraint::Min(0)];
    constraints.extend(buttons.iter().map(|_| Constraint::Length(12)));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (target, label, accent)) in buttons.into_iter().enumerate() {
        let is_focused = focused.as_ref() == Some(&target);
        render_button(frame, chunks[i + 1], label, is_focused, accent);
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {}", get_focus_hints(app)),
        Style::default().fg(Color::Gray),
    )];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " Esc:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for whatever holds focus
pub fn get_focus_hints(app: &App) -> String {
    let section = app.state.registration.current_section();
    let kind = match app.state.focused() {
        Some(FocusTarget::Field(name)) => section.find_field(&name).map(|f| f.kind.clone()),
        Some(FocusTarget::Country(_)) => return "Space:expand/select  Tab:next".to_string(),
        Some(FocusTarget::CollectCountries) => return "Enter:add countries  Tab:next".to_string(),
        Some(FocusTarget::Back) => return format!("Enter:back  {BACK_SHORTCUT}:back"),
        Some(FocusTarget::Next) => return format!("Enter:next  {NEXT_SHORTCUT}:next"),
        Some(FocusTarget::Submit) => return format!("Enter:submit  {SUBMIT_SHORTCUT}:submit"),
        None => None,
    };
    let keys = match kind {
        Some(FieldKind::Checkbox { .. }) => "Space:toggle",
        Some(FieldKind::RadioGroup { .. }) => "←/→:choose",
        Some(FieldKind::Number { .. }) => "←/→:change",
        Some(FieldKind::TextArea) => "type  Enter:newline",
        _ => "type",
    };
    format!("{keys}  Tab:next  {NEXT_SHORTCUT}:next  {BACK_SHORTCUT}:back")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FormSettings, NUM_CHILDREN};
    use crate::submission::MockSubmissionSink;

    fn app() -> App {
        App::with_sink(FormSettings::default(), Box::new(MockSubmissionSink::new()))
    }

    #[test]
    fn test_layout_reserves_header_footer_and_status() {
        let layout = create_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 4);
        assert_eq!(layout.footer.height, BUTTON_HEIGHT);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.body.height, 24 - 4 - BUTTON_HEIGHT - 1);
    }

    #[test]
    fn test_hints_follow_field_kind() {
        let mut app = app();
        assert!(get_focus_hints(&app).starts_with("type"));
        app.state
            .refocus(&FocusTarget::Field(NUM_CHILDREN.to_string()));
        assert!(get_focus_hints(&app).starts_with("←/→:change"));
        app.state.refocus(&FocusTarget::Next);
        assert!(get_focus_hints(&app).starts_with("Enter:next"));
    }
}
