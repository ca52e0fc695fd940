//! Base dialog component

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Configuration for rendering a dialog
pub struct DialogConfig<'a> {
    pub title: &'a str,
    /// Colour of the title and border
    pub accent: Color,
    /// Message content (can be multi-line with \n)
    pub message: &'a str,
    /// Hint shown at the bottom (e.g., "Press Enter to dismiss")
    pub hint: Option<Line<'a>>,
    pub max_width: u16,
}

/// Rows the message needs when word-wrapped to `width` columns
pub fn wrapped_height(message: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = message.split('\n').map(|line| word_rows(line, width)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Greedy word wrap; words wider than a row are broken across rows
fn word_rows(line: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut used = 0;
    for word in line.split_whitespace() {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= width {
            used = needed;
            continue;
        }
        if used > 0 {
            rows += 1;
        }
        rows += (len - 1) / width;
        used = (len - 1) % width + 1;
    }
    rows
}

/// A `width` x `height` rectangle centred in `area`, clipped to it
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render a centered dialog overlay
pub fn render_dialog(frame: &mut Frame, config: DialogConfig) {
    // Borders plus one column of padding on each side
    const CHROME: u16 = 4;

    let longest = config
        .message
        .split('\n')
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(config.title.chars().count()) as u16;
    let width = (longest + CHROME).min(config.max_width).max(20);
    let text_width = width - CHROME;

    let hint_rows = if config.hint.is_some() { 2 } else { 0 };
    let height = wrapped_height(config.message, text_width) + hint_rows + 4;
    let area = centered_rect(frame.area(), width, height);

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(config.message.split('\n').map(Line::from));
    if let Some(hint) = config.hint {
        lines.push(Line::from(""));
        lines.push(hint);
    }

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", config.title),
            Style::default()
                .fg(config.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(config.accent))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black)),
        area,
    );
}
