//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = layout::create_layout(frame.area());

    layout::draw_header(frame, layout.header, app);
    forms::draw_section(frame, layout.body, &app.state);
    layout::draw_footer(frame, layout.footer, app);
    layout::draw_status_bar(frame, layout.status, app);

    // Errors are modal and drawn over everything else
    if let Some(error) = app.state.current_error() {
        components::render_error_dialog(frame, error, app.state.errors.len() - 1);
    }
}
