//! Application state and core logic

use crate::config::TuiConfig;
use crate::error::RegistrationError;
use crate::state::{Advance, AppState, FieldKind, FocusTarget, FormSettings, SectionEvent};
use crate::submission::{JsonFileSink, Submission, SubmissionSink};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Destination for completed registrations
    sink: Box<dyn SubmissionSink>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App that stores submissions where the config says
    pub fn new(config: &TuiConfig) -> Self {
        let sink = JsonFileSink::new(config.submissions_dir());
        info!(dir = %sink.dir().display(), "storing submissions");
        Self::with_sink(config.form_settings(), Box::new(sink))
    }

    pub fn with_sink(settings: FormSettings, sink: Box<dyn SubmissionSink>) -> Self {
        Self {
            state: AppState::new(settings),
            sink,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        let shortcut = key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(crate::platform::NAV_MODIFIER);
        match key.code {
            KeyCode::Esc => {
                self.quit = true;
                return Ok(());
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                return Ok(());
            }
            KeyCode::Char('n') if shortcut => {
                self.next_section();
                return Ok(());
            }
            KeyCode::Char('b') if shortcut => {
                self.previous_section();
                return Ok(());
            }
            KeyCode::Char('s') if shortcut => {
                self.submit().await;
                return Ok(());
            }
            KeyCode::Tab | KeyCode::Down => {
                self.state.next_focus();
                return Ok(());
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.state.prev_focus();
                return Ok(());
            }
            _ => {}
        }

        let Some(target) = self.state.focused() else {
            return Ok(());
        };
        match &target {
            FocusTarget::Field(name) => self.handle_field_key(name, key),
            FocusTarget::Country(index) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.state
                        .registration
                        .handle_event(SectionEvent::ToggleCountry(*index));
                }
            }
            FocusTarget::CollectCountries => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.collect_countries();
                }
            }
            FocusTarget::Back if key.code == KeyCode::Enter => self.previous_section(),
            FocusTarget::Next if key.code == KeyCode::Enter => self.next_section(),
            FocusTarget::Submit if key.code == KeyCode::Enter => self.submit().await,
            _ => {}
        }
        Ok(())
    }

    /// Translate a key into an event for the focused field, based on its kind
    fn handle_field_key(&mut self, name: &str, key: KeyEvent) {
        let Some(field) = self.state.registration.current_section().find_field(name) else {
            return;
        };
        let (kind, accepts_text) = (field.kind.clone(), field.accepts_text());
        let event = match (&kind, key.code) {
            (FieldKind::Checkbox { .. }, KeyCode::Char(' ') | KeyCode::Enter) => {
                Some(SectionEvent::Toggle(name.to_string()))
            }
            (FieldKind::RadioGroup { .. }, KeyCode::Char(' ') | KeyCode::Right) => {
                Some(SectionEvent::Choose(name.to_string(), 1))
            }
            (FieldKind::RadioGroup { .. }, KeyCode::Left) => {
                Some(SectionEvent::Choose(name.to_string(), -1))
            }
            (FieldKind::Number { .. }, KeyCode::Right | KeyCode::Char('+')) => {
                Some(SectionEvent::Step(name.to_string(), 1))
            }
            (FieldKind::Number { .. }, KeyCode::Left | KeyCode::Char('-')) => {
                Some(SectionEvent::Step(name.to_string(), -1))
            }
            // Enter in a text area adds a newline
            (FieldKind::TextArea, KeyCode::Enter) => {
                Some(SectionEvent::Input(name.to_string(), '\n'))
            }
            (_, KeyCode::Char(c)) if accepts_text => {
                Some(SectionEvent::Input(name.to_string(), c))
            }
            (_, KeyCode::Backspace) if accepts_text => {
                Some(SectionEvent::Backspace(name.to_string()))
            }
            (_, KeyCode::Enter) if accepts_text => {
                self.state.next_focus();
                None
            }
            _ => None,
        };

        if let Some(event) = event {
            let target = FocusTarget::Field(name.to_string());
            self.state.registration.handle_event(event);
            // Revealed or hidden dependents shift the focus list
            self.state.refocus(&target);
        }
    }

    fn collect_countries(&mut self) {
        let registration = &mut self.state.registration;
        if registration.handle_event(SectionEvent::CollectCountries) {
            let count = registration
                .current_section()
                .countries
                .as_ref()
                .map(|tree| tree.selected().count())
                .unwrap_or(0);
            self.state.status_message = Some(format!("{count} country(s) added"));
        }
    }

    /// Validate the current section and move forward if it passes
    fn next_section(&mut self) {
        match self.state.registration.advance(Utc::now()) {
            Advance::Moved { to, .. } => {
                self.state.reset_focus();
                let number = self
                    .state
                    .registration
                    .section(to)
                    .and_then(|section| section.number.map(|n| n.to_string()))
                    .unwrap_or_default();
                self.state.status_message = Some(format!("Section {number}"));
            }
            Advance::Blocked { invalid } => {
                self.state.focus_first_invalid();
                self.state.status_message = Some(format!("{invalid} field(s) need attention"));
            }
            Advance::Finished => {
                self.state.status_message = Some(format!(
                    "This is the last section. Press {} to submit",
                    crate::platform::SUBMIT_SHORTCUT
                ));
            }
        }
    }

    fn previous_section(&mut self) {
        if self.state.registration.retreat().is_some() {
            self.state.reset_focus();
        }
    }

    /// Flatten the form and hand it to the sink
    async fn submit(&mut self) {
        if let Some(id) = self.state.submitted {
            self.state.status_message = Some(format!("Already submitted ({id})"));
            return;
        }
        if !self.state.registration.is_ready_to_submit() {
            self.push_error(RegistrationError::NotReadyToSubmit.to_string());
            return;
        }
        let fields = match self.state.registration.payload() {
            Ok(fields) => fields,
            Err(e) => {
                warn!(error = %e, "registration payload rejected");
                self.push_error(format!("Failed to submit registration: {e}"));
                return;
            }
        };

        let submission = Submission::new(fields);
        match self.sink.submit(&submission).await {
            Ok(location) => {
                info!(
                    id = %submission.id,
                    fields = submission.fields.len(),
                    "registration submitted"
                );
                self.state.submitted = Some(submission.id);
                self.state.status_message = Some(format!("Registration saved to {location}"));
            }
            Err(e) => {
                warn!(error = %e, "submission failed");
                self.push_error(format!("Failed to submit registration: {e}"));
            }
        }
    }
}
