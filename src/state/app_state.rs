//! Application state definitions

use super::forms::{FocusTarget, FormSettings, Registration};
use std::collections::VecDeque;
use uuid::Uuid;

/// Everything the UI draws from
#[derive(Debug, Clone)]
pub struct AppState {
    pub registration: Registration,
    /// Index into the current section's focus targets
    pub focus_index: usize,
    /// Errors waiting to be shown one at a time in a dialog
    pub errors: VecDeque<String>,
    /// Transient message shown in the status bar until the next key press
    pub status_message: Option<String>,
    /// Id of the last stored submission
    pub submitted: Option<Uuid>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FormSettings::default())
    }
}

impl AppState {
    pub fn new(settings: FormSettings) -> Self {
        Self {
            registration: Registration::new(settings),
            focus_index: 0,
            errors: VecDeque::new(),
            status_message: None,
            submitted: None,
        }
    }

    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        self.registration.focus_targets()
    }

    /// The focused item, after clamping to what currently exists
    pub fn focused(&self) -> Option<FocusTarget> {
        let targets = self.focus_targets();
        let index = self.focus_index.min(targets.len().saturating_sub(1));
        targets.into_iter().nth(index)
    }

    /// Move focus to the next target, wrapping around
    pub fn next_focus(&mut self) {
        let count = self.focus_targets().len();
        if count > 0 {
            self.focus_index = (self.focus_index.min(count - 1) + 1) % count;
        }
    }

    /// Move focus to the previous target, wrapping around
    pub fn prev_focus(&mut self) {
        let count = self.focus_targets().len();
        if count > 0 {
            let current = self.focus_index.min(count - 1);
            self.focus_index = if current == 0 { count - 1 } else { current - 1 };
        }
    }

    /// Keep focus on `target` if it still exists, otherwise clamp the index
    pub fn refocus(&mut self, target: &FocusTarget) {
        let targets = self.focus_targets();
        match targets.iter().position(|t| t == target) {
            Some(index) => self.focus_index = index,
            None => self.focus_index = self.focus_index.min(targets.len().saturating_sub(1)),
        }
    }

    /// Focus the first invalid visible field of the current section
    pub fn focus_first_invalid(&mut self) {
        let section = self.registration.current_section();
        let targets = self.focus_targets();
        let first = targets.iter().position(|target| match target {
            FocusTarget::Field(name) => section.find_field(name).is_some_and(|f| f.invalid),
            _ => false,
        });
        self.focus_index = first.unwrap_or(0);
    }

    pub fn reset_focus(&mut self) {
        self.focus_index = 0;
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The error currently shown
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }
}
