//! Form sections and section-level event handling

use super::country::CountryTree;
use super::dependents::toggle_dependent;
use super::field::{
    find_field, find_field_mut, hide_message, show_message, walk_fields, walk_fields_mut,
    ErrorMessage, FieldKind, FormField,
};
use super::template::PersonSubForm;
use super::validator::{
    error_message, is_valid_date_pair, is_valid_field, DATE_PAIR_ERROR_MESSAGE,
    SECTION_ERROR_MESSAGE,
};
use chrono::{DateTime, Utc};
use std::fmt;

pub const START_DATE: &str = "start-date";
pub const END_DATE: &str = "end-date";

/// The fixed pages of the registration form, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    AboutYou,
    /// Holds the inserted partner, child and friend sub-forms
    Companions,
    Trip,
    Extras,
    Review,
}

/// Position of a section among the numbered sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionNumber {
    pub position: usize,
    pub total: usize,
}

impl fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.total)
    }
}

/// Something in a section that can hold keyboard focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    Field(String),
    Country(usize),
    /// Copies the selected countries into the hidden country field
    CollectCountries,
    Back,
    Next,
    Submit,
}

/// Input routed to the current section, which dispatches on the target's kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionEvent {
    Toggle(String),
    Input(String, char),
    Backspace(String),
    Step(String, i32),
    Choose(String, i32),
    ToggleCountry(usize),
    CollectCountries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub fields: Vec<FormField>,
    pub persons: Vec<PersonSubForm>,
    pub countries: Option<CountryTree>,
    pub has_progress: bool,
    pub hidden: bool,
    pub number: Option<SectionNumber>,
    pub banner: Option<ErrorMessage>,
    pub date_pair_error: Option<ErrorMessage>,
}

impl Section {
    pub fn new(id: SectionId, title: &str, fields: Vec<FormField>) -> Self {
        Self {
            id,
            title: title.to_string(),
            fields,
            persons: Vec::new(),
            countries: None,
            has_progress: true,
            hidden: true,
            number: None,
            banner: None,
            date_pair_error: None,
        }
    }

    pub fn with_countries(mut self, countries: CountryTree) -> Self {
        self.countries = Some(countries);
        self
    }

    /// The companions section before anyone has been added
    pub fn is_empty_insert(&self) -> bool {
        self.id == SectionId::Companions && self.persons.is_empty()
    }

    /// Whether navigation may land on this section
    pub fn is_navigable(&self) -> bool {
        self.has_progress && !self.is_empty_insert()
    }

    pub fn find_field(&self, name: &str) -> Option<&FormField> {
        find_field(&self.fields, name).or_else(|| {
            self.persons
                .iter()
                .find_map(|person| find_field(&person.fields, name))
        })
    }

    pub fn find_field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        if find_field(&self.fields, name).is_some() {
            return find_field_mut(&mut self.fields, name);
        }
        self.persons
            .iter_mut()
            .find_map(|person| find_field_mut(&mut person.fields, name))
    }

    /// Visit own fields and then every companion's fields
    pub fn walk(&self, visit: &mut impl FnMut(&FormField, bool)) {
        walk_fields(&self.fields, &mut |field, visible| visit(field, visible));
        for person in &self.persons {
            walk_fields(&person.fields, &mut |field, visible| visit(field, visible));
        }
    }

    fn walk_mut(&mut self, visit: &mut impl FnMut(&mut FormField, bool)) {
        walk_fields_mut(&mut self.fields, visit);
        for person in &mut self.persons {
            walk_fields_mut(&mut person.fields, visit);
        }
    }

    /// Number of invalid fields outside hidden blocks
    pub fn visible_invalid_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |field, visible| {
            if visible && field.invalid {
                count += 1;
            }
        });
        count
    }

    /// Validate every required field and refresh the error markers.
    ///
    /// Fields inside hidden blocks are still marked but never block. Returns
    /// whether the section may be left.
    pub fn validate(&mut self, now: DateTime<Utc>) -> bool {
        self.walk_mut(&mut |field, _| {
            if !field.required {
                return;
            }
            if is_valid_field(field, now) {
                field.invalid = false;
                field.hide_error();
            } else {
                field.invalid = true;
                field.show_error(error_message(&field.kind));
            }
        });

        self.validate_date_pair();

        let valid = self.visible_invalid_count() == 0;
        if valid {
            hide_message(&mut self.banner);
        } else {
            show_message(&mut self.banner, SECTION_ERROR_MESSAGE);
        }
        valid
    }

    fn validate_date_pair(&mut self) {
        let (Some(start), Some(end)) = (
            find_field(&self.fields, START_DATE),
            find_field(&self.fields, END_DATE),
        ) else {
            return;
        };
        let (start, end) = (start.as_text(), end.as_text());
        if start.is_empty() || end.is_empty() {
            hide_message(&mut self.date_pair_error);
            return;
        }

        if is_valid_date_pair(start, end) {
            hide_message(&mut self.date_pair_error);
        } else {
            if let Some(field) = find_field_mut(&mut self.fields, START_DATE) {
                field.invalid = true;
            }
            show_message(&mut self.date_pair_error, DATE_PAIR_ERROR_MESSAGE);
        }
    }

    /// Handle an input event delegated to this section.
    ///
    /// Returns false when the event has no matching target.
    pub fn handle_event(&mut self, event: SectionEvent, max_friends: u32) -> bool {
        match event {
            SectionEvent::Toggle(name) => {
                let Some(field) = self.find_field_mut(&name) else {
                    return false;
                };
                match field.kind {
                    FieldKind::Checkbox { .. } => {
                        let checked = field.is_checked();
                        field.set_checked(!checked);
                        toggle_dependent(field, max_friends);
                        true
                    }
                    FieldKind::RadioGroup { .. } => {
                        field.cycle_choice(1);
                        true
                    }
                    _ => false,
                }
            }
            SectionEvent::Input(name, c) => self.edit(&name, |field| {
                if field.accepts_text() {
                    field.push_char(c);
                }
            }),
            SectionEvent::Backspace(name) => self.edit(&name, |field| {
                if field.accepts_text() {
                    field.pop_char();
                }
            }),
            SectionEvent::Step(name, delta) => self.edit(&name, |field| field.step(delta)),
            SectionEvent::Choose(name, delta) => {
                self.edit(&name, |field| field.cycle_choice(delta))
            }
            SectionEvent::ToggleCountry(index) => match &mut self.countries {
                Some(countries) => {
                    countries.toggle(index);
                    true
                }
                None => false,
            },
            SectionEvent::CollectCountries => self.collect_countries(),
        }
    }

    fn edit(&mut self, name: &str, apply: impl FnOnce(&mut FormField)) -> bool {
        match self.find_field_mut(name) {
            Some(field) => {
                apply(field);
                true
            }
            None => false,
        }
    }

    /// Write the serialized country selection into the hidden country field
    fn collect_countries(&mut self) -> bool {
        let Some(serialized) = self.countries.as_ref().map(CountryTree::serialize) else {
            return false;
        };
        let mut collected = false;
        walk_fields_mut(&mut self.fields, &mut |field, _| {
            if field.kind == FieldKind::CountryList {
                field.set_text(serialized.clone());
                collected = true;
            }
        });
        collected
    }

    /// Focusable items of the section body, in display order
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets = Vec::new();
        let countries = self.countries.as_ref();
        self.walk(&mut |field, visible| {
            if !visible {
                return;
            }
            if field.kind == FieldKind::CountryList {
                if let Some(tree) = countries {
                    targets.extend(tree.visible_nodes().into_iter().map(FocusTarget::Country));
                    targets.push(FocusTarget::CollectCountries);
                }
            } else {
                targets.push(FocusTarget::Field(field.name.clone()));
            }
        });
        targets
    }
}
