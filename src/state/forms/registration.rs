//! The registration wizard: section navigation, companion reconciliation and
//! the flattened submission payload.
//!
//! `Registration` is the single source of truth for the form. The terminal UI
//! only ever renders it.

use super::catalog::{sections, NUM_CHILDREN, WITH_FRIENDS, WITH_PARTNER};
use super::dependents::{friend_count_name, MAX_FRIENDS};
use super::field::{FieldKind, FieldValue, FormField};
use super::section::{FocusTarget, Section, SectionEvent, SectionId, SectionNumber};
use super::template::{instantiate, PersonKind, PersonSubForm};
use crate::error::RegistrationError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Limits that shape the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    pub progress_max: u32,
    pub max_children: u32,
    pub max_friends: u32,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            progress_max: 100,
            max_children: 10,
            max_friends: MAX_FRIENDS,
        }
    }
}

/// How many companions of each kind the user declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersonCounts {
    pub partner: bool,
    pub children: u32,
    pub friends: u32,
}

impl PersonCounts {
    /// Friends only count while the friends checkbox is checked
    pub fn from_controls(partner: bool, children: u32, with_friends: bool, friends: u32) -> Self {
        Self {
            partner,
            children,
            friends: if with_friends { friends } else { 0 },
        }
    }

    pub fn for_kind(&self, kind: PersonKind) -> u32 {
        match kind {
            PersonKind::Partner => u32::from(self.partner),
            PersonKind::Child => self.children,
            PersonKind::Friend => self.friends,
        }
    }
}

/// Progress shared by every section's progress display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub value: f64,
    pub max: f64,
}

impl Progress {
    fn new(max: u32) -> Self {
        Self {
            value: 0.0,
            max: f64::from(max.max(1)),
        }
    }

    /// Raise progress to `fraction` of the maximum; never lowers it
    pub fn apply(&mut self, fraction: f64) {
        self.value = self.value.max(fraction.clamp(0.0, 1.0) * self.max);
    }

    pub fn ratio(&self) -> f64 {
        self.value / self.max
    }
}

/// Outcome of trying to move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { from: SectionId, to: SectionId },
    /// The current section has this many visible invalid fields
    Blocked { invalid: usize },
    /// There is no later section
    Finished,
}

#[derive(Debug, Clone)]
pub struct Registration {
    sections: Vec<Section>,
    current: usize,
    progress: Progress,
    settings: FormSettings,
}

impl Registration {
    pub fn new(settings: FormSettings) -> Self {
        let mut sections = sections(settings.max_children);
        if let Some(first) = sections.first_mut() {
            first.hidden = false;
        }
        let mut registration = Self {
            sections,
            current: 0,
            progress: Progress::new(settings.progress_max),
            settings,
        };
        registration.renumber();
        registration.update_progress();
        registration
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn current_section(&self) -> &Section {
        &self.sections[self.current]
    }

    pub fn current_id(&self) -> SectionId {
        self.current_section().id
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Whether the current section is the last one and may be submitted
    pub fn is_ready_to_submit(&self) -> bool {
        self.current_id() == SectionId::Review
    }

    /// Route an input event to the current section
    pub fn handle_event(&mut self, event: SectionEvent) -> bool {
        let max_friends = self.settings.max_friends;
        self.sections[self.current].handle_event(event, max_friends)
    }

    /// Validate the current section and, if it passes, show the next one.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Advance {
        let from = self.current;
        if !self.sections[from].validate(now) {
            let invalid = self.sections[from].visible_invalid_count();
            warn!(section = ?self.sections[from].id, invalid, "section has invalid fields");
            return Advance::Blocked { invalid };
        }

        if self.sections[from].id == SectionId::AboutYou {
            let desired = self.counts_from_controls();
            self.reconcile_counts(desired);
        }

        let Some(to) = (from + 1..self.sections.len()).find(|&i| self.sections[i].is_navigable())
        else {
            self.renumber();
            return Advance::Finished;
        };

        self.sections[from].hidden = true;
        self.sections[to].hidden = false;
        self.current = to;
        self.renumber();
        self.update_progress();

        let (from, to) = (self.sections[from].id, self.sections[to].id);
        debug!(?from, ?to, progress = self.progress.value, "advanced");
        Advance::Moved { from, to }
    }

    /// Show the previous section without validating the current one.
    ///
    /// Returns the section now shown, or `None` when already at the start.
    pub fn retreat(&mut self) -> Option<SectionId> {
        let from = self.current;
        let to = (0..from).rev().find(|&i| self.sections[i].is_navigable())?;
        self.sections[from].hidden = true;
        self.sections[to].hidden = false;
        self.current = to;
        self.renumber();
        debug!(from = ?self.sections[from].id, to = ?self.sections[to].id, "retreated");
        Some(self.sections[to].id)
    }

    /// Whether a previous section exists to go back to
    pub fn can_retreat(&self) -> bool {
        (0..self.current).any(|i| self.sections[i].is_navigable())
    }

    /// Read the declared companion counts from the first section's controls
    pub fn counts_from_controls(&self) -> PersonCounts {
        let Some(about) = self.section(SectionId::AboutYou) else {
            return PersonCounts::default();
        };
        let checked = |name: &str| about.find_field(name).is_some_and(FormField::is_checked);
        let friends = about
            .find_field(&friend_count_name(WITH_FRIENDS))
            .map(FormField::as_number)
            .unwrap_or(1);
        PersonCounts::from_controls(
            checked(WITH_PARTNER),
            about
                .find_field(NUM_CHILDREN)
                .map(FormField::as_number)
                .unwrap_or(0),
            checked(WITH_FRIENDS),
            friends,
        )
    }

    /// The personal-info fields of the first section, as they are right now
    fn person_template(&self) -> Vec<FormField> {
        self.section(SectionId::AboutYou)
            .map(|s| s.fields.iter().filter(|f| f.template).cloned().collect())
            .unwrap_or_default()
    }

    /// Add or remove companion sub-forms until each kind matches `desired`.
    ///
    /// New sub-forms go after existing ones; removal always takes the last
    /// sub-form of that kind.
    pub fn reconcile_counts(&mut self, desired: PersonCounts) {
        let template = self.person_template();
        if let Some(companions) = self.section_mut(SectionId::Companions) {
            for kind in [PersonKind::Partner, PersonKind::Child, PersonKind::Friend] {
                reconcile_kind(
                    &mut companions.persons,
                    &template,
                    kind,
                    desired.for_kind(kind),
                );
            }
        }
    }

    /// Recompute `n/total` for every section.
    ///
    /// The companions section only counts once it holds a sub-form.
    pub fn renumber(&mut self) {
        let total = self.sections.iter().filter(|s| s.is_navigable()).count();
        let mut position = 0;
        for section in &mut self.sections {
            if section.is_navigable() {
                position += 1;
                section.number = Some(SectionNumber { position, total });
            } else {
                section.number = None;
            }
        }
    }

    fn update_progress(&mut self) {
        if let Some(number) = self.sections[self.current].number {
            self.progress
                .apply(number.position as f64 / number.total as f64);
        }
    }

    /// Focusable items of the current section including its buttons
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets = self.current_section().focus_targets();
        if self.can_retreat() {
            targets.push(FocusTarget::Back);
        }
        if self.is_ready_to_submit() {
            targets.push(FocusTarget::Submit);
        } else {
            targets.push(FocusTarget::Next);
        }
        targets
    }

    /// Flatten the form into uniquely named key/value pairs.
    ///
    /// Unchecked checkboxes, unanswered radio groups and fields inside hidden
    /// blocks are left out.
    pub fn payload(&self) -> Result<BTreeMap<String, String>, RegistrationError> {
        let mut payload = BTreeMap::new();
        let mut duplicate = None;
        for section in &self.sections {
            section.walk(&mut |field, visible| {
                if !visible || duplicate.is_some() {
                    return;
                }
                let Some(value) = submitted_value(field) else {
                    return;
                };
                if payload.insert(field.name.clone(), value).is_some() {
                    duplicate = Some(field.name.clone());
                }
            });
        }
        match duplicate {
            Some(name) => Err(RegistrationError::DuplicateField(name)),
            None => Ok(payload),
        }
    }
}

fn reconcile_kind(
    persons: &mut Vec<PersonSubForm>,
    template: &[FormField],
    kind: PersonKind,
    desired: u32,
) {
    let mut existing = persons.iter().filter(|p| p.kind == kind).count() as u32;
    if existing != desired {
        info!(kind = kind.label(), existing, desired, "reconciling companions");
    }
    while existing < desired {
        let person = instantiate(template, kind, existing + 1);
        debug!(namespace = %person.namespace, "companion added");
        persons.push(person);
        existing += 1;
    }
    while existing > desired {
        if let Some(last) = persons.iter().rposition(|p| p.kind == kind) {
            let removed = persons.remove(last);
            debug!(namespace = %removed.namespace, ordinal = removed.ordinal, "companion removed");
        }
        existing -= 1;
    }
}

fn submitted_value(field: &FormField) -> Option<String> {
    match (&field.kind, &field.value) {
        (FieldKind::Checkbox { .. }, FieldValue::Checked(checked)) => {
            checked.then(|| "on".to_string())
        }
        (FieldKind::RadioGroup { .. }, _) => field.selected_option().map(str::to_string),
        (_, FieldValue::Number(n)) => Some(n.to_string()),
        (_, FieldValue::Text(text)) => Some(text.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::catalog::COUNTRY_SELECTIONS;
    use crate::state::forms::field::walk_fields;
    use crate::state::forms::section::{END_DATE, START_DATE};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    impl Registration {
        /// Every field name currently in the form, visible or not
        fn field_names(&self) -> Vec<String> {
            let mut names = Vec::new();
            for section in &self.sections {
                walk_fields(&section.fields, &mut |field, _| names.push(field.name.clone()));
                for person in &section.persons {
                    walk_fields(&person.fields, &mut |field, _| names.push(field.name.clone()));
                }
            }
            names
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn set_text(reg: &mut Registration, name: &str, value: &str) {
        for c in value.chars() {
            assert!(
                reg.handle_event(SectionEvent::Input(name.to_string(), c)),
                "no field {name}"
            );
        }
    }

    fn toggle(reg: &mut Registration, name: &str) {
        assert!(reg.handle_event(SectionEvent::Toggle(name.to_string())));
    }

    fn fill_about_you(reg: &mut Registration) {
        set_text(reg, "first-name", "Robin");
        set_text(reg, "last-name", "O'Hara");
        set_text(reg, "email", "robin@example.com");
        set_text(reg, "contact-number", "0412345678");
        toggle(reg, "gender");
        set_text(reg, "birth-date", "1988-02-29");
    }

    fn fill_person(reg: &mut Registration, prefix: &str, adult: bool) {
        set_text(reg, &format!("{prefix}-first-name"), "Sam");
        set_text(reg, &format!("{prefix}-last-name"), "Lee");
        set_text(reg, &format!("{prefix}-birth-date"), "2015-06-01");
        if adult {
            set_text(reg, &format!("{prefix}-email"), "sam@example.com");
            set_text(reg, &format!("{prefix}-contact-number"), "91234567");
            toggle(reg, &format!("{prefix}-gender"));
        }
    }

    fn fill_trip(reg: &mut Registration) {
        set_text(reg, START_DATE, "2025-03-01");
        set_text(reg, END_DATE, "2025-03-04");
        let trip = reg.current_section();
        let japan = trip
            .countries
            .as_ref()
            .and_then(|t| t.nodes().iter().position(|n| n.label == "Japan"))
            .expect("japan in tree");
        assert!(reg.handle_event(SectionEvent::ToggleCountry(japan)));
        assert!(reg.handle_event(SectionEvent::CollectCountries));
    }

    fn fill_extras(reg: &mut Registration) {
        toggle(reg, "accommodation");
    }

    fn visible_sections(reg: &Registration) -> Vec<SectionId> {
        reg.sections
            .iter()
            .filter(|s| !s.hidden)
            .map(|s| s.id)
            .collect()
    }

    fn number_of(reg: &Registration, id: SectionId) -> Option<SectionNumber> {
        reg.section(id).and_then(|s| s.number)
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_starts_on_first_section() {
            let reg = Registration::new(FormSettings::default());
            assert_eq!(reg.current_id(), SectionId::AboutYou);
            assert_eq!(visible_sections(&reg), vec![SectionId::AboutYou]);
            assert!(!reg.can_retreat());
            assert_eq!(reg.progress().value, 25.0);
        }

        #[test]
        fn test_full_flow_without_companions() {
            let mut reg = Registration::new(FormSettings::default());
            let mut last_progress = reg.progress().value;

            fill_about_you(&mut reg);
            assert_eq!(
                reg.advance(now()),
                Advance::Moved {
                    from: SectionId::AboutYou,
                    to: SectionId::Trip
                }
            );
            assert_eq!(visible_sections(&reg), vec![SectionId::Trip]);
            assert!(reg.progress().value >= last_progress);
            last_progress = reg.progress().value;

            fill_trip(&mut reg);
            assert!(matches!(reg.advance(now()), Advance::Moved { .. }));
            assert_eq!(visible_sections(&reg), vec![SectionId::Extras]);
            assert!(reg.progress().value >= last_progress);

            fill_extras(&mut reg);
            assert!(matches!(reg.advance(now()), Advance::Moved { .. }));
            assert_eq!(visible_sections(&reg), vec![SectionId::Review]);
            assert!(reg.is_ready_to_submit());
            assert_eq!(reg.progress().value, 100.0);

            assert_eq!(reg.advance(now()), Advance::Finished);
            assert_eq!(visible_sections(&reg), vec![SectionId::Review]);
        }

        #[test]
        fn test_invalid_section_blocks_and_stays_visible() {
            let mut reg = Registration::new(FormSettings::default());
            set_text(&mut reg, "first-name", "R2");
            let outcome = reg.advance(now());
            assert_eq!(outcome, Advance::Blocked { invalid: 6 });
            assert_eq!(visible_sections(&reg), vec![SectionId::AboutYou]);

            let messages = |reg: &Registration| {
                let mut count = 0;
                reg.current_section().walk(&mut |f, _| {
                    if f.error_visible() {
                        count += 1;
                    }
                });
                count
            };
            assert_eq!(messages(&reg), 6);
            reg.advance(now());
            assert_eq!(messages(&reg), 6);
            assert!(reg
                .current_section()
                .banner
                .as_ref()
                .is_some_and(|b| b.visible));
        }

        #[test]
        fn test_retreat_skips_empty_companions() {
            let mut reg = Registration::new(FormSettings::default());
            fill_about_you(&mut reg);
            reg.advance(now());
            let progress = reg.progress().value;
            assert_eq!(reg.retreat(), Some(SectionId::AboutYou));
            assert_eq!(visible_sections(&reg), vec![SectionId::AboutYou]);
            assert_eq!(reg.progress().value, progress);
            assert_eq!(reg.retreat(), None);
        }

        #[test]
        fn test_partner_inserts_companions_section() {
            let mut reg = Registration::new(FormSettings::default());
            fill_about_you(&mut reg);
            toggle(&mut reg, WITH_PARTNER);
            assert_eq!(
                reg.advance(now()),
                Advance::Moved {
                    from: SectionId::AboutYou,
                    to: SectionId::Companions
                }
            );
            let companions = reg.current_section();
            assert_eq!(companions.persons.len(), 1);
            assert_eq!(companions.persons[0].heading, "About your partner");

            fill_person(&mut reg, "partner", true);
            assert_eq!(
                reg.advance(now()),
                Advance::Moved {
                    from: SectionId::Companions,
                    to: SectionId::Trip
                }
            );
            assert_eq!(reg.retreat(), Some(SectionId::Companions));
        }

        #[test]
        fn test_companions_validate_their_own_fields() {
            let mut reg = Registration::new(FormSettings::default());
            fill_about_you(&mut reg);
            reg.handle_event(SectionEvent::Step(NUM_CHILDREN.into(), 1));
            reg.advance(now());
            assert_eq!(
                reg.advance(now()),
                Advance::Blocked { invalid: 3 },
                "child needs first, last name and birth date"
            );
            fill_person(&mut reg, "child-1", false);
            assert!(matches!(reg.advance(now()), Advance::Moved { .. }));
        }
    }

    mod numbering {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_companions_excluded_until_someone_is_added() {
            let mut reg = Registration::new(FormSettings::default());
            assert_eq!(number_of(&reg, SectionId::Companions), None);
            assert_eq!(
                number_of(&reg, SectionId::Trip),
                Some(SectionNumber {
                    position: 2,
                    total: 4
                })
            );

            fill_about_you(&mut reg);
            toggle(&mut reg, WITH_FRIENDS);
            reg.advance(now());

            assert_eq!(
                number_of(&reg, SectionId::Companions),
                Some(SectionNumber {
                    position: 2,
                    total: 5
                })
            );
            assert_eq!(
                number_of(&reg, SectionId::Review),
                Some(SectionNumber {
                    position: 5,
                    total: 5
                })
            );
        }

        #[test]
        fn test_removing_companions_shrinks_total() {
            let mut reg = Registration::new(FormSettings::default());
            reg.reconcile_counts(PersonCounts::from_controls(true, 0, false, 0));
            reg.renumber();
            assert_eq!(number_of(&reg, SectionId::AboutYou).map(|n| n.total), Some(5));
            reg.reconcile_counts(PersonCounts::default());
            reg.renumber();
            assert_eq!(number_of(&reg, SectionId::AboutYou).map(|n| n.total), Some(4));
        }
    }

    mod reconciliation {
        use super::*;
        use pretty_assertions::assert_eq;

        fn kinds(reg: &Registration) -> Vec<String> {
            reg.section(SectionId::Companions)
                .map(|s| s.persons.iter().map(|p| p.namespace.clone()).collect())
                .unwrap_or_default()
        }

        #[test]
        fn test_children_three_then_one_keeps_first() {
            let mut reg = Registration::new(FormSettings::default());
            reg.reconcile_counts(PersonCounts::from_controls(false, 3, false, 0));
            assert_eq!(kinds(&reg), vec!["child-1", "child-2", "child-3"]);

            reg.reconcile_counts(PersonCounts::from_controls(false, 1, false, 0));
            assert_eq!(kinds(&reg), vec!["child-1"]);
            let child = &reg.section(SectionId::Companions).expect("companions").persons[0];
            assert!(child.fields.iter().all(|f| f.name.starts_with("child-1-")));
        }

        #[test]
        fn test_removal_takes_last_of_kind_by_position() {
            let mut reg = Registration::new(FormSettings::default());
            reg.reconcile_counts(PersonCounts::from_controls(false, 1, true, 1));
            reg.reconcile_counts(PersonCounts::from_controls(true, 2, true, 1));
            assert_eq!(kinds(&reg), vec!["child-1", "friend-1", "partner", "child-2"]);

            reg.reconcile_counts(PersonCounts::from_controls(true, 1, true, 1));
            assert_eq!(kinds(&reg), vec!["child-1", "friend-1", "partner"]);
        }

        #[test]
        fn test_unchecked_friends_removes_all_friends() {
            let mut reg = Registration::new(FormSettings::default());
            reg.reconcile_counts(PersonCounts::from_controls(false, 0, true, 3));
            assert_eq!(kinds(&reg), vec!["friend-1", "friend-2", "friend-3"]);
            reg.reconcile_counts(PersonCounts::from_controls(false, 0, false, 3));
            assert!(kinds(&reg).is_empty());
        }

        #[test]
        fn test_counts_read_from_first_section() {
            let mut reg = Registration::new(FormSettings::default());
            toggle(&mut reg, WITH_PARTNER);
            reg.handle_event(SectionEvent::Step(NUM_CHILDREN.into(), 2));
            toggle(&mut reg, WITH_FRIENDS);
            reg.handle_event(SectionEvent::Step(friend_count_name(WITH_FRIENDS), 1));
            assert_eq!(
                reg.counts_from_controls(),
                PersonCounts {
                    partner: true,
                    children: 2,
                    friends: 2
                }
            );

            toggle(&mut reg, WITH_FRIENDS);
            assert_eq!(reg.counts_from_controls().friends, 0);
        }

        #[test]
        fn test_sub_forms_do_not_inherit_entered_values() {
            let mut reg = Registration::new(FormSettings::default());
            fill_about_you(&mut reg);
            toggle(&mut reg, "dietary-requirements");
            reg.reconcile_counts(PersonCounts::from_controls(true, 0, false, 0));
            let partner = &reg.section(SectionId::Companions).expect("companions").persons[0];
            assert!(partner.fields.iter().all(|f| f.dependent.is_none()));
            assert!(partner
                .fields
                .iter()
                .filter(|f| f.name == "partner-first-name")
                .all(|f| f.as_text().is_empty()));
        }

        #[test]
        fn test_field_names_stay_unique() {
            let mut reg = Registration::new(FormSettings::default());
            toggle(&mut reg, "dietary-requirements");
            toggle(&mut reg, WITH_FRIENDS);
            reg.reconcile_counts(PersonCounts::from_controls(true, 2, true, 2));
            reg.section_mut(SectionId::Companions)
                .expect("companions")
                .handle_event(
                    SectionEvent::Toggle("friend-2-dietary-requirements".into()),
                    MAX_FRIENDS,
                );
            let names = reg.field_names();
            let unique: HashSet<&String> = names.iter().collect();
            assert_eq!(names.len(), unique.len());
        }
    }

    mod payload {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_payload_contains_only_submitted_values() {
            let mut reg = Registration::new(FormSettings::default());
            fill_about_you(&mut reg);
            toggle(&mut reg, "inclusive-needs");
            set_text(&mut reg, "inclusive-needs-details", "ramp");
            toggle(&mut reg, "dietary-requirements");
            toggle(&mut reg, "dietary-requirements");

            let payload = reg.payload().expect("unique names");
            assert_eq!(payload.get("first-name").map(String::as_str), Some("Robin"));
            assert_eq!(payload.get("gender").map(String::as_str), Some("Female"));
            assert_eq!(payload.get("inclusive-needs").map(String::as_str), Some("on"));
            assert_eq!(
                payload.get("inclusive-needs-details").map(String::as_str),
                Some("ramp")
            );
            assert_eq!(payload.get(NUM_CHILDREN).map(String::as_str), Some("0"));
            assert!(!payload.contains_key(WITH_PARTNER));
            assert!(!payload.contains_key("dietary-requirements-vegan"));
            assert!(!payload.contains_key("accommodation"));
            assert_eq!(payload.get(COUNTRY_SELECTIONS).map(String::as_str), Some(""));
        }

        #[test]
        fn test_duplicate_names_are_rejected() {
            let mut reg = Registration::new(FormSettings::default());
            let about = reg.section_mut(SectionId::AboutYou).expect("about");
            let copy = about.fields[0].clone();
            about.fields.push(copy);
            assert!(matches!(
                reg.payload(),
                Err(RegistrationError::DuplicateField(name)) if name == "first-name"
            ));
        }
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut progress = Progress::new(100);
        progress.apply(0.5);
        progress.apply(0.4);
        assert_eq!(progress.value, 50.0);
        progress.apply(2.0);
        assert_eq!(progress.ratio(), 1.0);
    }
}
