//! Fields revealed by trigger checkboxes
//!
//! A dependent block is created the first time its checkbox is checked and is
//! only hidden afterwards, so anything typed into it survives toggling.

use super::field::{DependentBlock, FieldKind, FormField, Trigger};

/// Options offered once a dietary requirement is indicated
pub const DIET_OPTIONS: &[&str] = &[
    "vegetarian",
    "vegan",
    "kosher",
    "halal",
    "allergies",
    "diet-other",
];

pub const MAX_FRIENDS: u32 = 10;

/// Name of the stepper revealed by a friend checkbox
pub fn friend_count_name(trigger_name: &str) -> String {
    format!("{trigger_name}-count")
}

/// Build the fields a trigger reveals. Names derive from the trigger's own
/// unique name so copies for companions never collide.
pub fn create_dependents(trigger: Trigger, trigger_name: &str, max_friends: u32) -> Vec<FormField> {
    match trigger {
        Trigger::FriendCount => vec![number_of_friends(trigger_name, max_friends)],
        Trigger::DietRequirements => diet_requirements(trigger_name),
        Trigger::DietOther | Trigger::AccessibilityNeeds | Trigger::TravelModeOther => {
            vec![please_specify(trigger_name)]
        }
    }
}

fn number_of_friends(trigger_name: &str, max_friends: u32) -> FormField {
    FormField::new(
        &friend_count_name(trigger_name),
        "The number of friends that you are traveling with",
        FieldKind::Number {
            min: 1,
            max: max_friends.max(1),
        },
    )
}

fn diet_requirements(trigger_name: &str) -> Vec<FormField> {
    DIET_OPTIONS
        .iter()
        .map(|option| {
            let trigger = (*option == "diet-other").then_some(Trigger::DietOther);
            FormField::new(
                &format!("{trigger_name}-{option}"),
                &diet_label(option),
                FieldKind::Checkbox { trigger },
            )
        })
        .collect()
}

fn diet_label(option: &str) -> String {
    if option == "diet-other" {
        return "Other".to_string();
    }
    let mut chars = option.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn please_specify(trigger_name: &str) -> FormField {
    FormField::new(
        &format!("{trigger_name}-details"),
        "Please specify",
        FieldKind::TextArea,
    )
    .required()
}

/// Apply a checkbox change to its dependent block.
///
/// Checked with no block creates one, checked with a block unhides it, and
/// unchecked hides it without destroying anything.
pub fn toggle_dependent(field: &mut FormField, max_friends: u32) {
    let Some(trigger) = field.trigger() else {
        return;
    };
    let checked = field.is_checked();
    match (checked, field.dependent.as_mut()) {
        (true, Some(block)) => block.hidden = false,
        (true, None) => {
            tracing::debug!(field = %field.name, ?trigger, "creating dependent fields");
            let fields = create_dependents(trigger, &field.name, max_friends);
            field.dependent = Some(DependentBlock::new(fields));
        }
        (false, Some(block)) => block.hidden = true,
        (false, None) => {}
    }
}
