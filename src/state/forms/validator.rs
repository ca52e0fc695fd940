//! Field validation predicates and the error message table
//!
//! Validation is deliberately lenient: each predicate checks the rough shape
//! of a value rather than trying to prove it correct.

use super::field::{FieldKind, FieldValue, FormField};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Banner shown above the buttons of a section containing invalid fields
pub const SECTION_ERROR_MESSAGE: &str =
    "There is an error in the input for one or more fields. Please check your entries.";

/// Shown under the start date when it falls after the end date
pub const DATE_PAIR_ERROR_MESSAGE: &str = "The start date must be on or before the end date.";

/// Used for kinds that have no dedicated message
pub const DEFAULT_ERROR_MESSAGE: &str = "Please complete this field.";

const DATE_FORMAT: &str = "%Y-%m-%d";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-',. A-Za-z]{2,}$").expect("name pattern compiles"));

// Only the rough shape; the dot is any character
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+.[^@\s]+$").expect("email pattern compiles"));

// Australian mobile (04xxxxxxxx) or landline (9xxxxxxx)
static TEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((04\d{8})|(9\d{7}))$").expect("phone pattern compiles"));

static WORDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\w){2,}").expect("text pattern compiles"));

pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_tel(value: &str) -> bool {
    TEL_RE.is_match(value)
}

/// At least two consecutive ASCII word characters somewhere in the text
pub fn is_valid_text_area(value: &str) -> bool {
    WORDS_RE.is_match(value)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// A real date whose start (midnight UTC) lies strictly after `now`
pub fn is_future_date(value: &str, now: DateTime<Utc>) -> bool {
    parse_date(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .is_some_and(|start| start.and_utc() > now)
}

/// Whether `end` falls on or after `start`.
///
/// A value that is not a date is left to its own field check and does not
/// fail the pair.
pub fn is_valid_date_pair(start: &str, end: &str) -> bool {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => end >= start,
        _ => true,
    }
}

/// The country list is valid once at least one country was collected
pub fn is_country_selected(serialized: &str) -> bool {
    !serialized.is_empty()
}

/// Check a single field's current value against the rule for its kind
pub fn is_valid_field(field: &FormField, now: DateTime<Utc>) -> bool {
    let text = field.as_text();
    match &field.kind {
        FieldKind::Name => is_valid_name(text),
        FieldKind::Text => !text.trim().is_empty(),
        FieldKind::Email => is_valid_email(text),
        FieldKind::Tel => is_valid_tel(text),
        FieldKind::EventDate => is_future_date(text, now),
        FieldKind::BirthDate => parse_date(text).is_some(),
        FieldKind::RadioGroup { options } => {
            matches!(field.value, FieldValue::Choice(Some(index)) if index < options.len())
        }
        FieldKind::Checkbox { .. } => field.is_checked(),
        FieldKind::TextArea => is_valid_text_area(text),
        FieldKind::CountryList => is_country_selected(text),
        FieldKind::Number { min, max } => (*min..=*max).contains(&field.as_number()),
    }
}

/// Message shown under a field of `kind` that failed validation
pub fn error_message(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Name => {
            "A name field must be at least two characters in length and only consist of alphabetical characters."
        }
        FieldKind::EventDate => "A date must be selected that is after the current date.",
        FieldKind::BirthDate => "A valid date must be selected.",
        FieldKind::Email => {
            "An invalid email address was entered. Please enter a valid email address."
        }
        FieldKind::Tel => "Please enter a valid Australian mobile or landline number.",
        FieldKind::RadioGroup { .. } => "Please select one option.",
        FieldKind::TextArea => {
            "A message of at least two characters in length is required for this section."
        }
        FieldKind::CountryList => "Please select at least one country.",
        FieldKind::Text | FieldKind::Checkbox { .. } | FieldKind::Number { .. } => {
            DEFAULT_ERROR_MESSAGE
        }
    }
}
