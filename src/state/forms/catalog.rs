//! The fixed field set of the registration form

use super::country::{CountryGroup, CountryTree};
use super::field::{FieldKind, FormField, Trigger, Wrapper};
use super::section::{Section, SectionId, END_DATE, START_DATE};

pub const WITH_PARTNER: &str = "with-partner";
pub const NUM_CHILDREN: &str = "num-children";
pub const WITH_FRIENDS: &str = "with-friends";
pub const COUNTRY_SELECTIONS: &str = "country-selections";

fn radio(name: &str, label: &str, options: &[&str]) -> FormField {
    FormField::new(
        name,
        label,
        FieldKind::RadioGroup {
            options: options.iter().map(|o| (*o).to_string()).collect(),
        },
    )
}

fn checkbox(name: &str, label: &str, trigger: Option<Trigger>) -> FormField {
    FormField::new(name, label, FieldKind::Checkbox { trigger })
}

/// Personal details; the fields marked as template are copied for companions
fn about_you(max_children: u32) -> Section {
    Section::new(
        SectionId::AboutYou,
        "About you",
        vec![
            FormField::new("first-name", "First name", FieldKind::Name)
                .required()
                .in_template(),
            FormField::new("last-name", "Last name", FieldKind::Name)
                .required()
                .in_template(),
            FormField::new("email", "Email address", FieldKind::Email)
                .required()
                .in_template()
                .wrapped(Wrapper::Email),
            FormField::new("contact-number", "Contact number", FieldKind::Tel)
                .required()
                .in_template()
                .wrapped(Wrapper::Contact),
            radio(
                "gender",
                "Gender",
                &["Female", "Male", "Non-binary", "Prefer not to say"],
            )
            .required()
            .in_template()
            .wrapped(Wrapper::Gender),
            FormField::new("birth-date", "Date of birth (YYYY-MM-DD)", FieldKind::BirthDate)
                .required()
                .in_template(),
            FormField::new("occupation", "Occupation", FieldKind::Text)
                .in_template()
                .wrapped(Wrapper::Occupation),
            checkbox(
                "dietary-requirements",
                "Do you have any dietary requirements?",
                Some(Trigger::DietRequirements),
            )
            .in_template(),
            checkbox(
                "inclusive-needs",
                "Do you have any needs related to physical mobility or other?",
                Some(Trigger::AccessibilityNeeds),
            )
            .in_template(),
            checkbox(WITH_PARTNER, "I am traveling with my partner", None),
            FormField::new(
                NUM_CHILDREN,
                "The number of children that you are traveling with",
                FieldKind::Number {
                    min: 0,
                    max: max_children,
                },
            )
            .with_number(0),
            checkbox(
                WITH_FRIENDS,
                "I am traveling with friends",
                Some(Trigger::FriendCount),
            ),
        ],
    )
}

fn trip() -> Section {
    Section::new(
        SectionId::Trip,
        "Your trip",
        vec![
            FormField::new(START_DATE, "Arrival date (YYYY-MM-DD)", FieldKind::EventDate)
                .required(),
            FormField::new(END_DATE, "Departure date (YYYY-MM-DD)", FieldKind::EventDate)
                .required(),
            checkbox("travel-mode-plane", "I will arrive by plane", None),
            checkbox("travel-mode-train", "I will arrive by train", None),
            checkbox("travel-mode-car", "I will arrive by car", None),
            checkbox(
                "travel-mode-other",
                "I will arrive some other way",
                Some(Trigger::TravelModeOther),
            ),
            FormField::new(
                COUNTRY_SELECTIONS,
                "Countries you will travel through",
                FieldKind::CountryList,
            )
            .required(),
        ],
    )
    .with_countries(CountryTree::new(&countries()))
}

fn extras() -> Section {
    Section::new(
        SectionId::Extras,
        "Accommodation",
        vec![
            radio(
                "accommodation",
                "Where will you be staying?",
                &[
                    "Event hotel",
                    "Other hotel or hostel",
                    "With friends or family",
                    "Not required",
                ],
            )
            .required(),
            FormField::new("comments", "Anything else we should know?", FieldKind::TextArea),
        ],
    )
}

/// Every section of the form in display order, all hidden
pub fn sections(max_children: u32) -> Vec<Section> {
    vec![
        about_you(max_children),
        Section::new(SectionId::Companions, "Your travel companions", vec![]),
        trip(),
        extras(),
        Section::new(SectionId::Review, "Review and submit", vec![]),
    ]
}

fn countries() -> Vec<CountryGroup> {
    use CountryGroup::{Country, Region};
    vec![
        Region(
            "Oceania",
            vec![
                Country("Australia"),
                Country("Fiji"),
                Country("New Zealand"),
                Country("Papua New Guinea"),
            ],
        ),
        Region(
            "Asia",
            vec![
                Region(
                    "East Asia",
                    vec![
                        Country("China"),
                        Country("Japan"),
                        Country("Mongolia"),
                        Country("South Korea"),
                    ],
                ),
                Region(
                    "South-East Asia",
                    vec![
                        Country("Indonesia"),
                        Country("Malaysia"),
                        Country("Singapore"),
                        Country("Thailand"),
                        Country("Vietnam"),
                    ],
                ),
                Region(
                    "South Asia",
                    vec![Country("India"), Country("Nepal"), Country("Sri Lanka")],
                ),
            ],
        ),
        Region(
            "Europe",
            vec![
                Region(
                    "Western Europe",
                    vec![
                        Country("France"),
                        Country("Germany"),
                        Country("Ireland"),
                        Country("Netherlands"),
                        Country("United Kingdom"),
                    ],
                ),
                Region(
                    "Southern Europe",
                    vec![
                        Country("Greece"),
                        Country("Italy"),
                        Country("Portugal"),
                        Country("Spain"),
                    ],
                ),
            ],
        ),
        Region(
            "Americas",
            vec![
                Region(
                    "North America",
                    vec![
                        Country("Canada"),
                        Country("Mexico"),
                        Country("United States"),
                    ],
                ),
                Region(
                    "South America",
                    vec![
                        Country("Argentina"),
                        Country("Brazil"),
                        Country("Chile"),
                        Country("Peru"),
                    ],
                ),
            ],
        ),
        Region(
            "Africa",
            vec![
                Country("Egypt"),
                Country("Kenya"),
                Country("Morocco"),
                Country("South Africa"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::walk_fields;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique() {
        let mut seen = HashSet::new();
        for section in sections(10) {
            walk_fields(&section.fields, &mut |field, _| {
                assert!(seen.insert(field.name.clone()), "duplicate {}", field.name);
            });
        }
    }

    #[test]
    fn test_only_first_section_provides_template() {
        for section in sections(10).iter().skip(1) {
            assert!(section.fields.iter().all(|f| !f.template));
        }
        let about = about_you(10);
        assert_eq!(about.fields.iter().filter(|f| f.template).count(), 9);
    }

    #[test]
    fn test_every_section_has_progress() {
        assert!(sections(10).iter().all(|s| s.has_progress && s.hidden));
    }

    #[test]
    fn test_trip_has_country_tree() {
        let trip = trip();
        let tree = trip.countries.as_ref().expect("country tree");
        assert!(tree.nodes().iter().any(|n| n.label == "Japan"));
        assert!(trip.find_field(COUNTRY_SELECTIONS).is_some());
    }
}
