//! Partner, child and friend sub-forms built from the personal-info template

use super::field::{walk_fields_mut, FormField, Trigger, Wrapper};

/// Who a companion sub-form describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Partner,
    Child,
    Friend,
}

impl PersonKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Partner => "partner",
            Self::Child => "child",
            Self::Friend => "friend",
        }
    }

    /// Prefix that keeps every id and name of an instance unique
    pub fn namespace(&self, ordinal: u32) -> String {
        match self {
            Self::Partner => "partner".to_string(),
            Self::Child | Self::Friend => format!("{}-{ordinal}", self.label()),
        }
    }

    pub fn heading(&self, ordinal: u32) -> String {
        match self {
            Self::Partner => "About your partner".to_string(),
            Self::Child | Self::Friend => format!("About {} {ordinal}", self.label()),
        }
    }

    /// Children have no email, contact number, gender or occupation
    fn keeps(&self, field: &FormField) -> bool {
        match self {
            Self::Child => !matches!(
                field.wrapper,
                Some(Wrapper::Email | Wrapper::Contact | Wrapper::Gender | Wrapper::Occupation)
            ),
            Self::Partner | Self::Friend => true,
        }
    }
}

/// One inserted companion section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSubForm {
    pub kind: PersonKind,
    pub ordinal: u32,
    pub namespace: String,
    pub heading: String,
    pub fields: Vec<FormField>,
}

/// Instantiate the template for the `ordinal`-th person of `kind`.
///
/// The template is usually the live first section, so anything the user has
/// entered, revealed or got wrong there is stripped from the copy.
pub fn instantiate(template: &[FormField], kind: PersonKind, ordinal: u32) -> PersonSubForm {
    let namespace = kind.namespace(ordinal);
    let mut fields: Vec<FormField> = template
        .iter()
        .filter(|field| kind.keeps(field))
        .cloned()
        .collect();

    walk_fields_mut(&mut fields, &mut |field, _| {
        field.clear();
        field.dependent = None;
        field.invalid = false;
        field.error = None;
        field.template = false;
        field.id = format!("{namespace}-{}", field.id);
        field.name = format!("{namespace}-{}", field.name);
        field.label_for = format!("{namespace}-{}", field.label_for);
        match field.trigger() {
            Some(Trigger::DietRequirements) => {
                field.label = format!("Does your {} have any dietary requirements?", kind.label());
            }
            Some(Trigger::AccessibilityNeeds) => {
                field.label = format!(
                    "Does your {} have any needs related to physical mobility or other?",
                    kind.label()
                );
            }
            _ => {}
        }
    });

    PersonSubForm {
        kind,
        ordinal,
        heading: kind.heading(ordinal),
        namespace,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::{DependentBlock, FieldKind};
    use pretty_assertions::assert_eq;

    fn template() -> Vec<FormField> {
        let mut first = FormField::new("first-name", "First name", FieldKind::Name)
            .required()
            .in_template();
        first.set_text("Alex");
        first.invalid = true;
        first.show_error("bad name");

        let email = FormField::new("email", "Email", FieldKind::Email)
            .required()
            .in_template()
            .wrapped(Wrapper::Email);
        let mut gender = FormField::new(
            "gender",
            "Gender",
            FieldKind::RadioGroup {
                options: vec!["Female".into(), "Male".into()],
            },
        )
        .required()
        .in_template()
        .wrapped(Wrapper::Gender);
        gender.cycle_choice(1);

        let mut diet = FormField::new(
            "dietary-requirements",
            "Do you have any dietary requirements?",
            FieldKind::Checkbox {
                trigger: Some(Trigger::DietRequirements),
            },
        )
        .in_template();
        diet.set_checked(true);
        diet.dependent = Some(DependentBlock::new(vec![FormField::new(
            "dietary-requirements-vegan",
            "Vegan",
            FieldKind::Checkbox { trigger: None },
        )]));

        vec![first, email, gender, diet]
    }

    #[test]
    fn test_partner_copy_is_cleared_and_prefixed() {
        let person = instantiate(&template(), PersonKind::Partner, 1);
        assert_eq!(person.heading, "About your partner");
        assert_eq!(person.namespace, "partner");

        let names: Vec<&str> = person.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "partner-first-name",
                "partner-email",
                "partner-gender",
                "partner-dietary-requirements"
            ]
        );

        let first = &person.fields[0];
        assert_eq!(first.id, "partner-first-name");
        assert_eq!(first.label_for, "partner-first-name");
        assert_eq!(first.as_text(), "");
        assert!(!first.invalid);
        assert!(first.error.is_none());

        assert_eq!(person.fields[2].selected_option(), None);

        let diet = &person.fields[3];
        assert!(!diet.is_checked());
        assert!(diet.dependent.is_none());
        assert_eq!(diet.label, "Does your partner have any dietary requirements?");
    }

    #[test]
    fn test_child_copy_drops_adult_fields() {
        let person = instantiate(&template(), PersonKind::Child, 2);
        assert_eq!(person.heading, "About child 2");
        let names: Vec<&str> = person.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["child-2-first-name", "child-2-dietary-requirements"]
        );
    }

    #[test]
    fn test_friend_namespace_uses_ordinal() {
        let person = instantiate(&template(), PersonKind::Friend, 3);
        assert_eq!(person.namespace, "friend-3");
        assert_eq!(person.heading, "About friend 3");
        assert!(person.fields.iter().all(|f| f.name.starts_with("friend-3-")));
        assert!(person.fields.iter().all(|f| !f.template));
    }

    #[test]
    fn test_template_is_untouched() {
        let template = template();
        let before = template.clone();
        let _ = instantiate(&template, PersonKind::Child, 1);
        assert_eq!(template, before);
    }
}
