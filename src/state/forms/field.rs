//! Form field value objects

/// What a checkbox reveals when it is checked.
///
/// The change handler dispatches on this tag instead of matching on field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Stepper asking how many friends are coming along
    FriendCount,
    /// Checkbox list of dietary requirements
    DietRequirements,
    /// Free text describing a dietary requirement not in the list
    DietOther,
    /// Free text describing mobility or other accessibility needs
    AccessibilityNeeds,
    /// Free text describing a travel mode not in the list
    TravelModeOther,
}

/// Parts of the personal details that only make sense for adults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    Email,
    Contact,
    Gender,
    Occupation,
}

/// The kind of input a field represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// First or last name
    Name,
    /// Single line free text with no pattern
    Text,
    Email,
    Tel,
    /// A date the event takes place on; must lie in the future
    EventDate,
    /// A date of birth; only needs to be a real date
    BirthDate,
    RadioGroup { options: Vec<String> },
    Checkbox { trigger: Option<Trigger> },
    TextArea,
    /// Hidden value holding the serialized country selection
    CountryList,
    Number { min: u32, max: u32 },
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
    Choice(Option<usize>),
    Number(u32),
}

impl FieldValue {
    fn empty_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Checkbox { .. } => FieldValue::Checked(false),
            FieldKind::RadioGroup { .. } => FieldValue::Choice(None),
            FieldKind::Number { min, .. } => FieldValue::Number(*min),
            _ => FieldValue::Text(String::new()),
        }
    }
}

/// A message attached to a field or section.
///
/// Created the first time it is needed and afterwards only shown or hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub text: String,
    pub visible: bool,
}

impl ErrorMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
        }
    }
}

/// Show the message in `slot`, creating it on first use.
pub fn show_message(slot: &mut Option<ErrorMessage>, text: &str) {
    match slot {
        Some(message) => message.visible = true,
        None => *slot = Some(ErrorMessage::new(text)),
    }
}

/// Hide the message in `slot` if one was ever created.
pub fn hide_message(slot: &mut Option<ErrorMessage>) {
    if let Some(message) = slot {
        message.visible = false;
    }
}

/// Fields revealed by a trigger checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentBlock {
    pub fields: Vec<FormField>,
    pub hidden: bool,
}

impl DependentBlock {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            hidden: false,
        }
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: String,
    pub name: String,
    pub label: String,
    /// Id of the field the label points at
    pub label_for: String,
    pub kind: FieldKind,
    pub value: FieldValue,
    pub required: bool,
    /// Result of the last validation pass
    pub invalid: bool,
    pub error: Option<ErrorMessage>,
    pub dependent: Option<DependentBlock>,
    /// Part of the personal details copied for companions
    pub template: bool,
    pub wrapper: Option<Wrapper>,
}

impl FormField {
    /// Create a field whose id and name are both `name`
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        let value = FieldValue::empty_for(&kind);
        Self {
            id: name.to_string(),
            name: name.to_string(),
            label: label.to_string(),
            label_for: name.to_string(),
            kind,
            value,
            required: false,
            invalid: false,
            error: None,
            dependent: None,
            template: false,
            wrapper: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as part of the personal-info template
    pub fn in_template(mut self) -> Self {
        self.template = true;
        self
    }

    pub fn wrapped(mut self, wrapper: Wrapper) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    pub fn with_number(mut self, value: u32) -> Self {
        self.value = FieldValue::Number(value);
        self
    }

    /// Get the text value (returns empty string for non-text fields)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.value, FieldValue::Checked(true))
    }

    pub fn as_number(&self) -> u32 {
        match self.value {
            FieldValue::Number(n) => n,
            _ => 0,
        }
    }

    /// Label of the selected radio option
    pub fn selected_option(&self) -> Option<&str> {
        match (&self.kind, &self.value) {
            (FieldKind::RadioGroup { options }, FieldValue::Choice(Some(index))) => {
                options.get(*index).map(String::as_str)
            }
            _ => None,
        }
    }

    pub fn trigger(&self) -> Option<Trigger> {
        match self.kind {
            FieldKind::Checkbox { trigger } => trigger,
            _ => None,
        }
    }

    /// Whether the field accepts typed characters
    pub fn accepts_text(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Name
                | FieldKind::Text
                | FieldKind::Email
                | FieldKind::Tel
                | FieldKind::EventDate
                | FieldKind::BirthDate
                | FieldKind::TextArea
        )
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        self.value = FieldValue::Text(value.into());
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.value = FieldValue::Checked(checked);
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        if !self.accepts_text() {
            return;
        }
        if let FieldValue::Text(s) = &mut self.value {
            s.push(c);
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = &mut self.value {
            s.pop();
        }
    }

    /// Move a stepper up or down, staying within its bounds
    pub fn step(&mut self, delta: i32) {
        if let (FieldKind::Number { min, max }, FieldValue::Number(n)) =
            (&self.kind, &mut self.value)
        {
            let next = i64::from(*n) + i64::from(delta);
            *n = next.clamp(i64::from(*min), i64::from(*max)) as u32;
        }
    }

    /// Select the next or previous radio option
    pub fn cycle_choice(&mut self, delta: i32) {
        if let (FieldKind::RadioGroup { options }, FieldValue::Choice(choice)) =
            (&self.kind, &mut self.value)
        {
            if options.is_empty() {
                return;
            }
            let len = options.len() as i32;
            let next = match choice {
                Some(current) => (*current as i32 + delta).rem_euclid(len),
                None if delta < 0 => len - 1,
                None => 0,
            };
            *choice = Some(next as usize);
        }
    }

    /// Reset the value to what a fresh field of this kind holds
    pub fn clear(&mut self) {
        self.value = FieldValue::empty_for(&self.kind);
    }

    pub fn show_error(&mut self, text: &str) {
        show_message(&mut self.error, text);
    }

    pub fn hide_error(&mut self) {
        hide_message(&mut self.error);
    }

    /// Whether an error message is currently displayed for this field
    pub fn error_visible(&self) -> bool {
        self.error.as_ref().is_some_and(|e| e.visible)
    }

    /// Fields revealed by this checkbox that are currently shown
    pub fn visible_dependents(&self) -> &[FormField] {
        match &self.dependent {
            Some(block) if !block.hidden => &block.fields,
            _ => &[],
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Checked(true) => "[x]".to_string(),
            FieldValue::Checked(false) => "[ ]".to_string(),
            FieldValue::Choice(_) => self.selected_option().unwrap_or("").to_string(),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

/// Visit every field in `fields`, descending into dependent blocks.
///
/// `visible` tells the callback whether the field sits outside any hidden block.
pub fn walk_fields<'a>(fields: &'a [FormField], visit: &mut impl FnMut(&'a FormField, bool)) {
    fn walk<'a>(
        fields: &'a [FormField],
        visible: bool,
        visit: &mut impl FnMut(&'a FormField, bool),
    ) {
        for field in fields {
            visit(field, visible);
            if let Some(block) = &field.dependent {
                walk(&block.fields, visible && !block.hidden, visit);
            }
        }
    }
    walk(fields, true, visit);
}

/// Mutable counterpart of [`walk_fields`]
pub fn walk_fields_mut(fields: &mut [FormField], visit: &mut impl FnMut(&mut FormField, bool)) {
    fn walk(fields: &mut [FormField], visible: bool, visit: &mut impl FnMut(&mut FormField, bool)) {
        for field in fields {
            visit(field, visible);
            if let Some(block) = &mut field.dependent {
                let hidden = block.hidden;
                walk(&mut block.fields, visible && !hidden, visit);
            }
        }
    }
    walk(fields, true, visit);
}

/// Find a field anywhere in `fields` by its unique name
pub fn find_field_mut<'a>(fields: &'a mut [FormField], name: &str) -> Option<&'a mut FormField> {
    for field in fields {
        if field.name == name {
            return Some(field);
        }
        let nested = field
            .dependent
            .as_mut()
            .and_then(|block| find_field_mut(&mut block.fields, name));
        if nested.is_some() {
            return nested;
        }
    }
    None
}

/// Find a field anywhere in `fields` by its unique name
pub fn find_field<'a>(fields: &'a [FormField], name: &str) -> Option<&'a FormField> {
    for field in fields {
        if field.name == name {
            return Some(field);
        }
        if let Some(block) = &field.dependent {
            if let Some(found) = find_field(&block.fields, name) {
                return Some(found);
            }
        }
    }
    None
}
