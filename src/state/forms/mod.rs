//! Form domain layer
//!
//! Fields, sections and the registration wizard that ties them together.
//! Everything here is plain data plus pure operations; rendering lives in `ui`.

mod catalog;
mod country;
mod dependents;
mod field;
mod registration;
mod section;
mod template;
mod validator;

pub use country::{CountryNodeKind, CountryTree};
pub use field::{FieldKind, FormField};
pub use registration::{Advance, FormSettings, Registration};
pub use section::{FocusTarget, Section, SectionEvent, SectionId, END_DATE};

#[cfg(test)]
pub use catalog::{NUM_CHILDREN, WITH_FRIENDS, WITH_PARTNER};
#[cfg(test)]
pub use country::CountryGroup;
