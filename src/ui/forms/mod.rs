//! Form rendering module
//!
//! - `field_renderer`: one field as styled lines
//! - `country_tree`: the collapsible country selector
//! - `section_form`: the body of the current section

mod country_tree;
mod field_renderer;
mod section_form;

pub use section_form::draw_section;
