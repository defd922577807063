//! Conditional panels of the admin forms.
//!
//! A [`Toggler`] keeps the visibility of one or more panels in line with a checkbox: panels
//! can follow the checkbox, do the opposite, or several panels can be switched in opposite
//! directions at once. [`ToggleController`] binds togglers to a [`Form`] so the panels are
//! correct right after the page loads and after every change of a checkbox.
//!
//! ```ignore
//! let mut controller = ToggleController::bind(form, catalog::togglers(FormKind::RasterFile))?;
//! controller.set_checked(&Selector::id("id_use_custom_legend"), true)?;
//! ```

pub mod catalog;
mod controller;
mod error;
mod form;
mod selector;
mod toggler;

pub use catalog::FormKind;
pub use controller::ToggleController;
pub use error::ToggleError;
pub use form::{Element, ElementKind, Form};
pub use selector::Selector;
pub use toggler::{PanelRule, Toggler};
