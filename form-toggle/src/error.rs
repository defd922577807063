use thiserror::Error;

use crate::selector::Selector;

/// Error returned when parsing selectors or binding togglers to a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    /// Selector is not `#id`, `.class` or `[name=value]`.
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    /// A toggler refers to an element the form does not have.
    #[error("toggler `{toggler}`: no element matches `{selector}`")]
    MissingElement {
        /// Name of the toggler.
        toggler: String,
        /// Selector that matched nothing.
        selector: Selector,
    },

    /// No checkbox matches the control passed to `set_checked`.
    #[error("no checkbox matches `{0}`")]
    UnknownControl(Selector),
}
