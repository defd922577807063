use crate::form::Form;
use crate::selector::Selector;

/// Visibility of one panel as a function of the control's checked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRule {
    /// Panel(s) shown or hidden.
    pub target: Selector,
    /// Whether the panel is shown while the control is checked. The panel is in the opposite
    /// state while the control is unchecked.
    pub visible_when_checked: bool,
}

impl PanelRule {
    /// Panel visibility for the given control state.
    pub fn visibility(&self, checked: bool) -> bool {
        checked == self.visible_when_checked
    }
}

/// Shows and hides panels of a form depending on a checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggler {
    /// Name used in logs and errors.
    pub name: String,
    /// The checkbox the panels follow.
    pub control: Selector,
    /// Panels and their rules.
    pub rules: Vec<PanelRule>,
}

impl Toggler {
    /// Toggler without any panel.
    pub fn new(name: impl Into<String>, control: Selector) -> Self {
        Self {
            name: name.into(),
            control,
            rules: vec![],
        }
    }

    /// Adds a panel shown while the control is checked.
    pub fn show_when_checked(mut self, target: Selector) -> Self {
        self.rules.push(PanelRule {
            target,
            visible_when_checked: true,
        });
        self
    }

    /// Adds a panel hidden while the control is checked.
    pub fn hide_when_checked(mut self, target: Selector) -> Self {
        self.rules.push(PanelRule {
            target,
            visible_when_checked: false,
        });
        self
    }

    /// Control selector followed by all target selectors.
    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        std::iter::once(&self.control).chain(self.rules.iter().map(|rule| &rule.target))
    }

    /// Sets the visibility of the panels from the current state of the control.
    ///
    /// Missing panels are skipped. If the control is missing nothing changes and `false` is
    /// returned.
    pub fn apply(&self, form: &mut Form) -> bool {
        let Some(checked) = form.is_checked(&self.control) else {
            log::trace!("Toggler {}: control {} not found", self.name, self.control);
            return false;
        };

        for rule in &self.rules {
            form.set_visible(&rule.target, rule.visibility(checked));
        }
        true
    }
}
