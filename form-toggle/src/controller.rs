//! Binding togglers to a form.
//!
//! Selectors are resolved once, when the controller is created. Afterwards every change of a
//! control goes through [`ToggleController::set_checked`], which re-applies the togglers bound
//! to the changed checkboxes.

use ahash::HashSet;

use crate::error::ToggleError;
use crate::form::Form;
use crate::selector::Selector;
use crate::toggler::Toggler;

#[derive(Debug)]
struct Binding {
    toggler: Toggler,
    control: Vec<usize>,
    targets: Vec<(Vec<usize>, bool)>,
}

impl Binding {
    fn resolve(form: &Form, toggler: Toggler) -> Result<Self, ToggleError> {
        let missing = |selector: &Selector| ToggleError::MissingElement {
            toggler: toggler.name.clone(),
            selector: selector.clone(),
        };

        let control: Vec<usize> = form
            .resolve(&toggler.control)
            .into_iter()
            .filter(|index| form.element(*index).and_then(|e| e.checked()).is_some())
            .collect();
        if control.is_empty() {
            return Err(missing(&toggler.control));
        }

        let mut targets = Vec::with_capacity(toggler.rules.len());
        for rule in &toggler.rules {
            let elements = form.resolve(&rule.target);
            if elements.is_empty() {
                return Err(missing(&rule.target));
            }
            targets.push((elements, rule.visible_when_checked));
        }

        Ok(Self {
            toggler,
            control,
            targets,
        })
    }

    fn apply(&self, form: &mut Form) {
        let checked = self
            .control
            .iter()
            .filter_map(|index| form.element(*index).and_then(|e| e.checked()))
            .any(|checked| checked);

        for (elements, visible_when_checked) in &self.targets {
            for index in elements {
                if let Some(element) = form.element_mut(*index) {
                    element.set_visible(checked == *visible_when_checked);
                }
            }
        }

        log::debug!(
            "Toggler {} applied ({})",
            self.toggler.name,
            if checked { "checked" } else { "unchecked" }
        );
    }
}

/// A form with its togglers bound.
///
/// Right after binding, every panel already has the visibility its control requires.
#[derive(Debug)]
pub struct ToggleController {
    form: Form,
    bindings: Vec<Binding>,
}

impl ToggleController {
    /// Binds all togglers. Fails on the first toggler whose control or panel is missing.
    pub fn bind(form: Form, togglers: Vec<Toggler>) -> Result<Self, ToggleError> {
        let bindings = togglers
            .into_iter()
            .map(|toggler| Binding::resolve(&form, toggler))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::with_bindings(form, bindings))
    }

    /// Binds the togglers whose elements are all present and skips the others.
    pub fn bind_present(form: Form, togglers: Vec<Toggler>) -> Self {
        let bindings = togglers
            .into_iter()
            .filter_map(|toggler| match Binding::resolve(&form, toggler) {
                Ok(binding) => Some(binding),
                Err(err) => {
                    log::warn!("Skipping toggler: {err}");
                    None
                }
            })
            .collect();

        Self::with_bindings(form, bindings)
    }

    fn with_bindings(form: Form, bindings: Vec<Binding>) -> Self {
        let mut controller = Self { form, bindings };
        controller.apply_all();
        controller
    }

    /// Re-applies every toggler.
    pub fn apply_all(&mut self) {
        for binding in &self.bindings {
            binding.apply(&mut self.form);
        }
    }

    /// Checks or unchecks the checkboxes matching `control` and updates the panels that follow
    /// them.
    pub fn set_checked(&mut self, control: &Selector, checked: bool) -> Result<(), ToggleError> {
        let changed: HashSet<usize> = self
            .form
            .resolve(control)
            .into_iter()
            .filter(|index| {
                self.form
                    .element(*index)
                    .and_then(|e| e.checked())
                    .is_some()
            })
            .collect();
        if changed.is_empty() {
            return Err(ToggleError::UnknownControl(control.clone()));
        }

        self.form.set_checked(control, checked);

        for binding in &self.bindings {
            if binding.control.iter().any(|index| changed.contains(index)) {
                binding.apply(&mut self.form);
            }
        }
        Ok(())
    }

    /// Names of the bound togglers.
    pub fn bound(&self) -> impl Iterator<Item = &str> {
        self.bindings
            .iter()
            .map(|binding| binding.toggler.name.as_str())
    }

    /// The form.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Releases the form.
    pub fn into_form(self) -> Form {
        self.form
    }
}
