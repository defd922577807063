//! In-memory model of a rendered admin form.
//!
//! Only what the togglers need is modelled: checkboxes with their checked state and sections
//! (panels) with their visibility, addressable by id, name and classes.

use crate::selector::Selector;

/// What an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Checkbox input.
    Checkbox {
        /// Current checked state.
        checked: bool,
    },
    /// Any other element, usually a form panel.
    Section,
}

/// A form element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: Option<String>,
    name: Option<String>,
    classes: Vec<String>,
    kind: ElementKind,
    visible: bool,
}

impl Element {
    /// Visible checkbox.
    pub fn checkbox(checked: bool) -> Self {
        Self::new(ElementKind::Checkbox { checked })
    }

    /// Visible section.
    pub fn section() -> Self {
        Self::new(ElementKind::Section)
    }

    fn new(kind: ElementKind) -> Self {
        Self {
            id: None,
            name: None,
            classes: vec![],
            kind,
            visible: true,
        }
    }

    /// Sets the `id` attribute.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the `name` attribute.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Whether the selector matches this element.
    pub fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_ref() == Some(id),
            Selector::Class(class) => self.classes.contains(class),
            Selector::Name(name) => self.name.as_ref() == Some(name),
        }
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Checked state, `None` for sections.
    pub fn checked(&self) -> Option<bool> {
        match self.kind {
            ElementKind::Checkbox { checked } => Some(checked),
            ElementKind::Section => None,
        }
    }

    /// Whether the element is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_checked(&mut self, value: bool) -> bool {
        match &mut self.kind {
            ElementKind::Checkbox { checked } => {
                *checked = value;
                true
            }
            ElementKind::Section => false,
        }
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Elements of a form in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    elements: Vec<Element>,
}

impl Form {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element.
    pub fn with(mut self, element: Element) -> Self {
        self.push(element);
        self
    }

    /// Adds an element and returns its index.
    pub fn push(&mut self, element: Element) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Element at the given index.
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub(crate) fn element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements.get_mut(index)
    }

    /// Indices of the elements matching `selector`, in document order.
    pub fn resolve(&self, selector: &Selector) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.matches(selector))
            .map(|(index, _)| index)
            .collect()
    }

    /// Whether any element matches `selector`.
    pub fn contains(&self, selector: &Selector) -> bool {
        self.elements.iter().any(|element| element.matches(selector))
    }

    /// Whether any checkbox matching `selector` is checked.
    ///
    /// Returns `None` if no checkbox matches.
    pub fn is_checked(&self, selector: &Selector) -> Option<bool> {
        self.elements
            .iter()
            .filter(|element| element.matches(selector))
            .filter_map(Element::checked)
            .reduce(|a, b| a || b)
    }

    /// Sets the checked state of all checkboxes matching `selector`.
    ///
    /// Returns the number of checkboxes found.
    pub fn set_checked(&mut self, selector: &Selector, checked: bool) -> usize {
        self.elements
            .iter_mut()
            .filter(|element| element.matches(selector))
            .map(|element| element.set_checked(checked))
            .filter(|changed| *changed)
            .count()
    }

    /// Shows or hides all elements matching `selector`.
    ///
    /// Returns the number of elements found.
    pub fn set_visible(&mut self, selector: &Selector, visible: bool) -> usize {
        let mut count = 0;
        for element in self.elements.iter_mut().filter(|e| e.matches(selector)) {
            element.set_visible(visible);
            count += 1;
        }
        count
    }

    /// Whether all elements matching `selector` are shown.
    ///
    /// Returns `None` if nothing matches.
    pub fn is_visible(&self, selector: &Selector) -> Option<bool> {
        let mut matched = self
            .elements
            .iter()
            .filter(|element| element.matches(selector))
            .peekable();
        matched.peek()?;
        Some(matched.all(Element::is_visible))
    }
}
