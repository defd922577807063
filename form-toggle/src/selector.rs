use std::fmt;
use std::str::FromStr;

use crate::error::ToggleError;

/// Addresses form elements.
///
/// Only the three forms used by the admin pages are supported: `#id`, `.class` and
/// `[name=value]` (the value may be quoted).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Element with the given `id`.
    Id(String),
    /// Elements having the given class.
    Class(String),
    /// Inputs with the given `name` attribute.
    Name(String),
}

impl Selector {
    /// `#id` selector.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// `.class` selector.
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// `[name=value]` selector.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

fn is_valid_ident(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

impl FromStr for Selector {
    type Err = ToggleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ToggleError::InvalidSelector(s.to_string());
        let s = s.trim();

        let selector = if let Some(id) = s.strip_prefix('#') {
            Self::id(id)
        } else if let Some(class) = s.strip_prefix('.') {
            Self::class(class)
        } else if let Some(attr) = s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let (key, value) = attr.split_once('=').ok_or_else(invalid)?;
            if key.trim() != "name" {
                return Err(invalid());
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Self::name(value)
        } else {
            return Err(invalid());
        };

        let (Self::Id(value) | Self::Class(value) | Self::Name(value)) = &selector;
        if !is_valid_ident(value) {
            return Err(invalid());
        }

        Ok(selector)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Name(name) => write!(f, "[name={name}]"),
        }
    }
}
