//! Feature popups.
//!
//! Only properties listed in the layer's `interactionConfig.output` are ever shown. Anything
//! else a feature carries stays out of the popup, even if it is present on the feature.

use serde_json::{Map as JsonMap, Value};

use crate::config::OutputField;

/// A feature property shown in popups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupField {
    /// Property name on the feature.
    pub name: String,
    /// Label shown instead of the property name.
    pub label: Option<String>,
}

impl From<&OutputField> for PopupField {
    fn from(field: &OutputField) -> Self {
        Self {
            name: field.column.clone(),
            label: field.property.clone(),
        }
    }
}

/// A clicked map feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// Feature properties in source order.
    pub properties: JsonMap<String, Value>,
}

impl Feature {
    /// Creates a feature with the given properties.
    pub fn new(properties: JsonMap<String, Value>) -> Self {
        Self { properties }
    }
}

/// Builds popup HTML for the allowed properties of a feature.
///
/// Returns `None` if none of the `fields` is present on the feature.
pub fn feature_html(properties: &JsonMap<String, Value>, fields: &[PopupField]) -> Option<String> {
    let mut rows = properties
        .iter()
        .filter_map(|(key, value)| {
            let field = fields.iter().find(|field| &field.name == key)?;
            let label = field.label.as_deref().filter(|l| !l.is_empty()).unwrap_or(key.as_str());
            Some(format!(
                "<p><b>{}:</b> {}<br/></p>",
                escape_html(label),
                escape_html(&display_value(value))
            ))
        })
        .peekable();

    rows.peek()?;

    let mut html = String::from("<div class='station-popup-content'>");
    html.extend(rows);
    html.push_str("</div>");
    Some(html)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
