use std::collections::{BTreeMap, HashMap};

use error_stack::report;

use crate::errors;

pub type Error = error_stack::Report<errors::ConnectorError>;

/// Trait for converting from one foreign type to another
pub trait ForeignTryFrom<F>: Sized {
    /// Custom error for conversion failure
    type Error;

    /// Convert from a foreign type to the current type and return an error if the conversion fails
    fn foreign_try_from(from: F) -> Result<Self, error_stack::Report<Self::Error>>;
}

pub trait ForeignFrom<F>: Sized {
    /// Convert from a foreign type to the current type
    fn foreign_from(from: F) -> Self;
}

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> error_stack::Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

/// Looks up a header by its lower-cased name
pub fn get_header_key_value<'a>(
    key: &str,
    headers: &'a HashMap<String, String>,
) -> Result<&'a str, error_stack::Report<errors::WebhookError>> {
    headers
        .get(&key.to_ascii_lowercase())
        .map(String::as_str)
        .ok_or(report!(errors::WebhookError::SignatureNotFound))
}

/// Flattens free-form metadata into the string values card processors accept
pub fn stringify_metadata(
    metadata: Option<&BTreeMap<String, serde_json::Value>>,
) -> Option<BTreeMap<String, String>> {
    metadata.map(|metadata| {
        metadata
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(value) => value.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    })
}
