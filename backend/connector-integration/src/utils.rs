use domain_types::{errors, utils::missing_field_err};
use hyperswitch_masking::{PeekInterface, Secret};

type Error = error_stack::Report<errors::ConnectorError>;

/// Rejects blank strings that would otherwise end up as empty path segments
pub fn non_empty(value: &str, field_name: &'static str) -> Result<String, Error> {
    Some(value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(missing_field_err(field_name))
}

pub fn bearer_token(api_key: &Secret<String>) -> String {
    format!("Bearer {}", api_key.peek())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_path_segments_are_missing_fields() {
        let error = non_empty("  ", "connector_transaction_id").err();
        assert!(error.is_some_and(|report| matches!(
            report.current_context(),
            errors::ConnectorError::MissingRequiredField {
                field_name: "connector_transaction_id"
            }
        )));
        assert_eq!(non_empty("ch_1", "id").ok().as_deref(), Some("ch_1"));
    }
}
