use serde::{Deserialize, Serialize};

use crate::Extra;

/// Gateway event envelope as delivered to, and returned from, the webhook endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Set when the event type is not one the adapter processes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl WebhookEvent {
    pub fn data_object_mut(&mut self) -> Option<&mut serde_json::Map<String, serde_json::Value>> {
        self.data
            .as_mut()
            .and_then(serde_json::Value::as_object_mut)
            .and_then(|data| data.get_mut("object"))
            .and_then(serde_json::Value::as_object_mut)
    }
}
