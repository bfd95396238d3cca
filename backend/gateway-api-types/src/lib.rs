//! The gateway-agnostic data model exchanged with callers of the adapter.
//!
//! Every record keeps the fields it does not know about in an `extra` map so that a
//! transaction or customer passes through the adapter without losing caller data.

pub mod customers;
pub mod payments;
pub mod webhooks;

/// Gateway name stamped on every record produced by this adapter
pub const GATEWAY_NAME: &str = "stripe";

/// Free-form key/value pairs attached to a record
pub type Metadata = std::collections::BTreeMap<String, serde_json::Value>;

/// Fields a record carried that the adapter does not interpret
pub type Extra = serde_json::Map<String, serde_json::Value>;
