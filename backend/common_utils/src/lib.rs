//! Common utilities for the payment gateway adapter

pub mod consts;
pub mod crypto;
pub mod date_time;
pub mod errors;
pub mod ext_traits;
pub mod pii;
pub mod request;
pub mod types;

pub use errors::CustomResult;
pub use request::{Method, Request, RequestContent};
pub use types::MinorUnit;
