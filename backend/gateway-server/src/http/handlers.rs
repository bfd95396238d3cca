pub mod customers;
pub mod health;
mod macros;
pub mod payments;
pub mod webhooks;
