use std::sync::Arc;

use crate::{
    configs::Config,
    server::{customers::Customers, payments::Payments, webhooks::Webhooks},
};

#[derive(Clone)]
pub struct AppState {
    pub payments_service: Payments,
    pub customers_service: Customers,
    pub webhooks_service: Webhooks,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            payments_service: Payments {
                config: Arc::clone(&config),
            },
            customers_service: Customers {
                config: Arc::clone(&config),
            },
            webhooks_service: Webhooks { config },
        }
    }
}
