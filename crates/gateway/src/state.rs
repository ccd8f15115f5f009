use std::sync::Arc;

use rp_common::{config::GatewayConfig, error::AppResult};

use crate::host::memory::{MemoryOrderStore, MemoryPaymentStore};
use crate::provider::RozetkaPayClient;
use crate::services::checkout::CheckoutService;
use crate::services::redirect::RedirectFormBuilder;

pub struct AppState {
    pub config: GatewayConfig,
    /// Stand-in for the host's order storage.
    pub orders: Arc<MemoryOrderStore>,
    pub checkout: CheckoutService,
    pub redirect: RedirectFormBuilder,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> AppResult<Self> {
        let client = RozetkaPayClient::from_config(&config.rozetkapay)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: GatewayConfig, client: RozetkaPayClient) -> Self {
        let orders = Arc::new(MemoryOrderStore::new());
        let payments = Arc::new(MemoryPaymentStore::new());
        let checkout = CheckoutService::new(
            client.clone(),
            orders.clone(),
            payments,
            config.gateway_id.clone(),
        );
        let redirect = RedirectFormBuilder::new(client, config.public_url.clone());

        Self {
            config,
            orders,
            checkout,
            redirect,
        }
    }
}

pub type SharedState = Arc<AppState>;
