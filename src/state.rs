use std::sync::Arc;

use crate::{config::AppConfig, services::cart_service::CartManager, store::DataService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DataService>,
    pub cart: Arc<CartManager>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DataService>) -> Self {
        let cart = Arc::new(CartManager::new(store.clone()));
        Self {
            config: Arc::new(config),
            store,
            cart,
        }
    }
}
