use axum::{Router, routing::get};

use crate::state::AppState;

pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::route())
}

/// Health check, API and docs on one router, ready for `with_state`.
pub fn create_app_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
}
