use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{models::CartLine, services::cart_service::lines_total};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: Decimal,
}

impl From<Vec<CartLine>> for CartView {
    fn from(items: Vec<CartLine>) -> Self {
        let total = lines_total(&items);
        Self { items, total }
    }
}
