use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderItem},
};

/// Delivery details collected by the checkout form. Required, not stored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
}

impl CheckoutRequest {
    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("full_name", &self.full_name),
            ("address", &self.address),
            ("city", &self.city),
            ("zip_code", &self.zip_code),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::BadRequest(format!("{name} is required")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutView {
    /// `completed` or `nothing_to_do`.
    pub outcome: String,
    pub reason: Option<String>,
    pub order: Option<OrderWithItems>,
}
