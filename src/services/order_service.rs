use uuid::Uuid;

use crate::{
    dto::orders::OrderWithItems,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    state::AppState,
};

pub async fn list_orders(state: &AppState, user: &AuthUser) -> AppResult<Vec<Order>> {
    state.store.list_orders(user.user_id).await
}

/// An order of `user` with its lines. Orders of other users are reported as
/// missing.
pub async fn get_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<OrderWithItems> {
    let order = match state.store.get_order(user.user_id, id).await? {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = state.store.list_order_items(order.id).await?;

    Ok(OrderWithItems { order, items })
}
