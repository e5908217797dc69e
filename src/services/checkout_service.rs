use crate::{
    dto::orders::{CheckoutRequest, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{NewOrder, NewOrderItem, ORDER_STATUS_COMPLETED},
    services::cart_service::lines_total,
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SignInRequired,
    EmptyCart,
}

#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Preconditions not met; nothing was written.
    NothingToDo(SkipReason),
    Completed(OrderWithItems),
}

/// Turns the shopper's cart snapshot into a completed order and empties the
/// cart.
///
/// The order row and its lines are written as one unit, each line carrying
/// the unit price of the snapshot. A remote failure is returned as is and
/// never retried.
pub async fn checkout(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: &CheckoutRequest,
) -> AppResult<CheckoutOutcome> {
    let Some(user) = user else {
        return Ok(CheckoutOutcome::NothingToDo(SkipReason::SignInRequired));
    };

    let lines = state.cart.lines(Some(user)).await?;
    if lines.is_empty() {
        return Ok(CheckoutOutcome::NothingToDo(SkipReason::EmptyCart));
    }

    payload.validate()?;

    let new_order = NewOrder {
        user_id: user.user_id,
        total_amount: lines_total(&lines),
        status: ORDER_STATUS_COMPLETED.to_string(),
        items: lines
            .into_iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.product.price,
                product: line.product,
            })
            .collect(),
    };

    let (order, items) = state
        .store
        .create_order(new_order)
        .await
        .inspect_err(|err| tracing::warn!(user_id = %user.user_id, error = %err, "checkout failed"))?;

    tracing::info!(
        user_id = %user.user_id,
        order_id = %order.id,
        total = %order.total_amount,
        lines = items.len(),
        "order placed"
    );

    if let Err(err) = state.cart.clear(user).await {
        tracing::warn!(order_id = %order.id, error = %err, "order placed but cart not cleared");
        return Err(err);
    }

    Ok(CheckoutOutcome::Completed(OrderWithItems { order, items }))
}
