use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, SetQuantityRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart).delete(clear_cart))
        .route("/{line_id}", patch(set_quantity).delete(remove_from_cart))
}

fn cart_response(message: &str, view: CartView) -> Json<ApiResponse<CartView>> {
    let meta = Meta::count(view.items.len());
    Json(ApiResponse::success(message, view, Some(meta)))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart of the current user, empty when signed out", body = ApiResponse<CartView>)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: Option<AuthUser>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let lines = state.cart.lines(user.as_ref()).await?;
    Ok(cart_response("OK", lines.into()))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add a product or merge into its existing line", body = ApiResponse<CartView>),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let lines = state
        .cart
        .add(Some(&user), payload.product_id, payload.quantity)
        .await?;
    Ok(cart_response("Added to cart!", lines.into()))
}

#[utoipa::path(
    patch,
    path = "/api/cart/{line_id}",
    params(("line_id" = Uuid, Path, description = "Cart line ID")),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity set; zero or less removes the line", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn set_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(line_id): Path<Uuid>,
    Json(payload): Json<SetQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let lines = state
        .cart
        .set_quantity(&user, line_id, payload.quantity)
        .await?;
    Ok(cart_response("OK", lines.into()))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{line_id}",
    params(("line_id" = Uuid, Path, description = "Cart line ID")),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(line_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let lines = state.cart.remove(&user, line_id).await?;
    Ok(cart_response("Removed from cart", lines.into()))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let lines = state.cart.clear(&user).await?;
    Ok(cart_response("Cart cleared", lines.into()))
}
