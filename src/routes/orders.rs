use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, CheckoutView, OrderList, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::{
        checkout_service::{self, CheckoutOutcome, SkipReason},
        order_service,
    },
    state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/", get(list_order))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders of the current user, newest first", body = ApiResponse<OrderList>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_order(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let items = order_service::list_orders(&state, &user).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success("Ok", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed, or nothing to do when signed out or the cart is empty", body = ApiResponse<CheckoutView>),
        (status = 400, description = "Missing delivery details"),
    ),
    security((), ("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let outcome = checkout_service::checkout(&state, user.as_ref(), &payload).await?;
    let view = CheckoutView::from(outcome);
    let message = if view.order.is_some() {
        "Order Confirmed!"
    } else {
        "Nothing to check out"
    };
    Ok(Json(ApiResponse::success(message, view, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let data = order_service::get_order(&state, &user, id).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

impl From<CheckoutOutcome> for CheckoutView {
    fn from(outcome: CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Completed(order) => Self {
                outcome: "completed".into(),
                reason: None,
                order: Some(order),
            },
            CheckoutOutcome::NothingToDo(reason) => Self {
                outcome: "nothing_to_do".into(),
                reason: Some(
                    match reason {
                        SkipReason::SignInRequired => "Please sign in to proceed with checkout",
                        SkipReason::EmptyCart => "Your cart is empty",
                    }
                    .into(),
                ),
                order: None,
            },
        }
    }
}
