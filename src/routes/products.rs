use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{CatalogQuery, CategoryList, ProductList},
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/categories", get(list_categories))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("category" = Option<String>, Query, description = "Exact category, `All` for every product")
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = catalog_service::list_products(&state, query.category.as_deref()).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/categories",
    responses(
        (status = 200, description = "Category filter values, `All` first", body = ApiResponse<CategoryList>)
    ),
    tag = "Products"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let items = catalog_service::list_categories(&state).await?;
    Ok(Json(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = catalog_service::get_product(&state, id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}
