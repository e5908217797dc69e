//! The remote data service the storefront reads from and writes to.
//!
//! Every call is a plain request/response against one table (or a join with
//! `products`). Nothing here retries or caches; callers decide what to do with
//! a failure.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CartLine, NewOrder, Order, OrderItem, Product},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::SeaOrmStore;

#[async_trait]
pub trait DataService: Send + Sync {
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Cart rows of `user_id` joined with their product, oldest first.
    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>>;

    async fn insert_cart_line(&self, user_id: Uuid, product_id: Uuid, quantity: i32)
        -> AppResult<()>;

    async fn update_cart_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32)
        -> AppResult<()>;

    /// Deleting a row that does not exist is not an error.
    async fn delete_cart_line(&self, user_id: Uuid, line_id: Uuid) -> AppResult<()>;

    async fn delete_cart(&self, user_id: Uuid) -> AppResult<()>;

    /// Persists the order row and all of its lines, or nothing at all.
    async fn create_order(&self, order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)>;

    /// Orders of `user_id`, newest first.
    async fn list_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>>;

    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Option<Order>>;

    /// Lines of one order joined with their product.
    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>>;
}
