// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use storefront::{
    config::AppConfig,
    dto::orders::CheckoutRequest,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartLine, NewOrder, Order, OrderItem, Product},
    state::AppState,
    store::{DataService, MemoryStore},
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "storefront-test-secret";

pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("storefront=debug")
        .with_test_writer()
        .try_init();
}

pub fn config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: JWT_SECRET.into(),
        jwt_audience: None,
        cart_idle_secs: 1800,
        cart_sweep_secs: 300,
    }
}

pub fn product(name: &str, category: &str, price: Decimal) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: format!("{name} description"),
        category: category.into(),
        price,
        stock: 50,
        image_url: format!("https://img.example.com/{}.png", name.to_lowercase()),
        created_at: Utc::now(),
    }
}

pub fn shopper() -> AuthUser {
    AuthUser::new(Uuid::new_v4())
}

pub fn delivery() -> CheckoutRequest {
    CheckoutRequest {
        full_name: "Grace Hopper".into(),
        address: "1 Navy Way".into(),
        city: "Arlington".into(),
        zip_code: "22201".into(),
    }
}

/// [`MemoryStore`] wrapper that counts writes and fails on demand.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_create_order: AtomicBool,
    pub fail_delete_cart: AtomicBool,
    pub fail_fetch_cart: AtomicBool,
    pub writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn write(&self, fail: Option<&AtomicBool>, what: &str) -> AppResult<()> {
        if fail.is_some_and(|f| f.load(Ordering::SeqCst)) {
            return Err(AppError::Remote(DbErr::Custom(format!("{what}: connection reset"))));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl DataService for FlakyStore {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.inner.list_products().await
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        self.inner.get_product(id).await
    }

    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        if self.fail_fetch_cart.load(Ordering::SeqCst) {
            return Err(AppError::Remote(DbErr::Custom("fetch cart: timeout".into())));
        }
        self.inner.fetch_cart(user_id).await
    }

    async fn insert_cart_line(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<()> {
        self.write(None, "insert cart")?;
        self.inner.insert_cart_line(user_id, product_id, quantity).await
    }

    async fn update_cart_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> AppResult<()> {
        self.write(None, "update cart")?;
        self.inner.update_cart_quantity(user_id, line_id, quantity).await
    }

    async fn delete_cart_line(&self, user_id: Uuid, line_id: Uuid) -> AppResult<()> {
        self.write(None, "delete cart line")?;
        self.inner.delete_cart_line(user_id, line_id).await
    }

    async fn delete_cart(&self, user_id: Uuid) -> AppResult<()> {
        self.write(Some(&self.fail_delete_cart), "delete cart")?;
        self.inner.delete_cart(user_id).await
    }

    async fn create_order(&self, order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        self.write(Some(&self.fail_create_order), "create order")?;
        self.inner.create_order(order).await
    }

    async fn list_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        self.inner.list_orders(user_id).await
    }

    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Option<Order>> {
        self.inner.get_order(user_id, order_id).await
    }

    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        self.inner.list_order_items(order_id).await
    }
}

/// State over a [`FlakyStore`] seeded with `products`.
pub fn flaky_state(products: impl IntoIterator<Item = Product>) -> (AppState, Arc<FlakyStore>) {
    let store = Arc::new(FlakyStore::new(MemoryStore::with_products(products)));
    let state = AppState::new(config(), store.clone());
    (state, store)
}
