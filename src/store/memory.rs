use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{CartLine, NewOrder, Order, OrderItem, Product},
    store::DataService,
};

/// In-process [`DataService`] holding the four tables in memory.
///
/// The unique `(user_id, product_id)` index on carts, the product foreign
/// keys and the positive quantity check are enforced the same way the
/// database enforces them, so callers see a remote error on violation.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    carts: Vec<CartRow>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

#[derive(Clone)]
struct CartRow {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        for product in products {
            store.insert_product(product);
        }
        store
    }

    /// Inserts or replaces a product row.
    pub fn insert_product(&self, product: Product) {
        let mut tables = self.tables.write();
        match tables.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => tables.products.push(product),
        }
    }

    /// Changes the live price of a product. Returns false when it does not exist.
    pub fn set_product_price(&self, product_id: Uuid, price: Decimal) -> bool {
        let mut tables = self.tables.write();
        match tables.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                product.price = price;
                true
            }
            None => false,
        }
    }

    pub fn order_count(&self) -> usize {
        self.tables.read().orders.len()
    }

    pub fn order_item_count(&self) -> usize {
        self.tables.read().order_items.len()
    }
}

impl Tables {
    fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

fn check_quantity(table: &str, quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(violation(format!(
            "new row for relation \"{table}\" violates check constraint \"{table}_quantity_check\""
        )));
    }
    Ok(())
}

fn violation(message: String) -> AppError {
    AppError::Remote(DbErr::Custom(message))
}

#[async_trait]
impl DataService for MemoryStore {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.tables.read().products.clone())
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.tables.read().product(id).cloned())
    }

    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let tables = self.tables.read();
        let lines = tables
            .carts
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter_map(|row| {
                let product = tables.product(row.product_id)?.clone();
                Some(CartLine {
                    id: row.id,
                    user_id: row.user_id,
                    product_id: row.product_id,
                    quantity: row.quantity,
                    created_at: row.created_at,
                    product,
                })
            })
            .collect();
        Ok(lines)
    }

    async fn insert_cart_line(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        check_quantity("carts", quantity)?;
        let mut tables = self.tables.write();
        if tables.product(product_id).is_none() {
            return Err(violation(format!(
                "insert on table \"carts\" violates foreign key constraint: product {product_id} does not exist"
            )));
        }
        if tables
            .carts
            .iter()
            .any(|row| row.user_id == user_id && row.product_id == product_id)
        {
            return Err(violation(
                "duplicate key value violates unique constraint \"carts_user_id_product_id_key\""
                    .to_string(),
            ));
        }
        tables.carts.push(CartRow {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            quantity,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn update_cart_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        check_quantity("carts", quantity)?;
        let mut tables = self.tables.write();
        if let Some(row) = tables
            .carts
            .iter_mut()
            .find(|row| row.id == line_id && row.user_id == user_id)
        {
            row.quantity = quantity;
        }
        Ok(())
    }

    async fn delete_cart_line(&self, user_id: Uuid, line_id: Uuid) -> AppResult<()> {
        self.tables
            .write()
            .carts
            .retain(|row| !(row.id == line_id && row.user_id == user_id));
        Ok(())
    }

    async fn delete_cart(&self, user_id: Uuid) -> AppResult<()> {
        self.tables.write().carts.retain(|row| row.user_id != user_id);
        Ok(())
    }

    async fn create_order(&self, order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        let mut tables = self.tables.write();
        let now = Utc::now();
        let saved = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            total_amount: order.total_amount,
            status: order.status,
            created_at: now,
        };

        // Validate every line before touching the tables.
        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            check_quantity("order_items", item.quantity)?;
            if tables.product(item.product_id).is_none() {
                return Err(violation(format!(
                    "insert on table \"order_items\" violates foreign key constraint: product {} does not exist",
                    item.product_id
                )));
            }
            items.push(OrderItem {
                id: Uuid::new_v4(),
                order_id: saved.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                created_at: now,
                product: Some(item.product),
            });
        }

        tables.orders.push(saved.clone());
        tables
            .order_items
            .extend(items.iter().cloned().map(|item| OrderItem { product: None, ..item }));
        Ok((saved, items))
    }

    async fn list_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let tables = self.tables.read();
        let mut orders: Vec<Order> = tables
            .orders
            .iter()
            .rev()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Option<Order>> {
        let tables = self.tables.read();
        Ok(tables
            .orders
            .iter()
            .find(|order| order.id == order_id && order.user_id == user_id)
            .cloned())
    }

    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let tables = self.tables.read();
        let mut items: Vec<OrderItem> = tables
            .order_items
            .iter()
            .filter(|item| item.order_id == order_id)
            .map(|item| OrderItem {
                product: tables.product(item.product_id).cloned(),
                ..item.clone()
            })
            .collect();
        items.sort_by_key(|item| (item.created_at, item.id));
        Ok(items)
    }
}
