use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::AppResult,
    models::{CartLine, NewOrder, Order, OrderItem, Product},
    store::DataService,
};

/// [`DataService`] backed by the hosted Postgres database through SeaORM.
#[derive(Clone)]
pub struct SeaOrmStore {
    conn: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[async_trait]
impl DataService for SeaOrmStore {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = Products::find()
            .order_by_asc(ProdCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(products)
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let product = Products::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(product_from_entity);
        Ok(product)
    }

    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let rows = Carts::find()
            .filter(CartCol::UserId.eq(user_id))
            .order_by_asc(CartCol::CreatedAt)
            .find_also_related(Products)
            .all(&self.conn)
            .await?;

        let lines = rows
            .into_iter()
            .filter_map(|(cart, product)| match product {
                Some(product) => Some(cart_line_from_entity(cart, product)),
                None => {
                    tracing::warn!(line_id = %cart.id, product_id = %cart.product_id, "cart line without product skipped");
                    None
                }
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
        CartActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: NotSet,
        }
        .insert(&self.conn)
        .await?;
        Ok(())
    }

    async fn update_cart_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        Carts::update_many()
            .col_expr(CartCol::Quantity, Expr::value(quantity))
            .filter(owned_line(user_id, line_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn delete_cart_line(&self, user_id: Uuid, line_id: Uuid) -> AppResult<()> {
        Carts::delete_many()
            .filter(owned_line(user_id, line_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn delete_cart(&self, user_id: Uuid) -> AppResult<()> {
        Carts::delete_many()
            .filter(CartCol::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn create_order(&self, order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        let txn = self.conn.begin().await?;

        let saved = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(order.user_id),
            total_amount: Set(order.total_amount),
            status: Set(order.status),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            let model = OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(saved.id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                price: Set(item.price),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
            items.push(order_item_from_entity(model, Some(item.product)));
        }

        txn.commit().await?;

        Ok((order_from_entity(saved), items))
    }

    async fn list_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let orders = Orders::find()
            .filter(OrderCol::UserId.eq(user_id))
            .order_by_desc(OrderCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect();
        Ok(orders)
    }

    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Option<Order>> {
        let order = Orders::find()
            .filter(
                Condition::all()
                    .add(OrderCol::UserId.eq(user_id))
                    .add(OrderCol::Id.eq(order_id)),
            )
            .one(&self.conn)
            .await?
            .map(order_from_entity);
        Ok(order)
    }

    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order_id))
            .order_by_asc(OrderItemCol::CreatedAt)
            .order_by_asc(OrderItemCol::Id)
            .find_also_related(Products)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|(item, product)| order_item_from_entity(item, product.map(product_from_entity)))
            .collect();
        Ok(items)
    }
}

fn owned_line(user_id: Uuid, line_id: Uuid) -> Condition {
    Condition::all()
        .add(CartCol::Id.eq(line_id))
        .add(CartCol::UserId.eq(user_id))
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        price: model.price,
        stock: model.stock,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn cart_line_from_entity(cart: CartModel, product: ProductModel) -> CartLine {
    CartLine {
        id: cart.id,
        user_id: cart.user_id,
        product_id: cart.product_id,
        quantity: cart.quantity,
        created_at: cart.created_at.with_timezone(&Utc),
        product: product_from_entity(product),
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        total_amount: model.total_amount,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel, product: Option<Product>) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
        product,
    }
}
