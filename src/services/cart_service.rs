use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartLine,
    store::DataService,
};

/// Client-side cache of every shopper's cart, kept in step with the remote
/// `carts` table.
///
/// Each mutation is written straight to the data service and is followed by
/// a full re-fetch of that user's cart, so after a call returns the cached
/// lines are whatever the remote store holds. Merging on add is a
/// read-then-write against the cached lines; two concurrent adds of the same
/// product for one user can lose an update.
///
/// A failed write drops the user's entry, and entries idle for longer than the
/// configured window are swept by [`spawn_eviction_task`].
pub struct CartManager {
    store: Arc<dyn DataService>,
    cache: DashMap<Uuid, CachedCart>,
}

struct CachedCart {
    lines: Vec<CartLine>,
    touched: Instant,
}

impl CartManager {
    pub fn new(store: Arc<dyn DataService>) -> Self {
        Self {
            store,
            cache: DashMap::new(),
        }
    }

    /// Lines of the signed-in user. Without a session the cart is empty.
    pub async fn lines(&self, user: Option<&AuthUser>) -> AppResult<Vec<CartLine>> {
        match user {
            Some(user) => self.cached_or_fetch(user.user_id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Re-fetches the user's cart and replaces the cached copy.
    pub async fn refresh(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        match self.store.fetch_cart(user_id).await {
            Ok(lines) => {
                tracing::debug!(user_id = %user_id, lines = lines.len(), "cart refreshed");
                self.cache.insert(
                    user_id,
                    CachedCart {
                        lines: lines.clone(),
                        touched: Instant::now(),
                    },
                );
                Ok(lines)
            }
            Err(err) => {
                // A stale copy must not survive a failed re-fetch.
                self.cache.remove(&user_id);
                Err(err)
            }
        }
    }

    pub async fn add(
        &self,
        user: Option<&AuthUser>,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<Vec<CartLine>> {
        let user = user.ok_or_else(AppError::unauthenticated)?;
        if quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }

        let lines = self.cached_or_fetch(user.user_id).await?;
        match lines.iter().find(|line| line.product_id == product_id) {
            Some(existing) => {
                let merged = existing.quantity.checked_add(quantity).ok_or_else(|| {
                    AppError::BadRequest("quantity is too large".to_string())
                })?;
                self.store
                    .update_cart_quantity(user.user_id, existing.id, merged)
                    .await
                    .inspect_err(|_| self.forget(user.user_id))?;
                tracing::info!(
                    user_id = %user.user_id,
                    product_id = %product_id,
                    quantity = merged,
                    "cart line merged"
                );
            }
            None => {
                self.store
                    .insert_cart_line(user.user_id, product_id, quantity)
                    .await
                    .inspect_err(|_| self.forget(user.user_id))?;
                tracing::info!(
                    user_id = %user.user_id,
                    product_id = %product_id,
                    quantity,
                    "cart line added"
                );
            }
        }

        self.refresh(user.user_id).await
    }

    /// Overwrites the quantity of a line; zero or less removes it instead.
    pub async fn set_quantity(
        &self,
        user: &AuthUser,
        line_id: Uuid,
        quantity: i32,
    ) -> AppResult<Vec<CartLine>> {
        if quantity <= 0 {
            return self.remove(user, line_id).await;
        }

        self.store
            .update_cart_quantity(user.user_id, line_id, quantity)
            .await
            .inspect_err(|_| self.forget(user.user_id))?;
        tracing::info!(user_id = %user.user_id, line_id = %line_id, quantity, "cart quantity set");

        self.refresh(user.user_id).await
    }

    pub async fn remove(&self, user: &AuthUser, line_id: Uuid) -> AppResult<Vec<CartLine>> {
        self.store
            .delete_cart_line(user.user_id, line_id)
            .await
            .inspect_err(|_| self.forget(user.user_id))?;
        tracing::info!(user_id = %user.user_id, line_id = %line_id, "cart line removed");

        self.refresh(user.user_id).await
    }

    pub async fn clear(&self, user: &AuthUser) -> AppResult<Vec<CartLine>> {
        self.store
            .delete_cart(user.user_id)
            .await
            .inspect_err(|_| self.forget(user.user_id))?;
        tracing::info!(user_id = %user.user_id, "cart cleared");

        self.refresh(user.user_id).await
    }

    /// Sum of price × quantity over the cached lines. Not authoritative
    /// between refreshes; an uncached user totals zero.
    pub fn total(&self, user_id: Uuid) -> Decimal {
        self.cache
            .get(&user_id)
            .map(|cached| lines_total(&cached.lines))
            .unwrap_or(Decimal::ZERO)
    }

    /// Drops the cached cart, e.g. when the session ends.
    pub fn forget(&self, user_id: Uuid) {
        self.cache.remove(&user_id);
    }

    /// Drops every cached cart neither read nor refreshed within `max_idle`.
    /// Returns how many entries were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let before = self.cache.len();
        self.cache
            .retain(|_, cached| now.duration_since(cached.touched) < max_idle);
        before.saturating_sub(self.cache.len())
    }

    pub fn cached_users(&self) -> usize {
        self.cache.len()
    }

    async fn cached_or_fetch(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let cached = self.cache.get_mut(&user_id).map(|mut cached| {
            cached.touched = Instant::now();
            cached.lines.clone()
        });
        match cached {
            Some(lines) => Ok(lines),
            None => self.refresh(user_id).await,
        }
    }
}

pub fn lines_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Periodically evicts carts idle for longer than `max_idle`.
pub fn spawn_eviction_task(cart: Arc<CartManager>, every: Duration, max_idle: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = cart.evict_idle(max_idle);
            tracing::debug!(
                evicted,
                remaining = cart.cached_users(),
                "cart cache sweep complete"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn line(price: Decimal, quantity: i32) -> CartLine {
        let product_id = Uuid::new_v4();
        CartLine {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            product_id,
            quantity,
            created_at: Utc::now(),
            product: Product {
                id: product_id,
                name: "Item".into(),
                description: String::new(),
                category: "Misc".into(),
                price,
                stock: 10,
                image_url: String::new(),
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(lines_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let lines = vec![line(dec!(10.00), 2), line(dec!(5.00), 1), line(dec!(0.99), 3)];
        assert_eq!(lines_total(&lines), dec!(27.97));
    }
}
