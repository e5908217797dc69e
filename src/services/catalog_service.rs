use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Product,
    state::AppState,
};

/// Category value that selects the whole catalog.
pub const ALL_CATEGORIES: &str = "All";

pub async fn list_products(state: &AppState, category: Option<&str>) -> AppResult<Vec<Product>> {
    let products = state.store.list_products().await?;
    Ok(filter_by_category(products, category))
}

pub async fn list_categories(state: &AppState) -> AppResult<Vec<String>> {
    let products = state.store.list_products().await?;
    Ok(categories(&products))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    state.store.get_product(id).await?.ok_or(AppError::NotFound)
}

pub fn filter_by_category(products: Vec<Product>, category: Option<&str>) -> Vec<Product> {
    match category.filter(|c| !c.is_empty() && *c != ALL_CATEGORIES) {
        Some(category) => products
            .into_iter()
            .filter(|p| p.category == category)
            .collect(),
        None => products,
    }
}

/// `"All"` followed by each distinct category in order of first appearance.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            price: dec!(1.00),
            stock: 1,
            image_url: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let products = vec![
            product("Lamp", "Home"),
            product("Shirt", "Apparel"),
            product("Rug", "Home"),
        ];
        assert_eq!(categories(&products), vec!["All", "Home", "Apparel"]);
    }

    #[test]
    fn all_category_returns_everything() {
        let products = vec![product("Lamp", "Home"), product("Shirt", "Apparel")];
        assert_eq!(filter_by_category(products.clone(), Some("All")).len(), 2);
        assert_eq!(filter_by_category(products, None).len(), 2);
    }

    #[test]
    fn category_filter_is_exact() {
        let products = vec![
            product("Lamp", "Home"),
            product("Shirt", "Apparel"),
            product("Cap", "apparel"),
        ];
        let filtered = filter_by_category(products, Some("Apparel"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Shirt");
    }
}
