use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use storefront::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
    middleware::auth::{Claims, encode_token},
};
use uuid::Uuid;

const CATALOG: &[(&str, &str, &str, Decimal, i32)] = &[
    ("Wireless Headphones", "Over-ear, 30h battery", "Electronics", dec!(129.99), 25),
    ("Mechanical Keyboard", "Hot-swappable switches", "Electronics", dec!(89.00), 40),
    ("Cotton T-Shirt", "Heavyweight organic cotton", "Apparel", dec!(19.50), 120),
    ("Rain Jacket", "Packable and waterproof", "Apparel", dec!(74.00), 30),
    ("Ceramic Mug", "350 ml, dishwasher safe", "Home", dec!(12.00), 200),
    ("Desk Lamp", "Dimmable LED", "Home", dec!(45.25), 15),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let inserted = seed_products(&orm).await?;
    println!("Seed completed. {inserted} products inserted");

    // Local development session for a throwaway shopper.
    let shopper = Uuid::new_v4();
    let claims = Claims::for_user(shopper, Some("shopper@example.com".into()), Duration::days(1));
    let token = encode_token(&claims, &config.jwt_secret)?;
    println!("Demo shopper {shopper}\nBearer {token}");
    Ok(())
}

async fn seed_products(orm: &DatabaseConnection) -> anyhow::Result<usize> {
    let mut inserted = 0;
    for (name, description, category, price, stock) in CATALOG {
        let exists = Products::find()
            .filter(ProdCol::Name.eq(*name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            category: Set(category.to_string()),
            price: Set(*price),
            stock: Set(*stock),
            image_url: Set(String::new()),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
        println!("Inserted product {name}");
        inserted += 1;
    }
    Ok(inserted)
}
