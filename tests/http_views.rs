mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use storefront::{
    middleware::auth::{Claims, encode_token},
    models::Product,
    routes::create_app_router,
};
use tower::ServiceExt;
use uuid::Uuid;

struct Harness {
    app: Router,
    products: Vec<Product>,
}

fn harness() -> Harness {
    let products = vec![
        product("Lamp", "Home", dec!(30.00)),
        product("Shirt", "Apparel", dec!(20.00)),
        product("Mug", "Home", dec!(5.00)),
    ];
    let (state, _store) = flaky_state(products.clone());
    Harness {
        app: create_app_router().with_state(state),
        products,
    }
}

fn token_for(user_id: Uuid) -> String {
    let claims = Claims::for_user(user_id, None, Duration::hours(1));
    encode_token(&claims, JWT_SECRET).expect("sign token")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal as string")
        .parse()
        .expect("decimal")
}

#[tokio::test]
async fn catalog_filters_by_category() {
    let h = harness();

    let (status, body) = send(&h.app, "GET", "/api/products?category=Home", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Lamp", "Mug"]);

    let (_, body) = send(&h.app, "GET", "/api/products?category=All", None, None).await;
    assert_eq!(body["meta"]["count"], 3);

    let (_, body) = send(&h.app, "GET", "/api/products/categories", None, None).await;
    assert_eq!(body["data"], json!(["All", "Home", "Apparel"]));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let h = harness();
    let uri = format!("/api/products/{}", Uuid::new_v4());

    let (status, _) = send(&h.app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/products/{}", h.products[0].id);
    let (status, body) = send(&h.app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Lamp");
}

#[tokio::test]
async fn cart_mutations_require_a_session() {
    let h = harness();
    let payload = json!({ "product_id": h.products[0].id, "quantity": 1 });

    let (status, body) = send(&h.app, "POST", "/api/cart", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not authenticated");

    let (status, _) = send(&h.app, "POST", "/api/cart", Some("not-a-jwt"), Some(payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&h.app, "GET", "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(decimal(&body["data"]["total"]), Decimal::ZERO);
}

#[tokio::test]
async fn cart_add_update_remove_round() {
    let h = harness();
    let token = token_for(Uuid::new_v4());
    let lamp = &h.products[0];
    let mug = &h.products[2];

    send(
        &h.app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "product_id": lamp.id, "quantity": 1 })),
    )
    .await;
    let (status, body) = send(
        &h.app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "product_id": mug.id, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(decimal(&body["data"]["total"]), dec!(40.00));

    let mug_line = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|line| line["product_id"] == json!(mug.id))
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &h.app,
        "PATCH",
        &format!("/api/cart/{mug_line}"),
        Some(&token),
        Some(json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(decimal(&body["data"]["total"]), dec!(30.00));

    let (status, body) = send(&h.app, "DELETE", "/api/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
}

#[tokio::test]
async fn checkout_view_reports_outcome() {
    let h = harness();
    let delivery = json!({
        "full_name": "Grace Hopper",
        "address": "1 Navy Way",
        "city": "Arlington",
        "zip_code": "22201"
    });

    let (status, body) = send(
        &h.app,
        "POST",
        "/api/orders/checkout",
        None,
        Some(delivery.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "nothing_to_do");
    assert_eq!(body["data"]["order"], Value::Null);

    let token = token_for(Uuid::new_v4());
    let (_, body) = send(
        &h.app,
        "POST",
        "/api/orders/checkout",
        Some(&token),
        Some(delivery.clone()),
    )
    .await;
    assert_eq!(body["data"]["outcome"], "nothing_to_do");
    assert_eq!(body["data"]["reason"], "Your cart is empty");

    send(
        &h.app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "product_id": h.products[1].id, "quantity": 3 })),
    )
    .await;
    let (status, body) = send(
        &h.app,
        "POST",
        "/api/orders/checkout",
        Some(&token),
        Some(delivery),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "completed");
    assert_eq!(body["data"]["order"]["order"]["status"], "completed");
    assert_eq!(
        decimal(&body["data"]["order"]["order"]["total_amount"]),
        dec!(60.00)
    );
    let order_id = body["data"]["order"]["order"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (_, body) = send(&h.app, "GET", "/api/orders", Some(&token), None).await;
    assert_eq!(body["meta"]["count"], 1);

    let (status, body) = send(
        &h.app,
        "GET",
        &format!("/api/orders/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 3);
    assert_eq!(decimal(&body["data"]["items"][0]["price"]), dec!(20.00));

    let (_, body) = send(&h.app, "GET", "/api/cart", Some(&token), None).await;
    assert_eq!(body["data"]["items"], json!([]));
}

#[tokio::test]
async fn invalid_token_is_rejected_on_routes_that_allow_signed_out_use() {
    let h = harness();
    let forged = {
        let claims = Claims::for_user(Uuid::new_v4(), None, Duration::hours(1));
        encode_token(&claims, "some-other-secret").expect("sign token")
    };
    let delivery = json!({
        "full_name": "Grace Hopper",
        "address": "1 Navy Way",
        "city": "Arlington",
        "zip_code": "22201"
    });

    for token in ["not-a-jwt", forged.as_str()] {
        let (status, body) = send(&h.app, "GET", "/api/cart", Some(token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["data"]["items"], Value::Null);

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/orders/checkout",
            Some(token),
            Some(delivery.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_ne!(body["data"]["outcome"], "nothing_to_do");
    }
}

#[tokio::test]
async fn order_history_requires_a_session() {
    let h = harness();
    let (status, _) = send(&h.app, "GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
