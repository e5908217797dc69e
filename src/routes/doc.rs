use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartView, SetQuantityRequest},
        orders::{CheckoutRequest, CheckoutView, OrderList, OrderWithItems},
        products::{CategoryList, ProductList},
    },
    models::{CartLine, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::list_categories,
        products::get_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::set_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::list_order,
        orders::checkout,
        orders::get_order
    ),
    components(
        schemas(
            Product,
            CartLine,
            Order,
            OrderItem,
            AddToCartRequest,
            SetQuantityRequest,
            CartView,
            CheckoutRequest,
            CheckoutView,
            OrderList,
            OrderWithItems,
            ProductList,
            CategoryList,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutView>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order history endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
