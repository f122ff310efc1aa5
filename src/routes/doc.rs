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
    cart::{AttributeSnapshot, CartAdjustment, CartItem, CartTotals},
    dto::{
        blog::{BlogPostDetail, BlogPostList, CreateBlogPostRequest, UpdateBlogPostRequest},
        cart::{AddCartItemRequest, CartLineView, CartView, RemoveCartItemRequest, UpdateCartItemRequest},
        orders::{
            AddressInput, CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest,
            UpdatePaymentStatusRequest,
        },
        products::{
            AttributeInput, Catalog, CatalogEntry, CatalogVariation, CreateProductRequest,
            ProductDetail, ProductList, ProductSummary, StockAdjustRequest, UpdateProductRequest,
            VariationAvailability, VariationInput,
        },
        taxonomy::{
            BrandList, CategoryList, CreateBrandRequest, CreateCategoryRequest,
            CreateTeaCategoryRequest, TeaCategoryList, UpdateBrandRequest, UpdateCategoryRequest,
            UpdateTeaCategoryRequest,
        },
    },
    models::{
        Address, BlogPost, Brand, Category, Order, OrderItem, Product, ProductVariation,
        TeaCategory, VariationAttribute,
    },
    response::Meta,
    routes::{admin, blog, cart, health, orders, params, products, taxonomy},
    stock::Availability,
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
        products::get_product,
        products::get_catalog,
        taxonomy::list_categories,
        taxonomy::list_tea_categories,
        taxonomy::list_brands,
        blog::list_posts,
        blog::get_post,
        cart::view_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        cart::clear_cart,
        orders::checkout,
        orders::get_order,
        admin::list_products,
        admin::get_product,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::adjust_stock,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::create_tea_category,
        admin::update_tea_category,
        admin::delete_tea_category,
        admin::create_brand,
        admin::update_brand,
        admin::delete_brand,
        admin::list_posts,
        admin::get_post,
        admin::create_post,
        admin::update_post,
        admin::delete_post,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::update_payment_status
    ),
    components(
        schemas(
            Category,
            TeaCategory,
            Brand,
            Product,
            ProductVariation,
            VariationAttribute,
            BlogPost,
            Order,
            OrderItem,
            Address,
            AttributeSnapshot,
            CartItem,
            CartTotals,
            CartAdjustment,
            CartLineView,
            CartView,
            Availability,
            VariationAvailability,
            AddCartItemRequest,
            UpdateCartItemRequest,
            RemoveCartItemRequest,
            AddressInput,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            UpdatePaymentStatusRequest,
            OrderList,
            OrderWithItems,
            AttributeInput,
            VariationInput,
            CreateProductRequest,
            UpdateProductRequest,
            StockAdjustRequest,
            ProductList,
            ProductSummary,
            ProductDetail,
            CatalogVariation,
            CatalogEntry,
            Catalog,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateTeaCategoryRequest,
            UpdateTeaCategoryRequest,
            CreateBrandRequest,
            UpdateBrandRequest,
            CategoryList,
            TeaCategoryList,
            BrandList,
            CreateBlogPostRequest,
            UpdateBlogPostRequest,
            BlogPostDetail,
            BlogPostList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::BlogQuery,
            Meta
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Storefront catalog"),
        (name = "Taxonomy", description = "Categories, tea categories and brands"),
        (name = "Blog", description = "Published articles"),
        (name = "Cart", description = "Cookie-backed cart"),
        (name = "Orders", description = "Checkout and order lookup"),
        (name = "Admin", description = "Dashboard endpoints, admin token required"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
